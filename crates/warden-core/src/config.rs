//! SetupConfig - 環境変数から読む設定
//!
//! 全ての値は起動時に一度だけ読み、以降は不変の値として sequencer に渡す。
//! `.env` の読み込みは CLI 側（dotenvy）で行う。

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ethers_core::types::{Address, U256};

use crate::app::builder::DEFAULT_GAS_LIMIT;
use crate::app::plan::PlanConstants;
use crate::app::poller::PollPolicy;
use crate::error::ConfigError;

pub const VAULT_GATE: &str = "VAULT";
pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
pub const OPERATOR_ADDRESS: &str = "OPERATOR_ADDRESS";
pub const DEPLOYMENT_ARTIFACTS: &str = "DEPLOYMENT_ARTIFACTS";
pub const MULTISIG_INSTANCE_FILE: &str = "MULTISIG_INSTANCE_FILE";
pub const GAS_LIMIT: &str = "GAS_LIMIT";
pub const POLL_INTERVAL_MS: &str = "POLL_INTERVAL_MS";
pub const MAX_WAIT_SECS: &str = "MAX_WAIT_SECS";
pub const PROTOCOL_MORE_VP: &str = "PROTOCOL_MORE_VP";
pub const TX_TYPE_PAYMENT: &str = "TX_TYPE_PAYMENT";
pub const TX_TYPE_FEE: &str = "TX_TYPE_FEE";
pub const VAULT_ID_ETH: &str = "VAULT_ID_ETH";
pub const VAULT_ID_ERC20: &str = "VAULT_ID_ERC20";
pub const PACKAGE_VERSION: &str = "PACKAGE_VERSION";
pub const SOURCE_REVISION: &str = "SOURCE_REVISION";

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    pub rpc_url: String,
    pub operator: Address,
    pub artifacts_path: PathBuf,
    pub multisig_instance_file: PathBuf,
    pub gas_limit: U256,
    pub poll: PollPolicy,
    pub plan: PlanConstants,
    pub package_version: String,
    /// `None` = ask git.
    pub source_revision: Option<String>,
}

impl SetupConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let operator_raw = vars.required(OPERATOR_ADDRESS)?;
        let operator = parse_address(&operator_raw)?;
        if operator.is_zero() {
            return Err(ConfigError::InvalidVar {
                name: OPERATOR_ADDRESS,
                value: operator_raw,
                reason: "zero address".into(),
            });
        }

        let gas_limit: u64 = vars.parse_or(GAS_LIMIT, DEFAULT_GAS_LIMIT)?;
        let interval_ms: u64 = vars.parse_or(POLL_INTERVAL_MS, PollPolicy::DEFAULT_INTERVAL.as_millis() as u64)?;
        let mut poll = PollPolicy::new(Duration::from_millis(interval_ms));
        if let Some(secs) = vars.parse_opt::<u64>(MAX_WAIT_SECS)? {
            poll = poll.with_max_wait(Duration::from_secs(secs));
        }

        let defaults = PlanConstants::default();
        let plan = PlanConstants {
            eth_vault_id: vars.parse_or(VAULT_ID_ETH, defaults.eth_vault_id)?,
            erc20_vault_id: vars.parse_or(VAULT_ID_ERC20, defaults.erc20_vault_id)?,
            payment_tx_type: vars.parse_or(TX_TYPE_PAYMENT, defaults.payment_tx_type)?,
            fee_tx_type: vars.parse_or(TX_TYPE_FEE, defaults.fee_tx_type)?,
            more_vp: vars.parse_or(PROTOCOL_MORE_VP, defaults.more_vp)?,
        };

        Ok(Self {
            rpc_url: vars.get(ETH_RPC_URL).unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            operator,
            artifacts_path: PathBuf::from(vars.required(DEPLOYMENT_ARTIFACTS)?),
            multisig_instance_file: PathBuf::from(vars.required(MULTISIG_INSTANCE_FILE)?),
            gas_limit: U256::from(gas_limit),
            poll,
            plan,
            package_version: vars
                .get(PACKAGE_VERSION)
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            source_revision: vars.get(SOURCE_REVISION),
        })
    }
}

/// Whether the `VAULT` gate lets the setup run.
///
/// Unset, empty, `0`, `false`, `no` and `off` (any case) keep it closed.
pub fn gate_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"),
    }
}

pub fn gate_enabled_from_env() -> bool {
    gate_enabled(std::env::var(VAULT_GATE).ok().as_deref())
}

/// `0x`-prefixed or bare 40-digit hex.
pub fn parse_address(value: &str) -> Result<Address, ConfigError> {
    value.trim().parse::<Address>().map_err(|e| ConfigError::InvalidAddress {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Empty counts as unset.
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::MissingVar(name))
    }

    fn parse_opt<T>(&self, name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(name)
            .map(|value| {
                value.parse::<T>().map_err(|e| ConfigError::InvalidVar {
                    name,
                    reason: e.to_string(),
                    value,
                })
            })
            .transpose()
    }

    fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(self.parse_opt(name)?.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<SetupConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        SetupConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        (OPERATOR_ADDRESS, "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"),
        (DEPLOYMENT_ARTIFACTS, "build/deployment.json"),
        (MULTISIG_INSTANCE_FILE, "../../MultiSigWallet/build/multisig_instance"),
    ];

    #[test]
    fn defaults_apply() {
        let config = config(&REQUIRED).unwrap();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.operator, Address::repeat_byte(0xee));
        assert_eq!(config.gas_limit, U256::from(3_000_000u64));
        assert_eq!(config.poll, PollPolicy::default());
        assert_eq!(config.plan, PlanConstants::default());
        assert_eq!(config.package_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.source_revision, None);
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (ETH_RPC_URL, "http://node:8545"),
            (GAS_LIMIT, "5000000"),
            (POLL_INTERVAL_MS, "250"),
            (MAX_WAIT_SECS, "600"),
            (PROTOCOL_MORE_VP, "1"),
            (TX_TYPE_FEE, "4"),
            (SOURCE_REVISION, "9f2c3e1d"),
        ]);
        let config = config(&vars).unwrap();
        assert_eq!(config.rpc_url, "http://node:8545");
        assert_eq!(config.gas_limit, U256::from(5_000_000u64));
        assert_eq!(
            config.poll,
            PollPolicy::new(Duration::from_millis(250)).with_max_wait(Duration::from_secs(600))
        );
        assert_eq!(config.plan.more_vp, 1);
        assert_eq!(config.plan.fee_tx_type, 4);
        assert_eq!(config.source_revision.as_deref(), Some("9f2c3e1d"));
    }

    #[rstest]
    #[case::operator(OPERATOR_ADDRESS)]
    #[case::artifacts(DEPLOYMENT_ARTIFACTS)]
    #[case::multisig_file(MULTISIG_INSTANCE_FILE)]
    fn required_vars_must_be_present(#[case] missing: &str) {
        let vars: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
        assert!(matches!(config(&vars), Err(ConfigError::MissingVar(name)) if name == missing));
    }

    #[rstest]
    #[case::gas(GAS_LIMIT, "lots")]
    #[case::interval(POLL_INTERVAL_MS, "-1")]
    #[case::more_vp_overflow(PROTOCOL_MORE_VP, "300")]
    fn malformed_numbers_are_invalid(#[case] name: &str, #[case] value: &str) {
        let mut vars = REQUIRED.to_vec();
        vars.push((name, value));
        assert!(matches!(config(&vars), Err(ConfigError::InvalidVar { .. })));
    }

    #[test]
    fn zero_operator_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = (OPERATOR_ADDRESS, "0x0000000000000000000000000000000000000000");
        assert!(matches!(config(&vars), Err(ConfigError::InvalidVar { .. })));
    }

    #[rstest]
    #[case::unset(None, false)]
    #[case::empty(Some(""), false)]
    #[case::zero(Some("0"), false)]
    #[case::false_word(Some("False"), false)]
    #[case::off(Some("off"), false)]
    #[case::one(Some("1"), true)]
    #[case::true_word(Some("true"), true)]
    #[case::anything_else(Some("yes please"), true)]
    fn gate_flag(#[case] value: Option<&str>, #[case] enabled: bool) {
        assert_eq!(gate_enabled(value), enabled);
    }

    #[test]
    fn addresses_accept_both_prefix_forms() {
        let a = parse_address("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        let b = parse_address("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        assert_eq!(a, b);
        assert!(parse_address("0xaaaa").is_err());
    }
}
