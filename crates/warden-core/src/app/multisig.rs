//! Multisig wrapper: routes an inner call through the wallet's
//! `submitTransaction(address,uint256,bytes)` entry point.

use std::path::Path;

use ethers_core::abi::{ParamType, Token};
use ethers_core::types::{Address, Bytes, U256};

use super::encoder::encode_step;
use crate::config::parse_address;
use crate::domain::{CallPayload, FunctionSignature, Step};
use crate::error::{ConfigError, EncodingError};

/// Canonical submission entry point. Returns the wallet's transaction id.
pub const SUBMIT_TRANSACTION: &str = "submitTransaction(address,uint256,bytes)";

/// `keccak256("submitTransaction(address,uint256,bytes)")[..4]`
pub const SUBMIT_TRANSACTION_SELECTOR: [u8; 4] = [0xc6, 0x42, 0x74, 0x74];

#[derive(Debug, Clone)]
pub struct MultisigWrapper {
    wallet: Address,
    entry_point: FunctionSignature,
}

impl MultisigWrapper {
    pub fn new(wallet: Address) -> Self {
        Self {
            wallet,
            entry_point: FunctionSignature::new(
                "submitTransaction",
                vec![ParamType::Address, ParamType::Uint(256), ParamType::Bytes],
            ),
        }
    }

    /// Reads the wallet address from a file holding nothing else
    /// (surrounding whitespace allowed).
    pub fn from_instance_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let wallet = parse_address(raw.trim())?;
        if wallet.is_zero() {
            return Err(ConfigError::InvalidAddress {
                value: raw.trim().to_string(),
                reason: "multisig wallet address is zero".into(),
            });
        }
        tracing::debug!(wallet = ?wallet, path = %path.display(), "loaded multisig instance");
        Ok(Self::new(wallet))
    }

    pub fn wallet(&self) -> Address {
        self.wallet
    }

    /// Outer payload asking the wallet to call `destination` with `inner`.
    ///
    /// `value` is forwarded by the wallet from its own balance; the outer
    /// transaction itself carries no value.
    pub fn wrap(&self, destination: Address, value: U256, inner: Bytes) -> Result<CallPayload, EncodingError> {
        let data = self.entry_point.encode(&[
            Token::Address(destination),
            Token::Uint(value),
            Token::Bytes(inner.to_vec()),
        ])?;
        Ok(CallPayload::new(self.wallet, U256::zero(), data))
    }

    pub fn wrap_step(&self, step: &Step) -> Result<CallPayload, EncodingError> {
        let inner = encode_step(step)?;
        self.wrap(step.target().address(), step.value(), inner)
    }
}
