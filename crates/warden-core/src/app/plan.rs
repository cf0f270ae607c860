//! The vault setup plan: eight administrative calls, each routed through the
//! multisig, that wire vaults and exit games into the plasma framework.

use ethers_core::abi::Token;
use ethers_core::types::U256;

use crate::artifacts::Deployment;
use crate::domain::Step;
use crate::error::WardenError;

pub const PLASMA_FRAMEWORK: &str = "PlasmaFramework";
pub const ETH_VAULT: &str = "EthVault";
pub const ERC20_VAULT: &str = "Erc20Vault";
pub const ETH_DEPOSIT_VERIFIER: &str = "EthDepositVerifier";
pub const ERC20_DEPOSIT_VERIFIER: &str = "Erc20DepositVerifier";
pub const PAYMENT_EXIT_GAME: &str = "PaymentExitGame";
pub const FEE_EXIT_GAME: &str = "FeeExitGame";

const SET_DEPOSIT_VERIFIER: &str = "setDepositVerifier(address)";
const REGISTER_VAULT: &str = "registerVault(uint256,address)";
const REGISTER_EXIT_GAME: &str = "registerExitGame(uint256,address,uint8)";
const SET_VERSION: &str = "setVersion(string)";
const INIT: &str = "init()";

/// Registration keys passed to the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanConstants {
    pub eth_vault_id: u64,
    pub erc20_vault_id: u64,
    pub payment_tx_type: u64,
    pub fee_tx_type: u64,
    /// Protocol id both exit games are registered under.
    pub more_vp: u8,
}

impl Default for PlanConstants {
    fn default() -> Self {
        Self {
            eth_vault_id: 1,
            erc20_vault_id: 2,
            payment_tx_type: 1,
            fee_tx_type: 3,
            more_vp: 2,
        }
    }
}

/// Builds the plan. Every contract must be in `deployment`, and every call
/// must match a known signature, before anything is broadcast.
pub fn vault_setup_plan(
    deployment: &Deployment,
    constants: &PlanConstants,
    version: &str,
) -> Result<Vec<Step>, WardenError> {
    let framework = deployment.contract(PLASMA_FRAMEWORK)?;
    let eth_vault = deployment.contract(ETH_VAULT)?;
    let erc20_vault = deployment.contract(ERC20_VAULT)?;
    let payment_exit_game = deployment.contract(PAYMENT_EXIT_GAME)?;
    let eth_verifier = deployment.address(ETH_DEPOSIT_VERIFIER)?;
    let erc20_verifier = deployment.address(ERC20_DEPOSIT_VERIFIER)?;
    let fee_exit_game = deployment.address(FEE_EXIT_GAME)?;

    let uint = |v: u64| Token::Uint(U256::from(v));
    let more_vp = Token::Uint(U256::from(constants.more_vp));

    let steps = vec![
        Step::new(
            "ETH vault: set deposit verifier",
            &eth_vault,
            SET_DEPOSIT_VERIFIER,
            vec![Token::Address(eth_verifier)],
        )?,
        Step::new(
            "framework: register ETH vault",
            &framework,
            REGISTER_VAULT,
            vec![uint(constants.eth_vault_id), Token::Address(eth_vault.address())],
        )?,
        Step::new(
            "ERC20 vault: set deposit verifier",
            &erc20_vault,
            SET_DEPOSIT_VERIFIER,
            vec![Token::Address(erc20_verifier)],
        )?,
        Step::new(
            "framework: register ERC20 vault",
            &framework,
            REGISTER_VAULT,
            vec![uint(constants.erc20_vault_id), Token::Address(erc20_vault.address())],
        )?,
        Step::new("payment exit game: init", &payment_exit_game, INIT, vec![])?,
        Step::new(
            "framework: register payment exit game",
            &framework,
            REGISTER_EXIT_GAME,
            vec![
                uint(constants.payment_tx_type),
                Token::Address(payment_exit_game.address()),
                more_vp.clone(),
            ],
        )?,
        Step::new(
            "framework: register fee exit game",
            &framework,
            REGISTER_EXIT_GAME,
            vec![uint(constants.fee_tx_type), Token::Address(fee_exit_game), more_vp],
        )?,
        Step::new(
            format!("framework: set version {version}"),
            &framework,
            SET_VERSION,
            vec![Token::String(version.to_string())],
        )?,
    ];
    Ok(steps)
}
