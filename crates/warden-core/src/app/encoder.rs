//! Call encoder: selector + ABI-encoded arguments.

use ethers_core::abi::Token;
use ethers_core::types::Bytes;

use crate::domain::{ContractRef, Step};
use crate::error::EncodingError;

/// Encodes a call to one of `contract`'s known functions.
///
/// `signature` may be canonical (`registerVault(uint256,address)`) or
/// human-readable (`function registerVault(uint256 _vaultId, address _vault)`).
pub fn encode_call(contract: &ContractRef, signature: &str, args: &[Token]) -> Result<Bytes, EncodingError> {
    contract.function(signature)?.encode(args)
}

/// Inner payload of a step, i.e. what the multisig will eventually execute.
pub fn encode_step(step: &Step) -> Result<Bytes, EncodingError> {
    step.function().encode(step.args())
}
