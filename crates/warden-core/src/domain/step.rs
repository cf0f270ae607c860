//! One administrative action of the setup sequence.

use ethers_core::abi::Token;
use ethers_core::types::U256;

use super::contract::ContractRef;
use super::signature::FunctionSignature;
use crate::error::EncodingError;

/// An immutable call on a target contract, routed through the multisig.
///
/// `Step::new` resolves the signature against the contract and type-checks the
/// arguments, so a bad step definition fails before any sequence starts.
#[derive(Debug, Clone)]
pub struct Step {
    description: String,
    target: ContractRef,
    function: FunctionSignature,
    args: Vec<Token>,
    value: U256,
}

impl Step {
    pub fn new(
        description: impl Into<String>,
        target: &ContractRef,
        signature: &str,
        args: Vec<Token>,
    ) -> Result<Self, EncodingError> {
        let function = target.function(signature)?.clone();
        function.check_args(&args)?;
        Ok(Self {
            description: description.into(),
            target: target.clone(),
            function,
            args,
            value: U256::zero(),
        })
    }

    /// Native value forwarded by the multisig along with the call.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target(&self) -> &ContractRef {
        &self.target
    }

    pub fn function(&self) -> &FunctionSignature {
        &self.function
    }

    pub fn args(&self) -> &[Token] {
        &self.args
    }

    pub fn value(&self) -> U256 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::Address;

    fn framework() -> ContractRef {
        ContractRef::new(
            "PlasmaFramework",
            Address::repeat_byte(0x01),
            ["registerVault(uint256,address)", "setVersion(string)"],
        )
        .unwrap()
    }

    #[test]
    fn valid_step_defaults_to_zero_value() {
        let step = Step::new(
            "register ETH vault",
            &framework(),
            "registerVault(uint256,address)",
            vec![Token::Uint(U256::one()), Token::Address(Address::repeat_byte(0x02))],
        )
        .unwrap();
        assert_eq!(step.value(), U256::zero());
        assert_eq!(step.function().name(), "registerVault");
        assert_eq!(step.target().name(), "PlasmaFramework");
    }

    #[test]
    fn bad_arguments_fail_at_definition_time() {
        let err = Step::new(
            "register ETH vault",
            &framework(),
            "registerVault(uint256,address)",
            vec![Token::Uint(U256::one()), Token::String("0x02".into())],
        )
        .unwrap_err();
        assert!(matches!(err, EncodingError::TypeMismatch { index: 1, .. }));
    }

    #[test]
    fn unknown_signature_fails_at_definition_time() {
        let err = Step::new("init", &framework(), "init()", vec![]).unwrap_err();
        assert!(matches!(err, EncodingError::UnknownFunction { .. }));
    }
}
