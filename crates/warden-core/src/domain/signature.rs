//! Function signatures: parsing, selectors, argument checking and encoding.
//!
//! Accepted forms:
//! - canonical: `registerVault(uint256,address)`
//! - human readable: `function registerVault(uint256 _vaultId, address _vault) external`
//!
//! Both resolve to the same [`FunctionSignature`]. Parameter names, modifiers
//! and `returns (...)` do not affect the selector.

use std::fmt;
use std::str::FromStr;

use ethers_core::abi::{AbiParser, Function, Param, ParamType, StateMutability, Token};
use ethers_core::types::Bytes;

use crate::error::EncodingError;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    function: Function,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, inputs: Vec<ParamType>) -> Self {
        let inputs = inputs
            .into_iter()
            .map(|kind| Param {
                name: String::new(),
                kind,
                internal_type: None,
            })
            .collect();

        #[allow(deprecated)]
        let function = Function {
            name: name.into(),
            inputs,
            outputs: Vec::new(),
            constant: None,
            state_mutability: StateMutability::NonPayable,
        };
        Self { function }
    }

    pub fn parse(input: &str) -> Result<Self, EncodingError> {
        let function = AbiParser::default()
            .parse_function(input)
            .map_err(|e| EncodingError::MalformedSignature {
                signature: input.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { function })
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn inputs(&self) -> Vec<ParamType> {
        self.function.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// `name(type1,type2)`, the string the selector is hashed from.
    ///
    /// Unlike [`Function::signature`] this leaves out the outputs, so a
    /// declaration with a `returns` clause keys the same as its canonical form.
    pub fn canonical(&self) -> String {
        let types: Vec<String> = self.function.inputs.iter().map(|p| p.kind.to_string()).collect();
        format!("{}({})", self.function.name, types.join(","))
    }

    /// First four bytes of keccak-256 over [`canonical`](Self::canonical).
    pub fn selector(&self) -> [u8; 4] {
        self.function.short_signature()
    }

    /// Checks arity and the runtime type of every argument.
    pub fn check_args(&self, args: &[Token]) -> Result<(), EncodingError> {
        let inputs = &self.function.inputs;
        if args.len() != inputs.len() {
            return Err(EncodingError::ArityMismatch {
                function: self.canonical(),
                expected: inputs.len(),
                actual: args.len(),
            });
        }
        for (index, (arg, param)) in args.iter().zip(inputs).enumerate() {
            if !arg.type_check(&param.kind) {
                return Err(EncodingError::TypeMismatch {
                    function: self.canonical(),
                    index,
                    expected: param.kind.to_string(),
                    actual: token_kind(arg).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Selector followed by the ABI encoding of `args`.
    pub fn encode(&self, args: &[Token]) -> Result<Bytes, EncodingError> {
        self.check_args(args)?;
        let data = self.function.encode_input(args).map_err(|e| EncodingError::Abi {
            function: self.canonical(),
            reason: e.to_string(),
        })?;
        Ok(Bytes::from(data))
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for FunctionSignature {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn token_kind(token: &Token) -> &'static str {
    match token {
        Token::Address(_) => "address",
        Token::FixedBytes(_) => "fixed bytes",
        Token::Bytes(_) => "bytes",
        Token::Int(_) => "int",
        Token::Uint(_) => "uint",
        Token::Bool(_) => "bool",
        Token::String(_) => "string",
        Token::FixedArray(_) => "fixed array",
        Token::Array(_) => "array",
        Token::Tuple(_) => "tuple",
    }
}
