//! Deployed contract handles.

use std::collections::BTreeMap;

use ethers_core::types::Address;

use super::signature::FunctionSignature;
use crate::error::EncodingError;

/// A deployed contract: name, address and the function signatures it is known
/// to expose. Signatures are parsed once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRef {
    name: String,
    address: Address,
    /// canonical signature -> parsed signature
    functions: BTreeMap<String, FunctionSignature>,
}

impl ContractRef {
    pub fn new<I, S>(name: impl Into<String>, address: Address, signatures: I) -> Result<Self, EncodingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut functions = BTreeMap::new();
        for signature in signatures {
            let parsed = FunctionSignature::parse(signature.as_ref())?;
            functions.insert(parsed.canonical(), parsed);
        }
        Ok(Self {
            name: name.into(),
            address,
            functions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Looks up a function by signature, in either accepted form.
    pub fn function(&self, signature: &str) -> Result<&FunctionSignature, EncodingError> {
        let canonical = FunctionSignature::parse(signature)?.canonical();
        self.functions
            .get(&canonical)
            .ok_or_else(|| EncodingError::UnknownFunction {
                contract: self.name.clone(),
                signature: canonical,
            })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.functions.values()
    }
}
