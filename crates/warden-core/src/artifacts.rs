//! Deployment artifacts: where each administered contract lives and which
//! functions it is known to expose.
//!
//! ```json
//! {
//!   "EthVault": {
//!     "address": "0x…",
//!     "functions": ["function setDepositVerifier(address _verifier)"]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use ethers_core::types::Address;
use serde::Deserialize;

use crate::config::parse_address;
use crate::domain::ContractRef;
use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
struct ArtifactEntry {
    address: String,
    #[serde(default)]
    functions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Deployment {
    contracts: BTreeMap<String, ContractRef>,
}

impl Deployment {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let deployment = Self::parse(&json, path)?;
        tracing::debug!(path = %path.display(), contracts = deployment.contracts.len(), "loaded deployment artifacts");
        Ok(deployment)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::parse(json, Path::new("<inline>"))
    }

    fn parse(json: &str, path: &Path) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, ArtifactEntry> =
            serde_json::from_str(json).map_err(|source| ConfigError::Artifacts {
                path: path.to_path_buf(),
                source,
            })?;

        let mut contracts = BTreeMap::new();
        for (name, entry) in entries {
            let address = parse_address(&entry.address).map_err(|e| ConfigError::InvalidArtifact {
                contract: name.clone(),
                reason: e.to_string(),
            })?;
            let contract = ContractRef::new(name.clone(), address, &entry.functions).map_err(|e| {
                ConfigError::InvalidArtifact {
                    contract: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            contracts.insert(name, contract);
        }
        Ok(Self { contracts })
    }

    pub fn insert(&mut self, contract: ContractRef) {
        self.contracts.insert(contract.name().to_string(), contract);
    }

    pub fn contract(&self, name: &str) -> Result<ContractRef, ConfigError> {
        self.contracts
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::MissingContract(name.to_string()))
    }

    pub fn address(&self, name: &str) -> Result<Address, ConfigError> {
        self.contract(name).map(|c| c.address())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACTS: &str = r#"{
        "EthVault": {
            "address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "functions": ["function setDepositVerifier(address _verifier)"]
        },
        "EthDepositVerifier": {
            "address": "0xdddddddddddddddddddddddddddddddddddddddd"
        }
    }"#;

    #[test]
    fn contracts_are_resolved_by_name() {
        let deployment = Deployment::from_json_str(ARTIFACTS).unwrap();
        let vault = deployment.contract("EthVault").unwrap();
        assert_eq!(vault.address(), Address::repeat_byte(0xaa));
        assert!(vault.function("setDepositVerifier(address)").is_ok());
        assert_eq!(
            deployment.address("EthDepositVerifier").unwrap(),
            Address::repeat_byte(0xdd)
        );
        assert_eq!(deployment.names().collect::<Vec<_>>(), ["EthDepositVerifier", "EthVault"]);
    }

    #[test]
    fn unknown_contract_is_missing() {
        let deployment = Deployment::from_json_str(ARTIFACTS).unwrap();
        assert!(matches!(
            deployment.contract("FeeExitGame"),
            Err(ConfigError::MissingContract(name)) if name == "FeeExitGame"
        ));
    }

    #[test]
    fn bad_entries_are_rejected() {
        let bad_address = r#"{"EthVault": {"address": "0x1234"}}"#;
        assert!(matches!(
            Deployment::from_json_str(bad_address),
            Err(ConfigError::InvalidArtifact { contract, .. }) if contract == "EthVault"
        ));

        let bad_signature = r#"{"EthVault": {"address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "functions": ["oops("]}}"#;
        assert!(matches!(
            Deployment::from_json_str(bad_signature),
            Err(ConfigError::InvalidArtifact { .. })
        ));

        assert!(matches!(
            Deployment::from_json_str("[1, 2]"),
            Err(ConfigError::Artifacts { .. })
        ));
    }
}
