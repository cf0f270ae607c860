//! Error taxonomy for the setup orchestrator.
//!
//! Every variant of [`WardenError`] is fatal for the running sequence: nothing
//! is retried with fresh parameters and confirmed steps are never rolled back.
//! A mined-but-reverted transaction is *not* an error value; it is the
//! `Failed` confirmation result and is reported as [`ErrorKind::Reverted`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::builder::BuildError;
use crate::domain::TransactionHandle;
use crate::ports::LedgerError;

/// Operational classification of a failed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or unreadable address, constant or file.
    Configuration,
    /// Argument/type mismatch in a step definition.
    Encoding,
    /// The ledger refused the broadcast.
    Submission,
    /// Mined, but the status flag is unset.
    Reverted,
    /// No receipt within the configured maximum wait.
    Timeout,
    /// The caller stopped the confirmation wait.
    Cancelled,
    /// Receipt query failed.
    Ledger,
}

/// A call could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("malformed function signature `{signature}`: {reason}")]
    MalformedSignature { signature: String, reason: String },

    #[error("contract {contract} has no function `{signature}`")]
    UnknownFunction { contract: String, signature: String },

    #[error("`{function}` takes {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("argument {index} of `{function}` must be {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("cannot encode `{function}`: {reason}")]
    Abi { function: String, reason: String },
}

/// A required setting, file or deployment artifact is missing or invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name} ({value:?}): {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed deployment artifacts {path}: {source}")]
    Artifacts {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("deployment artifact for {contract} is invalid: {reason}")]
    InvalidArtifact { contract: String, reason: String },

    #[error("contract {0} is not in the deployment artifacts")]
    MissingContract(String),

    #[error("cannot determine source revision: {0}")]
    Revision(String),
}

/// Top-level error for one step or one run.
#[derive(Debug, Error)]
pub enum WardenError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("transaction rejected by the ledger: {0}")]
    Submission(#[source] LedgerError),

    #[error("no receipt for {handle} after {waited:?}")]
    Timeout {
        handle: TransactionHandle,
        waited: Duration,
    },

    #[error("stopped waiting for {0}")]
    Cancelled(TransactionHandle),

    #[error("receipt query for {handle} failed: {source}")]
    Ledger {
        handle: TransactionHandle,
        #[source]
        source: LedgerError,
    },
}

impl WardenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WardenError::Configuration(_) | WardenError::Build(_) => ErrorKind::Configuration,
            WardenError::Encoding(_) => ErrorKind::Encoding,
            WardenError::Submission(_) => ErrorKind::Submission,
            WardenError::Timeout { .. } => ErrorKind::Timeout,
            WardenError::Cancelled(_) => ErrorKind::Cancelled,
            WardenError::Ledger { .. } => ErrorKind::Ledger,
        }
    }

    /// The broadcast transaction this error refers to, if it got that far.
    pub fn transaction(&self) -> Option<TransactionHandle> {
        match self {
            WardenError::Timeout { handle, .. }
            | WardenError::Cancelled(handle)
            | WardenError::Ledger { handle, .. } => Some(*handle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::H256;

    #[test]
    fn kinds_cover_the_taxonomy() {
        let handle = TransactionHandle::new(H256::from_low_u64_be(7));

        let err = WardenError::from(ConfigError::MissingVar("OPERATOR_ADDRESS"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.transaction(), None);

        let err = WardenError::Submission(LedgerError::Rpc {
            code: -32000,
            message: "insufficient funds".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert_eq!(err.transaction(), None);

        let err = WardenError::Timeout {
            handle,
            waited: Duration::from_secs(30),
        };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.transaction(), Some(handle));

        assert_eq!(WardenError::Cancelled(handle).kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn error_kind_serializes_snake_case() {
        let s = serde_json::to_string(&ErrorKind::Reverted).unwrap();
        assert_eq!(s, "\"reverted\"");
    }
}
