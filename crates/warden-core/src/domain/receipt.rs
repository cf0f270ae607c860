//! Transaction handles, receipts and confirmation results.

use std::fmt;

use ethers_core::types::{H256, U256};
use serde::{Deserialize, Serialize};

/// Identifier the ledger returns on broadcast (the transaction hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHandle(H256);

impl TransactionHandle {
    pub fn new(hash: H256) -> Self {
        Self(hash)
    }

    pub fn hash(&self) -> H256 {
        self.0
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// What the ledger reports about a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction: TransactionHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<U256>,
    /// `None` on ledgers that predate the status field.
    pub status: Option<bool>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status == Some(true)
    }
}

/// Result of a single confirmation poll.
///
/// `Pending` is transient: the poller never hands it to the sequencer as a
/// final answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationResult {
    Pending,
    Success(Receipt),
    Failed(Receipt),
}

impl ConfirmationResult {
    pub fn from_receipt(receipt: Receipt) -> Self {
        Terminal::from_receipt(receipt).into()
    }

    /// `None` while the transaction is still unmined.
    pub fn into_terminal(self) -> Option<Terminal> {
        match self {
            ConfirmationResult::Pending => None,
            ConfirmationResult::Success(r) => Some(Terminal::Success(r)),
            ConfirmationResult::Failed(r) => Some(Terminal::Failed(r)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConfirmationResult::Pending)
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            ConfirmationResult::Pending => None,
            ConfirmationResult::Success(r) | ConfirmationResult::Failed(r) => Some(r),
        }
    }
}

/// Final answer for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Success(Receipt),
    Failed(Receipt),
}

impl Terminal {
    /// Only an explicit success flag counts as success; an unset or missing
    /// flag is a definitive failure.
    pub fn from_receipt(receipt: Receipt) -> Self {
        if receipt.succeeded() {
            Terminal::Success(receipt)
        } else {
            Terminal::Failed(receipt)
        }
    }

    pub fn receipt(&self) -> &Receipt {
        match self {
            Terminal::Success(r) | Terminal::Failed(r) => r,
        }
    }
}

impl From<Terminal> for ConfirmationResult {
    fn from(terminal: Terminal) -> Self {
        match terminal {
            Terminal::Success(r) => ConfirmationResult::Success(r),
            Terminal::Failed(r) => ConfirmationResult::Failed(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn receipt(status: Option<bool>) -> Receipt {
        Receipt {
            transaction: TransactionHandle::new(H256::from_low_u64_be(1)),
            block_number: Some(10),
            gas_used: Some(U256::from(21_000)),
            status,
        }
    }

    #[rstest]
    #[case::success(Some(true), true)]
    #[case::reverted(Some(false), false)]
    #[case::no_status_field(None, false)]
    fn receipts_are_classified_by_status(#[case] status: Option<bool>, #[case] success: bool) {
        let result = ConfirmationResult::from_receipt(receipt(status));
        assert!(result.is_terminal());
        assert_eq!(matches!(result, ConfirmationResult::Success(_)), success);
        assert_eq!(matches!(result, ConfirmationResult::Failed(_)), !success);
    }

    #[test]
    fn pending_is_not_terminal() {
        assert!(!ConfirmationResult::Pending.is_terminal());
        assert!(ConfirmationResult::Pending.receipt().is_none());
        assert_eq!(ConfirmationResult::Pending.into_terminal(), None);
    }

    #[test]
    fn mined_results_convert_to_terminal() {
        let failed = ConfirmationResult::from_receipt(receipt(Some(false)));
        assert_eq!(failed.into_terminal(), Some(Terminal::Failed(receipt(Some(false)))));

        let success = ConfirmationResult::from_receipt(receipt(Some(true)));
        let terminal = success.into_terminal().unwrap();
        assert_eq!(terminal.receipt().block_number, Some(10));
        assert!(matches!(terminal, Terminal::Success(_)));
    }

    #[test]
    fn handle_displays_full_hash() {
        let handle = TransactionHandle::new(H256::from_low_u64_be(0xbeef));
        let shown = handle.to_string();
        assert!(shown.starts_with("0x"));
        assert_eq!(shown.len(), 2 + 64);
        assert!(shown.ends_with("beef"));
    }
}
