//! TransactionSubmitter - broadcast only; never waits, never retries.

use std::sync::Arc;

use ethers_core::types::{Address, U256};

use crate::domain::{CallPayload, TransactionHandle};
use crate::error::WardenError;
use crate::ports::{Ledger, OutgoingTransaction};

pub struct TransactionSubmitter {
    ledger: Arc<dyn Ledger>,
    operator: Address,
    gas_limit: U256,
}

impl TransactionSubmitter {
    pub fn new(ledger: Arc<dyn Ledger>, operator: Address, gas_limit: U256) -> Self {
        Self {
            ledger,
            operator,
            gas_limit,
        }
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Returns once the transaction is in the pending pool. A synchronous
    /// rejection is [`WardenError::Submission`].
    pub async fn submit(&self, payload: CallPayload) -> Result<TransactionHandle, WardenError> {
        let to = payload.to;
        let tx = OutgoingTransaction {
            from: self.operator,
            gas: self.gas_limit,
            payload,
        };
        match self.ledger.send_transaction(&tx).await {
            Ok(handle) => {
                tracing::info!(tx = %handle, to = ?to, "broadcast accepted");
                Ok(handle)
            }
            Err(e) => {
                tracing::warn!(to = ?to, error = %e, "broadcast rejected");
                Err(WardenError::Submission(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::impls::{Script, ScriptedLedger};
    use ethers_core::types::Bytes;

    fn payload() -> CallPayload {
        CallPayload::new(Address::repeat_byte(0x55), U256::zero(), Bytes::from(vec![1, 2, 3]))
    }

    #[tokio::test]
    async fn broadcast_uses_operator_and_gas_limit() {
        let ledger = Arc::new(ScriptedLedger::new());
        let submitter = TransactionSubmitter::new(ledger.clone(), Address::repeat_byte(0xee), U256::from(3_000_000u64));

        submitter.submit(payload()).await.unwrap();

        let sent = ledger.broadcasts();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, Address::repeat_byte(0xee));
        assert_eq!(sent[0].gas, U256::from(3_000_000u64));
        assert_eq!(sent[0].payload, payload());
    }

    #[tokio::test]
    async fn rejection_is_a_submission_error() {
        let ledger = Arc::new(ScriptedLedger::with_scripts([Script::reject("gas too low")]));
        let submitter = TransactionSubmitter::new(ledger.clone(), Address::repeat_byte(0xee), U256::from(21_000u64));

        let err = submitter.submit(payload()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert!(err.to_string().contains("gas too low"));
        assert_eq!(ledger.send_attempts(), 1);
    }
}
