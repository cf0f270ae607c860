//! ScriptedLedger - 開発用・テスト用の in-memory ledger
//!
//! Each broadcast consumes the next [`Script`] (or the fallback once the
//! queue is empty), which decides whether the node rejects it, mines it after
//! some number of receipt queries, or never mines it. Every call is recorded
//! so tests can check ordering.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use ethers_core::types::{Address, H256, U256};

use crate::domain::{Receipt, TransactionHandle};
use crate::ports::{Ledger, LedgerError, OutgoingTransaction};

/// Gas reported on every scripted receipt.
const SCRIPTED_GAS_USED: u64 = 21_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Receipt appears on query number `after_polls + 1`.
    Mine { after_polls: u32, success: bool },
    /// Accepted but never mined.
    NeverMine,
    /// Synchronous rejection.
    Reject { code: i64, message: String },
}

impl Script {
    pub fn succeed() -> Self {
        Script::Mine {
            after_polls: 0,
            success: true,
        }
    }

    pub fn succeed_after(after_polls: u32) -> Self {
        Script::Mine {
            after_polls,
            success: true,
        }
    }

    pub fn revert() -> Self {
        Script::Mine {
            after_polls: 0,
            success: false,
        }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Script::Reject {
            code: -32000,
            message: message.into(),
        }
    }
}

/// Everything the ledger was asked, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Send {
        to: Address,
        handle: Option<TransactionHandle>,
    },
    Receipt {
        handle: TransactionHandle,
        found: bool,
    },
}

struct PendingTx {
    polls_left: u32,
    /// `None` = never mined.
    success: Option<bool>,
    block: u64,
}

struct State {
    scripts: VecDeque<Script>,
    fallback: Script,
    pending: HashMap<TransactionHandle, PendingTx>,
    broadcasts: Vec<OutgoingTransaction>,
    calls: Vec<LedgerCall>,
    next_nonce: u64,
    block: u64,
}

pub struct ScriptedLedger {
    state: Mutex<State>,
}

impl ScriptedLedger {
    /// Every broadcast is mined successfully on the first receipt query.
    pub fn new() -> Self {
        Self::with_scripts([])
    }

    pub fn with_scripts(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            state: Mutex::new(State {
                scripts: scripts.into_iter().collect(),
                fallback: Script::succeed(),
                pending: HashMap::new(),
                broadcasts: Vec::new(),
                calls: Vec::new(),
                next_nonce: 1,
                block: 100,
            }),
        }
    }

    /// Script used once the queue is exhausted.
    pub fn with_fallback(self, fallback: Script) -> Self {
        self.lock().fallback = fallback;
        self
    }

    /// Accepted broadcasts, in order.
    pub fn broadcasts(&self) -> Vec<OutgoingTransaction> {
        self.lock().broadcasts.clone()
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.lock().calls.clone()
    }

    pub fn send_attempts(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, LedgerCall::Send { .. }))
            .count()
    }

    pub fn receipt_queries(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, LedgerCall::Receipt { .. }))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // 例外でロックが汚染されても記録は読みたい
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ScriptedLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for ScriptedLedger {
    async fn send_transaction(&self, tx: &OutgoingTransaction) -> Result<TransactionHandle, LedgerError> {
        let mut state = self.lock();
        let script = state.scripts.pop_front().unwrap_or_else(|| state.fallback.clone());

        let (polls_left, success) = match script {
            Script::Reject { code, message } => {
                state.calls.push(LedgerCall::Send {
                    to: tx.payload.to,
                    handle: None,
                });
                return Err(LedgerError::Rpc { code, message });
            }
            Script::Mine { after_polls, success } => (after_polls, Some(success)),
            Script::NeverMine => (0, None),
        };

        let handle = TransactionHandle::new(H256::from_low_u64_be(state.next_nonce));
        state.next_nonce += 1;
        state.block += 1;
        let block = state.block;

        state.pending.insert(
            handle,
            PendingTx {
                polls_left,
                success,
                block,
            },
        );
        state.broadcasts.push(tx.clone());
        state.calls.push(LedgerCall::Send {
            to: tx.payload.to,
            handle: Some(handle),
        });
        Ok(handle)
    }

    async fn transaction_receipt(&self, handle: &TransactionHandle) -> Result<Option<Receipt>, LedgerError> {
        let mut state = self.lock();
        let receipt = match state.pending.get_mut(handle) {
            None => None,
            Some(tx) if tx.polls_left > 0 => {
                tx.polls_left -= 1;
                None
            }
            Some(tx) => tx.success.map(|success| Receipt {
                transaction: *handle,
                block_number: Some(tx.block),
                gas_used: Some(U256::from(SCRIPTED_GAS_USED)),
                status: Some(success),
            }),
        };
        state.calls.push(LedgerCall::Receipt {
            handle: *handle,
            found: receipt.is_some(),
        });
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CallPayload;
    use ethers_core::types::Bytes;

    fn tx(to: u8) -> OutgoingTransaction {
        OutgoingTransaction {
            from: Address::repeat_byte(0xee),
            gas: U256::from(3_000_000u64),
            payload: CallPayload::new(Address::repeat_byte(to), U256::zero(), Bytes::new()),
        }
    }

    #[tokio::test]
    async fn scripts_are_consumed_in_order() {
        let ledger = ScriptedLedger::with_scripts([Script::succeed_after(2), Script::revert()]);

        let first = ledger.send_transaction(&tx(1)).await.unwrap();
        let second = ledger.send_transaction(&tx(2)).await.unwrap();
        assert_ne!(first, second);

        assert_eq!(ledger.transaction_receipt(&first).await.unwrap(), None);
        assert_eq!(ledger.transaction_receipt(&first).await.unwrap(), None);
        assert!(ledger.transaction_receipt(&first).await.unwrap().unwrap().succeeded());

        let r = ledger.transaction_receipt(&second).await.unwrap().unwrap();
        assert_eq!(r.status, Some(false));
        assert_eq!(ledger.broadcasts().len(), 2);
    }

    #[tokio::test]
    async fn rejection_is_recorded_without_a_broadcast() {
        let ledger = ScriptedLedger::with_scripts([Script::reject("insufficient funds")]);
        let err = ledger.send_transaction(&tx(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rpc { .. }));
        assert!(ledger.broadcasts().is_empty());
        assert_eq!(ledger.send_attempts(), 1);
    }

    #[tokio::test]
    async fn never_mined_and_unknown_handles_have_no_receipt() {
        let ledger = ScriptedLedger::new().with_fallback(Script::NeverMine);
        let handle = ledger.send_transaction(&tx(1)).await.unwrap();
        for _ in 0..5 {
            assert_eq!(ledger.transaction_receipt(&handle).await.unwrap(), None);
        }
        let unknown = TransactionHandle::new(H256::repeat_byte(0xff));
        assert_eq!(ledger.transaction_receipt(&unknown).await.unwrap(), None);
        assert_eq!(ledger.receipt_queries(), 6);
    }
}
