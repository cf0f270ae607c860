//! Ledger port - the only two ledger capabilities the orchestrator needs.
//!
//! # 設計原則
//! - broadcast と receipt 取得だけ（汎用クライアントではない）
//! - 署名・nonce 管理はノード側（operator アカウントは unlock 済み前提）
//! - receipt が無い（未採掘）は `Ok(None)`、エラーではない

use async_trait::async_trait;
use ethers_core::types::{Address, U256};
use thiserror::Error;

use crate::domain::{CallPayload, Receipt, TransactionHandle};

/// A transaction as handed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingTransaction {
    pub from: Address,
    pub gas: U256,
    pub payload: CallPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Broadcasts `tx`. Success means accepted into the pending pool, not final.
    async fn send_transaction(&self, tx: &OutgoingTransaction) -> Result<TransactionHandle, LedgerError>;

    /// Receipt for `handle`, or `None` while the transaction is not yet mined.
    async fn transaction_receipt(&self, handle: &TransactionHandle) -> Result<Option<Receipt>, LedgerError>;
}
