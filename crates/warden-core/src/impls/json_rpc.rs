//! JsonRpcLedger - Ethereum JSON-RPC 2.0 over HTTP.
//!
//! Uses `eth_sendTransaction` (the node signs for the unlocked operator
//! account) and `eth_getTransactionReceipt`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ethers_core::types::{H256, TransactionRequest, U64, U256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Receipt, TransactionHandle};
use crate::ports::{Ledger, LedgerError, OutgoingTransaction};

/// Per-request HTTP timeout. Independent of the confirmation deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct JsonRpcLedger {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcLedger {
    pub fn new(url: impl Into<String>) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        tracing::trace!(method, id, "json-rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Transport(format!("{method}: http status {status}")));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(format!("{method}: {e}")))?;
        decode_result(body)
    }
}

#[async_trait]
impl Ledger for JsonRpcLedger {
    async fn send_transaction(&self, tx: &OutgoingTransaction) -> Result<TransactionHandle, LedgerError> {
        let hash: H256 = self.call("eth_sendTransaction", send_params(tx)?).await?;
        Ok(TransactionHandle::new(hash))
    }

    async fn transaction_receipt(&self, handle: &TransactionHandle) -> Result<Option<Receipt>, LedgerError> {
        let params = serde_json::to_value([handle])
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
        let receipt: Option<WireReceipt> = self.call("eth_getTransactionReceipt", params).await?;
        Ok(receipt.map(Receipt::from))
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// The subset of an `eth_getTransactionReceipt` result we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReceipt {
    transaction_hash: H256,
    #[serde(default)]
    block_number: Option<U64>,
    #[serde(default)]
    gas_used: Option<U256>,
    #[serde(default)]
    status: Option<U64>,
}

impl From<WireReceipt> for Receipt {
    fn from(wire: WireReceipt) -> Self {
        Receipt {
            transaction: TransactionHandle::new(wire.transaction_hash),
            block_number: wire.block_number.map(|n| n.as_u64()),
            gas_used: wire.gas_used,
            status: wire.status.map(|s| !s.is_zero()),
        }
    }
}

fn send_params(tx: &OutgoingTransaction) -> Result<Value, LedgerError> {
    let request = TransactionRequest::new()
        .from(tx.from)
        .to(tx.payload.to)
        .gas(tx.gas)
        .value(tx.payload.value)
        .data(tx.payload.data.clone());
    serde_json::to_value([request]).map_err(|e| LedgerError::InvalidResponse(e.to_string()))
}

fn decode_result<T: DeserializeOwned>(body: RpcResponse) -> Result<T, LedgerError> {
    if let Some(err) = body.error {
        return Err(LedgerError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    serde_json::from_value(body.result.unwrap_or(Value::Null))
        .map_err(|e| LedgerError::InvalidResponse(e.to_string()))
}
