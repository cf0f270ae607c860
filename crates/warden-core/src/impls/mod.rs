//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **JsonRpcLedger**: 本番用（HTTP JSON-RPC ノード）
//! - **ScriptedLedger**: 開発用・テスト用の in-memory ledger
//! - **TracingEventSink** / **RecordingEventSink**

pub mod event_sinks;
pub mod json_rpc;
pub mod scripted;

pub use self::event_sinks::{RecordingEventSink, TracingEventSink};
pub use self::json_rpc::JsonRpcLedger;
pub use self::scripted::{LedgerCall, Script, ScriptedLedger};
