//! warden-core
//!
//! Multisig-gated transaction orchestration: every administrative call is
//! encoded, wrapped into a multisig `submitTransaction`, broadcast, and polled
//! to a definitive receipt before the next one starts.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（signature, contract, step, payload, receipt, outcome, events, ids）
//! - **ports**: 抽象化レイヤー（Ledger, EventSink）
//! - **app**: orchestrator 本体（encoder, multisig, submitter, poller, sequencer, builder, plan）
//! - **impls**: 実装（JsonRpcLedger、開発用の ScriptedLedger、EventSink 実装）
//! - **config** / **artifacts** / **version**: 起動時に一度だけ読む入力
//! - **error**: エラー型

pub mod app;
pub mod artifacts;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod version;

pub use crate::app::{SequencerBuilder, StepSequencer};
pub use crate::config::SetupConfig;
pub use crate::error::{ErrorKind, WardenError};
