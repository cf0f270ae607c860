//! App - アプリケーション層
//!
//! ports を組み合わせて orchestrator を実装します。
//!
//! # 主要コンポーネント
//! - **encoder**: selector + ABI encoding
//! - **MultisigWrapper**: `submitTransaction` で包む
//! - **TransactionSubmitter**: broadcast のみ
//! - **ConfirmationPoller**: receipt が terminal になるまで poll
//! - **StepSequencer**: 上記を step ごとに直列実行（fail-fast）
//! - **SequencerBuilder**: 構築とワイヤリング
//! - **plan**: vault setup の 8 step

pub mod builder;
pub mod encoder;
pub mod multisig;
pub mod plan;
pub mod poller;
pub mod sequencer;
pub mod submitter;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SequencerBuilder};
pub use self::encoder::{encode_call, encode_step};
pub use self::multisig::MultisigWrapper;
pub use self::plan::{PlanConstants, vault_setup_plan};
pub use self::poller::{ConfirmationPoller, PollPolicy};
pub use self::sequencer::StepSequencer;
pub use self::submitter::TransactionSubmitter;
