//! Ports - 外部システムへの抽象化レイヤー
//!
//! 各 trait は外部システム（ledger の JSON-RPC ノード、ログ基盤など）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//! 実装は `impls` にあります。

pub mod event_sink;
pub mod ledger;

pub use self::event_sink::EventSink;
pub use self::ledger::{Ledger, LedgerError, OutgoingTransaction};
