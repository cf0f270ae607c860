//! Progress events emitted while a sequence runs.
//!
//! Purely informational: nothing in the sequencer depends on a sink accepting
//! them.

use serde::Serialize;

use super::ids::RunId;
use super::receipt::TransactionHandle;
use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SetupEvent {
    StepSubmitted {
        run_id: RunId,
        index: usize,
        description: String,
        transaction: TransactionHandle,
    },
    AwaitingReceipt {
        run_id: RunId,
        index: usize,
        transaction: TransactionHandle,
    },
    StepConfirmed {
        run_id: RunId,
        index: usize,
        transaction: TransactionHandle,
    },
    StepReverted {
        run_id: RunId,
        index: usize,
        transaction: TransactionHandle,
    },
    SequenceHalted {
        run_id: RunId,
        index: usize,
        kind: ErrorKind,
        message: String,
    },
    SequenceCompleted {
        run_id: RunId,
        steps: usize,
    },
}
