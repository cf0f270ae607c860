//! Outcome model: what a sequencer run reports back to its caller.
//!
//! The report covers every declared step. Steps after the first failure are
//! kept as `NOT_ATTEMPTED` so the caller sees exactly where the run stopped
//! and which steps remain applied on the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::RunId;
use super::receipt::{Receipt, TransactionHandle};
use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    NotAttempted,
    Confirmed {
        transaction: TransactionHandle,
        receipt: Receipt,
    },
    /// Mined, status flag unset.
    Reverted {
        transaction: TransactionHandle,
        receipt: Receipt,
    },
    /// Encoding, submission, timeout, cancellation or receipt query failure.
    Errored {
        kind: ErrorKind,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transaction: Option<TransactionHandle>,
    },
}

impl StepStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, StepStatus::Confirmed { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepStatus::Reverted { .. } | StepStatus::Errored { .. })
    }

    /// Failure classification; `None` unless the step failed.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            StepStatus::Reverted { .. } => Some(ErrorKind::Reverted),
            StepStatus::Errored { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub description: String,
    #[serde(flatten)]
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOutcome {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepReport>,
}

impl SequenceOutcome {
    /// Every step starts as not attempted.
    pub fn new<I, S>(run_id: RunId, descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps = descriptions
            .into_iter()
            .enumerate()
            .map(|(index, description)| StepReport {
                index,
                description: description.into(),
                status: StepStatus::NotAttempted,
            })
            .collect();
        Self {
            run_id,
            started_at: Utc::now(),
            finished_at: None,
            steps,
        }
    }

    pub(crate) fn record(&mut self, index: usize, status: StepStatus) {
        if let Some(report) = self.steps.get_mut(index) {
            report.status = status;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when every step was confirmed (vacuously true for no steps).
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.status.is_confirmed())
    }

    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.status.is_failure())
    }

    pub fn confirmed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.status.is_confirmed()).count()
    }
}
