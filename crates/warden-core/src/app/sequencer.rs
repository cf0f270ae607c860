//! StepSequencer - encode → wrap → submit → poll を 1 step ずつ
//!
//! # 保証
//! - step n が terminal になるまで step n+1 は submit しない
//! - 同じ run の中で同じ step を二度 submit しない
//! - 最初の失敗で停止（rollback はしない）、残りは NOT_ATTEMPTED
//! - shutdown 後は新しい broadcast をしない

use std::sync::Arc;

use tokio::sync::watch;

use super::multisig::MultisigWrapper;
use super::poller::ConfirmationPoller;
use super::submitter::TransactionSubmitter;
use crate::domain::{RunId, SequenceOutcome, SetupEvent, Step, StepStatus, Terminal};
use crate::error::{ErrorKind, WardenError};
use crate::ports::EventSink;

/// Built by [`SequencerBuilder`](super::builder::SequencerBuilder).
pub struct StepSequencer {
    wrapper: MultisigWrapper,
    submitter: TransactionSubmitter,
    poller: ConfirmationPoller,
    events: Arc<dyn EventSink>,
}

impl StepSequencer {
    pub(crate) fn new(
        wrapper: MultisigWrapper,
        submitter: TransactionSubmitter,
        poller: ConfirmationPoller,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            wrapper,
            submitter,
            poller,
            events,
        }
    }

    /// Runs `steps` in order and reports every one of them.
    ///
    /// Failures are part of the outcome rather than an `Err`: the caller
    /// needs to know which steps are already applied on the ledger.
    pub async fn run(&self, steps: &[Step], mut shutdown: watch::Receiver<bool>) -> SequenceOutcome {
        let run_id = RunId::generate();
        let mut outcome = SequenceOutcome::new(run_id, steps.iter().map(|s| s.description().to_string()));
        tracing::info!(
            %run_id,
            steps = steps.len(),
            wallet = ?self.wrapper.wallet(),
            operator = ?self.submitter.operator(),
            "starting setup sequence"
        );

        for (index, step) in steps.iter().enumerate() {
            let status = if *shutdown.borrow() {
                tracing::warn!(%run_id, step = index, "shutdown requested, not broadcasting {}", step.description());
                StepStatus::Errored {
                    kind: ErrorKind::Cancelled,
                    message: "shutdown requested before broadcast".into(),
                    transaction: None,
                }
            } else {
                tracing::info!(%run_id, step = index, "{}", step.description());
                match self.execute(run_id, index, step, &mut shutdown).await {
                    Ok(status) => status,
                    Err(err) => StepStatus::Errored {
                        kind: err.kind(),
                        message: err.to_string(),
                        transaction: err.transaction(),
                    },
                }
            };

            let halt = match &status {
                StepStatus::Reverted { transaction, .. } => {
                    Some((ErrorKind::Reverted, format!("transaction {transaction} reverted")))
                }
                StepStatus::Errored { kind, message, .. } => Some((*kind, message.clone())),
                _ => None,
            };
            outcome.record(index, status);

            if let Some((kind, message)) = halt {
                self.events.emit(&SetupEvent::SequenceHalted {
                    run_id,
                    index,
                    kind,
                    message,
                });
                outcome.finish();
                return outcome;
            }
        }

        self.events.emit(&SetupEvent::SequenceCompleted {
            run_id,
            steps: steps.len(),
        });
        outcome.finish();
        outcome
    }

    async fn execute(
        &self,
        run_id: RunId,
        index: usize,
        step: &Step,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<StepStatus, WardenError> {
        let payload = self.wrapper.wrap_step(step)?;
        let transaction = self.submitter.submit(payload).await?;

        self.events.emit(&SetupEvent::StepSubmitted {
            run_id,
            index,
            description: step.description().to_string(),
            transaction,
        });
        self.events.emit(&SetupEvent::AwaitingReceipt {
            run_id,
            index,
            transaction,
        });

        match self.poller.wait_for_terminal(&transaction, shutdown).await? {
            Terminal::Success(receipt) => {
                self.events.emit(&SetupEvent::StepConfirmed {
                    run_id,
                    index,
                    transaction,
                });
                Ok(StepStatus::Confirmed { transaction, receipt })
            }
            Terminal::Failed(receipt) => {
                self.events.emit(&SetupEvent::StepReverted {
                    run_id,
                    index,
                    transaction,
                });
                Ok(StepStatus::Reverted { transaction, receipt })
            }
        }
    }
}
