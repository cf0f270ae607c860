//! SequencerBuilder - sequencer の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に gas limit / poll interval / アドレスを検証
//! - 不正な設定は最初の broadcast より前に BuildError になる

use std::sync::Arc;
use std::time::Duration;

use ethers_core::types::{Address, U256};

use super::multisig::MultisigWrapper;
use super::poller::{ConfirmationPoller, PollPolicy};
use super::sequencer::StepSequencer;
use super::submitter::TransactionSubmitter;
use crate::config::SetupConfig;
use crate::impls::TracingEventSink;
use crate::ports::{EventSink, Ledger};

/// Gas for every submission unless configured otherwise.
pub const DEFAULT_GAS_LIMIT: u64 = 3_000_000;

/// BuildError は sequencer 構築時のエラー
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("gas limit must be greater than zero")]
    ZeroGasLimit,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("max wait must be greater than zero when set")]
    ZeroMaxWait,

    #[error("operator address is zero")]
    ZeroOperator,

    #[error("multisig wallet address is zero")]
    ZeroWallet,
}

/// # 使用例
/// ```ignore
/// let sequencer = SequencerBuilder::new(ledger, wrapper, operator)
///     .gas_limit(U256::from(3_000_000))
///     .poll_policy(PollPolicy::default().with_max_wait(Duration::from_secs(600)))
///     .build()?;
/// ```
pub struct SequencerBuilder {
    ledger: Arc<dyn Ledger>,
    wrapper: MultisigWrapper,
    operator: Address,
    gas_limit: U256,
    poll: PollPolicy,
    events: Arc<dyn EventSink>,
}

impl SequencerBuilder {
    pub fn new(ledger: Arc<dyn Ledger>, wrapper: MultisigWrapper, operator: Address) -> Self {
        Self {
            ledger,
            wrapper,
            operator,
            gas_limit: U256::from(DEFAULT_GAS_LIMIT),
            poll: PollPolicy::default(),
            events: Arc::new(TracingEventSink),
        }
    }

    /// Operator, gas limit and poll policy taken from `config`.
    pub fn from_config(ledger: Arc<dyn Ledger>, wrapper: MultisigWrapper, config: &SetupConfig) -> Self {
        Self::new(ledger, wrapper, config.operator)
            .gas_limit(config.gas_limit)
            .poll_policy(config.poll)
    }

    pub fn gas_limit(mut self, gas_limit: U256) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn build(self) -> Result<StepSequencer, BuildError> {
        if self.gas_limit.is_zero() {
            return Err(BuildError::ZeroGasLimit);
        }
        if self.poll.interval == Duration::ZERO {
            return Err(BuildError::ZeroPollInterval);
        }
        if self.poll.max_wait == Some(Duration::ZERO) {
            return Err(BuildError::ZeroMaxWait);
        }
        if self.operator.is_zero() {
            return Err(BuildError::ZeroOperator);
        }
        if self.wrapper.wallet().is_zero() {
            return Err(BuildError::ZeroWallet);
        }

        let submitter = TransactionSubmitter::new(Arc::clone(&self.ledger), self.operator, self.gas_limit);
        let poller = ConfirmationPoller::new(self.ledger, self.poll);
        Ok(StepSequencer::new(self.wrapper, submitter, poller, self.events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::ScriptedLedger;
    use rstest::rstest;

    fn builder() -> SequencerBuilder {
        SequencerBuilder::new(
            Arc::new(ScriptedLedger::new()),
            MultisigWrapper::new(Address::repeat_byte(0x55)),
            Address::repeat_byte(0xee),
        )
    }

    #[test]
    fn defaults_build() {
        assert!(builder().build().is_ok());
    }

    #[rstest]
    #[case::zero_gas(builder().gas_limit(U256::zero()), BuildError::ZeroGasLimit)]
    #[case::zero_interval(builder().poll_policy(PollPolicy::new(Duration::ZERO)), BuildError::ZeroPollInterval)]
    #[case::zero_max_wait(
        builder().poll_policy(PollPolicy::default().with_max_wait(Duration::ZERO)),
        BuildError::ZeroMaxWait
    )]
    fn invalid_settings_fail_fast(#[case] builder: SequencerBuilder, #[case] expected: BuildError) {
        assert_eq!(builder.build().err(), Some(expected));
    }

    #[test]
    fn zero_addresses_are_rejected() {
        let zero_operator = SequencerBuilder::new(
            Arc::new(ScriptedLedger::new()),
            MultisigWrapper::new(Address::repeat_byte(0x55)),
            Address::zero(),
        );
        assert_eq!(zero_operator.build().err(), Some(BuildError::ZeroOperator));

        let zero_wallet = SequencerBuilder::new(
            Arc::new(ScriptedLedger::new()),
            MultisigWrapper::new(Address::zero()),
            Address::repeat_byte(0xee),
        );
        assert_eq!(zero_wallet.build().err(), Some(BuildError::ZeroWallet));
    }
}
