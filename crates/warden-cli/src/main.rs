//! `warden` -- runs the multisig-gated vault setup once.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default                 | Description                          |
//! |--------------------------|----------|-------------------------|--------------------------------------|
//! | `VAULT`                  | no       | --                      | Gate; nothing runs unless truthy     |
//! | `ETH_RPC_URL`            | no       | `http://127.0.0.1:8545` | JSON-RPC endpoint                    |
//! | `OPERATOR_ADDRESS`       | yes      | --                      | Unlocked account that submits        |
//! | `DEPLOYMENT_ARTIFACTS`   | yes      | --                      | Contract addresses + signatures JSON |
//! | `MULTISIG_INSTANCE_FILE` | yes      | --                      | File holding the wallet address      |
//! | `GAS_LIMIT`              | no       | `3000000`               | Gas per submission                   |
//! | `POLL_INTERVAL_MS`       | no       | `1000`                  | Receipt poll interval                |
//! | `MAX_WAIT_SECS`          | no       | unbounded               | Per-step confirmation deadline       |
//! | `VAULT_ID_ETH`           | no       | `1`                     | Vault id of the ETH vault            |
//! | `VAULT_ID_ERC20`         | no       | `2`                     | Vault id of the ERC20 vault          |
//! | `TX_TYPE_PAYMENT`        | no       | `1`                     | Tx type of the payment exit game     |
//! | `TX_TYPE_FEE`            | no       | `3`                     | Tx type of the fee exit game         |
//! | `PROTOCOL_MORE_VP`       | no       | `2`                     | Protocol id for both exit games      |
//! | `PACKAGE_VERSION`        | no       | crate version           | Version part of the version string   |
//! | `SOURCE_REVISION`        | no       | `git rev-parse HEAD`    | Revision in the version string       |

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warden_core::app::{MultisigWrapper, vault_setup_plan};
use warden_core::artifacts::Deployment;
use warden_core::config::{self, ETH_RPC_URL, SetupConfig};
use warden_core::domain::Step;
use warden_core::error::ConfigError;
use warden_core::impls::{JsonRpcLedger, TracingEventSink};
use warden_core::{SequencerBuilder, StepSequencer, WardenError, version};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warden_core=info,warden_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !config::gate_enabled_from_env() {
        tracing::info!("{} is not set, skipping vault setup", config::VAULT_GATE);
        return ExitCode::SUCCESS;
    }

    let (sequencer, steps) = match prepare().await {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "setup could not start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, no further step will be broadcast");
            // ignore send error: the run may already be over
            let _ = shutdown_tx.send(true);
        }
    });

    let outcome = sequencer.run(&steps, shutdown_rx).await;

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("cannot serialize outcome: {e}"),
    }

    if outcome.is_success() {
        tracing::info!(run_id = %outcome.run_id, steps = outcome.steps.len(), "vault setup complete");
        ExitCode::SUCCESS
    } else {
        if let Some(failed) = outcome.first_failure() {
            tracing::error!(
                run_id = %outcome.run_id,
                step = failed.index,
                kind = ?failed.status.error_kind(),
                confirmed = outcome.confirmed_count(),
                "vault setup halted at {}",
                failed.description,
            );
        }
        ExitCode::FAILURE
    }
}

/// Everything that can fail before the first broadcast.
async fn prepare() -> Result<(StepSequencer, Vec<Step>), WardenError> {
    let config = SetupConfig::from_env()?;
    let deployment = Deployment::load(&config.artifacts_path)?;
    let wrapper = MultisigWrapper::from_instance_file(&config.multisig_instance_file)?;
    let version = version::resolve_version(&config).await?;
    let steps = vault_setup_plan(&deployment, &config.plan, &version)?;

    let ledger = JsonRpcLedger::new(config.rpc_url.clone()).map_err(|e| ConfigError::InvalidVar {
        name: ETH_RPC_URL,
        value: config.rpc_url.clone(),
        reason: e.to_string(),
    })?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        wallet = ?wrapper.wallet(),
        operator = ?config.operator,
        %version,
        steps = steps.len(),
        "prepared vault setup"
    );

    let sequencer = SequencerBuilder::from_config(Arc::new(ledger), wrapper, &config)
        .event_sink(Arc::new(TracingEventSink))
        .build()?;
    Ok((sequencer, steps))
}
