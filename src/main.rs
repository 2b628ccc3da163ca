//! Service entry point.
//!
//! Startup order matters: configuration first (fail fast on semantic
//! errors), then logging, then the runtime with its bounded blocking pool,
//! and only then the subsystems that run on it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use command_gateway::config::{load_config, GatewayConfig};
use command_gateway::directory::{DeviceDirectory, JsonFileSource, NameFilter, PeriodicTask};
use command_gateway::lifecycle::{self, LifecycleController};
use command_gateway::observability;
use command_gateway::session::SessionRegistry;

#[derive(Parser)]
#[command(name = "command-gateway")]
#[command(about = "Device command gateway service", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&config.observability.log_level)?;

    tracing::info!(
        device_file = %config.directory.device_file,
        update_interval_secs = config.directory.update_interval_secs,
        exit_max_wait_secs = config.shutdown.exit_max_wait_secs,
        max_blocking_threads = config.runtime.max_blocking_threads,
        "Configuration loaded"
    );

    let runtime = lifecycle::build_runtime(config.runtime.max_blocking_threads)?;
    runtime.block_on(run(config))
}

async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let controller = LifecycleController::new(
        SessionRegistry::new(),
        Duration::from_secs(config.shutdown.exit_max_wait_secs),
    );
    lifecycle::signals::install(&controller)?;

    let filter = config
        .directory
        .name_filter
        .as_deref()
        .map(NameFilter::new)
        .transpose()?;
    let directory = Arc::new(DeviceDirectory::new(
        JsonFileSource::new(&config.directory.device_file),
        filter,
    ));

    let refresher = Arc::new(PeriodicTask::new(
        directory.clone(),
        Duration::from_secs(config.directory.update_interval_secs),
    ));
    controller.register_task(tokio::spawn({
        let refresher = refresher.clone();
        let cancel = controller.subscribe_cancel();
        async move { refresher.run(cancel).await }
    }));

    // Announce readiness once the first refresh lands.
    controller.register_task(tokio::spawn({
        let directory = directory.clone();
        async move {
            directory.wait_for_ready().await;
            tracing::info!(indexed = directory.len(), "Device directory ready");
        }
    }));

    tracing::info!("command-gateway started");
    controller.run().await;
    Ok(())
}
