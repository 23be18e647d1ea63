use anyhow::{Context, Result};
use std::time::Duration;
use tibber_timer::Config;
use tibber_timer::clock::SystemClock;
use tibber_timer::logging::init_logging;
use tibber_timer::poller::{LogSink, Poller};
use tibber_timer::tibber::TibberClient;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Tibber Timer {} starting up", env!("APP_VERSION"));

    let client = TibberClient::new(&config.tibber).context("Failed to create Tibber client")?;
    let mut poller = Poller::new(
        client,
        SystemClock,
        LogSink::new(),
        config.schedule_options(),
        Duration::from_millis(config.poll_interval_ms),
    );

    // Ctrl-C flips the shutdown flag; the poller finishes its current cycle first
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    poller.run(shutdown_rx).await.context("Poller error")?;
    info!("Shutdown complete");
    Ok(())
}
