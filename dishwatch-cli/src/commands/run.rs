//! Run command - monitor the terminal until interrupted.
//!
//! Deltas go to stdout, one JSON document per line; logs go to the log file
//! (and stderr unless disabled).

use std::sync::Arc;

use dishwatch::feed::{NmeaFeedReceiver, NmeaFeedReceiverConfig};
use dishwatch::service::{Monitor, MonitorConfig};
use dishwatch::telemetry::{JsonLinesSink, TelemetrySink};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::{CliRunner, RunnerOptions};

/// Buffered positions between the feed receiver and the movement task.
const POSITION_CHANNEL_CAPACITY: usize = 32;

pub fn run(options: RunnerOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(&options)?;
    runner.log_startup("run");

    let config = runner.config();
    let monitor_config = MonitorConfig::from_config_file(config);
    let link = runner.device_link();
    let sink: Arc<dyn TelemetrySink> = Arc::new(JsonLinesSink::new(std::io::stdout()));
    let feed_port = config.movement.feed_port;

    info!(
        url = %config.device.url,
        status_interval_s = config.status.poll_interval,
        gps = config.gps.retrieve,
        stow_while_moving = config.movement.stow_while_moving,
        feed_port,
        "Starting monitor"
    );

    let runtime = runner.runtime()?;
    runtime.block_on(async move {
        let mut monitor = Monitor::new(monitor_config, link, sink);

        let receiver = if feed_port != 0 {
            let (tx, rx) = mpsc::channel(POSITION_CHANNEL_CAPACITY);
            let receiver = NmeaFeedReceiver::bind(
                NmeaFeedReceiverConfig {
                    port: feed_port,
                    ..Default::default()
                },
                tx,
            )
            .await?;
            monitor = monitor.with_position_feed(rx);
            Some(receiver)
        } else {
            info!("NMEA receiver disabled (feed_port = 0)");
            None
        };

        let handle = monitor.start();
        let cancellation = handle.cancellation_token();
        let receiver_handle = receiver.map(|r| r.start(cancellation.clone()));

        let signal_token = cancellation.clone();
        ctrlc::set_handler(move || signal_token.cancel())
            .map_err(|e| CliError::Runtime(format!("Failed to set signal handler: {}", e)))?;

        cancellation.cancelled().await;
        info!("Shutdown requested");
        eprintln!("Shutting down...");

        handle.join().await;
        if let Some(receiver_handle) = receiver_handle {
            join_receiver(receiver_handle).await;
        }

        Ok::<(), CliError>(())
    })
}

/// Wait for the feed receiver; returns `false` if it panicked or was aborted.
async fn join_receiver(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "NMEA receiver ended abnormally");
            false
        }
    }
}
