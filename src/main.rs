//! # Bresser Receiver
//!
//! Receive and decode Bresser 7-in-1 weather sensor transmissions.
//!
//! This application reads raw payload frames from a transparent radio modem
//! on a serial port, decodes them into measurement records, and appends the
//! records to rotating JSONL files.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use bresser_receiver::bresser::decoder::decode_payload;
use bresser_receiver::config::{Config, LoggingConfig};
use bresser_receiver::receiver::RadioModem;
use bresser_receiver::telemetry::RecordLogger;

/// Default configuration file path
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of frames between throughput summary log messages
const SUMMARY_INTERVAL_FRAMES: u64 = 100;

/// Main entry point for the Bresser receiver
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (path from the first CLI argument, or the default)
///    - Set up logging with tracing subscriber
///    - Open the serial connection to the radio modem
///
/// 2. **Main Loop**
///    - Read fixed-length payload frames from the modem
///    - Decode each frame; log and count rejections
///    - Apply the sensor ID filter to decoded records
///    - Append accepted records to the JSONL sink
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Log frame/decode/reject totals
///    - Clean exit
///
/// # Errors
///
/// Returns error if the configuration cannot be loaded, the serial port
/// cannot be opened, or the record sink fails. Decode failures are routine
/// radio noise and never abort the process.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;

    let _log_guard = init_tracing(&config.logging);

    info!("Bresser receiver v{} starting...", env!("CARGO_PKG_VERSION"));

    let modem = RadioModem::open(&config.serial)?;
    info!("Radio modem opened at: {}", modem.device_path());
    let mut frames = modem.into_frames();

    let mut logger = if config.telemetry.enabled {
        Some(RecordLogger::new(&config.telemetry)?)
    } else {
        None
    };

    let mut frames_seen: u64 = 0;
    let mut decoded: u64 = 0;
    let mut rejected: u64 = 0;
    let mut filtered: u64 = 0;

    // Main receive loop
    loop {
        tokio::select! {
            frame = frames.next_frame() => {
                let Some(frame) = frame? else {
                    info!("Frame stream ended");
                    break;
                };
                frames_seen += 1;

                match decode_payload(&frame) {
                    Ok(record) => {
                        if !config.decoder.accepts(record.sensor_id) {
                            filtered += 1;
                            debug!("Skipping filtered sensor {:#06x}", record.sensor_id);
                            continue;
                        }
                        decoded += 1;

                        info!(
                            "Sensor {:#06x} ch {}: {:.1}C {}% wind {:.1}/{:.1}m/s at {:.0}deg rain {:.1}mm light {:.3}klx uv {:.1}",
                            record.sensor_id,
                            record.chan,
                            record.temp_c,
                            record.humidity,
                            record.wind_gust_meter_sec,
                            record.wind_avg_meter_sec,
                            record.wind_direction_deg,
                            record.rain_mm,
                            record.light_klx,
                            record.uv,
                        );

                        if let Some(logger) = logger.as_mut() {
                            logger.log(&record)?;
                        }
                    }
                    Err(e) => {
                        rejected += 1;
                        warn!("Decode failed: {}", e);
                    }
                }

                if frames_seen % SUMMARY_INTERVAL_FRAMES == 0 {
                    info!(
                        "{} frames: {} decoded, {} rejected, {} filtered",
                        frames_seen, decoded, rejected, filtered
                    );
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!(
        "Totals: {} frames, {} decoded, {} rejected, {} filtered",
        frames_seen, decoded, rejected, filtered
    );

    Ok(())
}

/// Initialize the tracing subscriber
///
/// Logs to stdout by default; when the logging config names a directory,
/// logs go to a daily-rolling file there instead. The returned guard must
/// stay alive for the non-blocking writer to flush.
fn init_tracing(config: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    if config.dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        None
    } else {
        let appender = tracing_appender::rolling::daily(&config.dir, "bresser-receiver.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    #[test]
    fn test_summary_interval_constant() {
        // One summary line per hundred frames keeps the log readable at
        // the sensor's ~12s transmission interval
        assert_eq!(SUMMARY_INTERVAL_FRAMES, 100);
    }
}
