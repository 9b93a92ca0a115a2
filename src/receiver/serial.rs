//! Serial port handling for the radio modem.

use std::time::Duration;

use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use super::FrameReader;
use crate::config::SerialConfig;
use crate::error::{ReceiverError, Result};

/// Default modem device paths to try when none is configured
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyUSB0", // USB-to-serial adapters (most common for radio modems)
    "/dev/ttyACM0", // USB CDC devices
];

/// Radio Modem Serial Port Handler
///
/// Manages the connection to the transparent radio modem that forwards
/// raw sensor payloads.
pub struct RadioModem {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
}

impl std::fmt::Debug for RadioModem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioModem")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl RadioModem {
    /// Open the modem described by the serial configuration
    ///
    /// When the configured port is empty, auto-detects the device by
    /// trying the default paths in order.
    ///
    /// # Errors
    ///
    /// Returns error if no device could be opened
    pub fn open(config: &SerialConfig) -> Result<Self> {
        if config.port.is_empty() {
            Self::open_with_paths(DEFAULT_DEVICE_PATHS, config)
        } else {
            Self::open_with_paths(&[config.port.as_str()], config)
        }
    }

    /// Open the first path that accepts a connection
    pub fn open_with_paths(paths: &[&str], config: &SerialConfig) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, config) {
                Ok(port) => {
                    info!("Successfully opened radio modem at {}", path);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(ReceiverError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with modem settings (8N1, no flow control)
    fn open_port(path: &str, config: &SerialConfig) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open_native_async()
            .map_err(|e| ReceiverError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Turn the open port into a payload frame reader
    pub fn into_frames(self) -> FrameReader<tokio_serial::SerialStream> {
        FrameReader::new(self.port)
    }
}
