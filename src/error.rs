//! # Error Types
//!
//! Custom error types for the Bresser receiver using `thiserror`.

use thiserror::Error;

use crate::bresser::protocol::DecodeError;

/// Main error type for the Bresser receiver
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Payload decode rejections
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// No radio modem device could be opened
    #[error("No serial device found, tried: {0}")]
    SerialPortNotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the Bresser receiver
pub type Result<T> = std::result::Result<T, ReceiverError>;
