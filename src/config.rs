//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub decoder: DecoderConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial port configuration for the attached radio modem
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path; empty means auto-detect from the default paths
    pub port: String,

    pub baud_rate: u32,

    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Sensor filtering configuration
///
/// The original receiver compiled its include/exclude ID lists into the
/// firmware; here they are runtime settings. An empty include list accepts
/// every sensor; the exclude list always wins.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DecoderConfig {
    pub sensor_ids_include: Vec<u32>,

    pub sensor_ids_exclude: Vec<u32>,
}

impl DecoderConfig {
    /// Whether a decoded record from this sensor should be kept
    pub fn accepts(&self, sensor_id: u32) -> bool {
        if self.sensor_ids_exclude.contains(&sensor_id) {
            return false;
        }
        self.sensor_ids_include.is_empty() || self.sensor_ids_include.contains(&sensor_id)
    }
}

/// Measurement record sink configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,

    pub log_dir: String,

    pub max_records_per_file: usize,

    pub max_files_to_keep: usize,

    pub format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
            format: default_log_format(),
        }
    }
}

/// Application log configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,

    /// Directory for daily-rolling log files; empty logs to stdout only
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: String::new(),
        }
    }
}

// Default value functions
fn default_baud_rate() -> u32 { 115_200 }
fn default_timeout_ms() -> u64 { 1000 }

fn default_log_dir() -> String { "./records".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }
fn default_log_format() -> String { "jsonl".to_string() }

fn default_log_level() -> String { "info".to_string() }

const VALID_BAUD_RATES: &[u32] = &[9600, 19200, 38400, 57600, 115_200];
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        // Serial port may be empty (auto-detect)
        if !VALID_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                "baud_rate must be one of: 9600, 19200, 38400, 57600, 115200",
            )));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                "timeout_ms must be between 1 and 10000",
            )));
        }

        for id in &self.decoder.sensor_ids_include {
            if self.decoder.sensor_ids_exclude.contains(id) {
                return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                    format!("sensor id {id:#06x} is both included and excluded"),
                )));
            }
        }

        if self.telemetry.enabled && self.telemetry.log_dir.is_empty() {
            return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                "telemetry log_dir cannot be empty when enabled",
            )));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                "max_records_per_file must be greater than 0",
            )));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                "max_files_to_keep must be greater than 0",
            )));
        }

        if self.telemetry.format != "jsonl" {
            return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                "log format must be 'jsonl' (only supported format)",
            )));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(crate::error::ReceiverError::Config(toml::de::Error::custom(
                "logging level must be one of: trace, debug, info, warn, error",
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config {
            serial: SerialConfig::default(),
            decoder: DecoderConfig::default(),
            telemetry: TelemetryConfig::default(),
            logging: LoggingConfig::default(),
        };

        assert!(config.validate().is_ok());
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.telemetry.max_records_per_file, 10000);
        assert_eq!(config.logging.level, "info");
    }

    fn create_valid_config() -> Config {
        Config {
            serial: SerialConfig::default(),
            decoder: DecoderConfig::default(),
            telemetry: TelemetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = create_valid_config();
        config.serial.baud_rate = 420_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_ms_zero() {
        let mut config = create_valid_config();
        config.serial.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_ms_too_high() {
        let mut config = create_valid_config();
        config.serial.timeout_ms = 10001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sensor_id_in_both_lists() {
        let mut config = create_valid_config();
        config.decoder.sensor_ids_include = vec![0x906F];
        config.decoder.sensor_ids_exclude = vec![0x906F];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_dir_when_enabled() {
        let mut config = create_valid_config();
        config.telemetry.enabled = true;
        config.telemetry.log_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_dir_when_disabled() {
        let mut config = create_valid_config();
        config.telemetry.enabled = false;
        config.telemetry.log_dir = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_records_per_file_zero() {
        let mut config = create_valid_config();
        config.telemetry.max_records_per_file = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = create_valid_config();
        config.telemetry.format = "csv".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = create_valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_filter_accepts_all_by_default() {
        let decoder = DecoderConfig::default();
        assert!(decoder.accepts(0x906F));
        assert!(decoder.accepts(0x0001));
    }

    #[test]
    fn test_filter_include_list() {
        let decoder = DecoderConfig {
            sensor_ids_include: vec![0x906F],
            sensor_ids_exclude: vec![],
        };
        assert!(decoder.accepts(0x906F));
        assert!(!decoder.accepts(0x1234));
    }

    #[test]
    fn test_filter_exclude_wins() {
        let decoder = DecoderConfig {
            sensor_ids_include: vec![],
            sensor_ids_exclude: vec![0x1234],
        };
        assert!(decoder.accepts(0x906F));
        assert!(!decoder.accepts(0x1234));
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[serial]
port = "/dev/ttyUSB1"
baud_rate = 57600

[decoder]
sensor_ids_include = [0x906F]

[telemetry]
log_dir = "/tmp/records"

[logging]
level = "debug"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB1");
        assert_eq!(config.serial.baud_rate, 57600);
        assert_eq!(config.decoder.sensor_ids_include, vec![0x906F]);
        assert_eq!(config.telemetry.log_dir, "/tmp/records");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/config.toml");
        assert!(result.is_err());
    }
}
