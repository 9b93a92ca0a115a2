//! # Telemetry Module
//!
//! Handles measurement record logging to JSONL files with rotation.
//!
//! This module handles:
//! - Stamping decoded records with a UTC receive time
//! - Formatting as JSONL (JSON Lines)
//! - Writing to rotating record files
//! - Managing file rotation (max N records per file)
//! - Retaining only the last M files

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::bresser::protocol::WeatherRecord;
use crate::config::TelemetryConfig;
use crate::error::Result;

const FILE_PREFIX: &str = "records-";
const FILE_SUFFIX: &str = ".jsonl";

/// A decoded record stamped with its receive time
///
/// The decoder is a pure function of the payload; wall-clock time is
/// attached here, at the sink.
#[derive(Serialize)]
struct TimestampedRecord<'a> {
    time: DateTime<Utc>,
    #[serde(flatten)]
    record: &'a WeatherRecord,
}

/// JSONL sink for decoded measurement records
pub struct RecordLogger {
    dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    file: Option<File>,
    records_in_file: usize,
    next_index: u64,
}

impl RecordLogger {
    /// Create a logger writing under the configured directory
    ///
    /// The directory is created if missing. Numbering resumes after the
    /// highest-numbered record file already present.
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        let dir = PathBuf::from(&config.log_dir);
        fs::create_dir_all(&dir)?;

        let next_index = record_files(&dir)?
            .last()
            .map(|&(index, _)| index + 1)
            .unwrap_or(1);

        Ok(Self {
            dir,
            max_records_per_file: config.max_records_per_file,
            max_files_to_keep: config.max_files_to_keep,
            file: None,
            records_in_file: 0,
            next_index,
        })
    }

    /// Append one record as a JSON line, rotating files as needed
    pub fn log(&mut self, record: &WeatherRecord) -> Result<()> {
        if self.file.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        let entry = TimestampedRecord {
            time: Utc::now(),
            record,
        };
        let line = serde_json::to_string(&entry).map_err(std::io::Error::from)?;

        // rotate() always leaves an open file behind
        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", line)?;
            self.records_in_file += 1;
        }

        Ok(())
    }

    /// Open the next record file and drop the oldest beyond the retention
    /// limit
    fn rotate(&mut self) -> Result<()> {
        let name = format!("{}{:05}{}", FILE_PREFIX, self.next_index, FILE_SUFFIX);
        let file = File::create(self.dir.join(name))?;

        self.file = Some(file);
        self.records_in_file = 0;
        self.next_index += 1;

        let files = record_files(&self.dir)?;
        if files.len() > self.max_files_to_keep {
            for (_, path) in &files[..files.len() - self.max_files_to_keep] {
                fs::remove_file(path)?;
            }
        }

        Ok(())
    }
}

/// Record files in the directory, sorted by index
fn record_files(dir: &Path) -> Result<Vec<(u64, PathBuf)>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(index) = file_index(&name.to_string_lossy()) {
            files.push((index, entry.path()));
        }
    }

    files.sort();
    Ok(files)
}

fn file_index(name: &str) -> Option<u64> {
    name.strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?
        .parse()
        .ok()
}
