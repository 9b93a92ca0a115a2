//! # Bresser Receiver Library
//!
//! Receive and decode Bresser 7-in-1 weather sensor transmissions.
//!
//! This library provides the payload decoder for the Bresser 7-in-1 radio
//! format, together with the serial frame acquisition and JSONL record
//! logging used by the `bresser-receiver` binary.

pub mod bresser;
pub mod config;
pub mod error;
pub mod receiver;
pub mod telemetry;
