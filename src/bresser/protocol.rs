//! # Bresser Protocol Constants and Types
//!
//! Core format definitions for the Bresser 7-in-1 weather sensor radio
//! payload. The constants in this file are part of the over-the-air format
//! contract and must not change.

use serde::Serialize;
use thiserror::Error;

/// Radio payload length in bytes
pub const MSG_BUF_SIZE: usize = 26;

/// Whitening mask applied to every transmitted byte
pub const WHITENING_MASK: u8 = 0xAA;

/// LFSR digest generator polynomial for the 7-in-1 sensor family
pub const DIGEST_GENERATOR: u16 = 0x8810;

/// Initial LFSR digest key for the 7-in-1 sensor family
pub const DIGEST_KEY: u16 = 0xBA95;

/// Final-XOR constant the checksum field must satisfy against the digest
pub const DIGEST_FINAL_XOR: u16 = 0x6DF1;

/// Offset of the digest domain within the de-whitened payload
pub const DIGEST_OFFSET: usize = 2;

/// Length of the digest domain in bytes
pub const DIGEST_LEN: usize = 23;

/// Offset of the sanity marker byte, checked on the raw (whitened) payload
pub const SANITY_BYTE_OFFSET: usize = 21;

/// Decoded measurement record for one received transmission
///
/// Fields are only meaningful on a successful decode. Each measurement is
/// paired with a validity flag so consumers can distinguish "sensor does not
/// report this field" from "field reported and numerically valid"; the
/// 7-in-1 family reports all fields on every successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WeatherRecord {
    /// Sensor ID
    pub sensor_id: u32,

    /// Sensor type code (1 for the 7-in-1 station)
    pub s_type: u8,

    /// Channel (0-7)
    pub chan: u8,

    /// Set while the sensor is in its post-power-up announcement phase
    pub startup: bool,

    /// Battery status (false when the sensor signals battery-low)
    pub battery_ok: bool,

    /// Temperature in degC
    pub temp_c: f32,
    pub temp_ok: bool,

    /// Relative humidity in %
    pub humidity: u8,
    pub humidity_ok: bool,

    /// Wind gust speed in m/s
    pub wind_gust_meter_sec: f32,

    /// Wind average speed in m/s
    pub wind_avg_meter_sec: f32,

    /// Wind direction in deg
    pub wind_direction_deg: f32,
    pub wind_ok: bool,

    /// Rain gauge level in mm
    pub rain_mm: f32,
    pub rain_ok: bool,

    /// Light level in lux
    pub light_lux: f32,

    /// Light level in klx
    pub light_klx: f32,
    pub light_ok: bool,

    /// UV index
    pub uv: f32,
    pub uv_ok: bool,

    /// Record holds decoded data
    pub valid: bool,

    /// All fields of the record were populated
    pub complete: bool,
}

/// Decode failure vocabulary shared across the Bresser sensor family
///
/// The 7-in-1 decoder only ever produces `Invalid`, `Parameter` and
/// `Digest`; the remaining variants belong to sibling decoders for other
/// sensor generations and message types in the same protocol family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Sanity marker byte is zero, payload absent or corrupt
    #[error("sanity check failed: raw payload byte {SANITY_BYTE_OFFSET} is zero")]
    Invalid,

    /// Payload length differs from the fixed frame size
    #[error("invalid payload length {len}, expected {MSG_BUF_SIZE}")]
    Parameter { len: usize },

    /// Add-up checksum mismatch (5-in-1 message format)
    #[error("checksum mismatch")]
    Checksum,

    /// LFSR digest mismatch, corrupted transmission or wrong generator/key
    #[error("digest mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    Digest { expected: u16, computed: u16 },

    /// Frame deliberately ignored
    #[error("frame skipped")]
    Skip,

    /// Receiver slot table exhausted
    #[error("receiver slots full")]
    Full,
}
