//! # Bresser Payload Decoder
//!
//! Decodes a whitened 26-byte Bresser 7-in-1 radio payload into a
//! [`WeatherRecord`].

use super::digest::lfsr_digest16;
use super::protocol::*;

/// Nibble selector for BCD digit extraction
#[derive(Debug, Clone, Copy)]
enum Nibble {
    Hi,
    Lo,
}

use Nibble::{Hi, Lo};

/// BCD digit positions within the de-whitened payload, most significant
/// digit first. Offsets are fixed by the over-the-air format.
const WIND_DIR_DIGITS: &[(usize, Nibble)] = &[(4, Hi), (4, Lo), (5, Hi)];
const WIND_GUST_DIGITS: &[(usize, Nibble)] = &[(7, Hi), (7, Lo), (8, Hi)];
const WIND_AVG_DIGITS: &[(usize, Nibble)] = &[(8, Lo), (9, Hi), (9, Lo)];
const RAIN_DIGITS: &[(usize, Nibble)] = &[
    (10, Hi), (10, Lo), (11, Hi), (11, Lo), (12, Hi), (12, Lo),
];
const TEMP_DIGITS: &[(usize, Nibble)] = &[(14, Hi), (14, Lo), (15, Hi)];
const HUMIDITY_DIGITS: &[(usize, Nibble)] = &[(16, Hi), (16, Lo)];
const LIGHT_DIGITS: &[(usize, Nibble)] = &[
    (17, Hi), (17, Lo), (18, Hi), (18, Lo), (19, Hi), (19, Lo),
];
const UV_DIGITS: &[(usize, Nibble)] = &[(20, Hi), (20, Lo), (21, Hi)];

fn nibble(byte: u8, which: Nibble) -> u8 {
    match which {
        Hi => byte >> 4,
        Lo => byte & 0x0F,
    }
}

/// Fold a table of (byte offset, nibble selector) pairs into a decimal value
fn bcd_value(payload: &[u8], digits: &[(usize, Nibble)]) -> u32 {
    digits
        .iter()
        .fold(0, |acc, &(offset, which)| {
            acc * 10 + u32::from(nibble(payload[offset], which))
        })
}

/// Decode a complete 7-in-1 radio payload
///
/// # Arguments
///
/// * `msg` - Raw (whitened) payload, exactly [`MSG_BUF_SIZE`] bytes
///
/// # Returns
///
/// * `Result<WeatherRecord, DecodeError>` - Decoded record, or the decode
///   status describing the rejection
///
/// # Errors
///
/// Returns an error if:
/// - The payload length differs from 26 bytes (`Parameter`)
/// - The raw sanity byte at offset 21 is zero (`Invalid`)
/// - The embedded checksum does not match the computed digest (`Digest`)
///
/// The caller's buffer is never mutated and the decoder keeps no state
/// between calls; decoding is a single pass over one frame.
pub fn decode_payload(msg: &[u8]) -> Result<WeatherRecord, DecodeError> {
    if msg.len() != MSG_BUF_SIZE {
        return Err(DecodeError::Parameter { len: msg.len() });
    }

    // Sanity marker is checked on the original byte value, before
    // de-whitening
    if msg[SANITY_BYTE_OFFSET] == 0x00 {
        return Err(DecodeError::Invalid);
    }

    // Data de-whitening into a local buffer
    let mut msgw = [0u8; MSG_BUF_SIZE];
    for (out, &byte) in msgw.iter_mut().zip(msg) {
        *out = byte ^ WHITENING_MASK;
    }

    // LFSR-16 digest, generator 0x8810 key 0xBA95 final xor 0x6DF1
    let expected = u16::from_be_bytes([msgw[0], msgw[1]]);
    let computed = lfsr_digest16(
        &msgw[DIGEST_OFFSET..DIGEST_OFFSET + DIGEST_LEN],
        DIGEST_GENERATOR,
        DIGEST_KEY,
    );
    if expected ^ computed != DIGEST_FINAL_XOR {
        return Err(DecodeError::Digest { expected, computed });
    }

    let flags = msgw[15] & 0x0F;
    let battery_low = flags & 0x06 == 0x06;

    let wind_direction_deg = bcd_value(&msgw, WIND_DIR_DIGITS) as f32;
    let wind_gust_meter_sec = bcd_value(&msgw, WIND_GUST_DIGITS) as f32 * 0.1;
    let wind_avg_meter_sec = bcd_value(&msgw, WIND_AVG_DIGITS) as f32 * 0.1;
    let rain_mm = bcd_value(&msgw, RAIN_DIGITS) as f32 * 0.1;

    // Offset-encoded negative range: raw readings above 60.0 degC are
    // reinterpreted as [-40.0, -0.1] degC. 600 itself is a positive 60.0.
    let temp_raw = bcd_value(&msgw, TEMP_DIGITS);
    let temp_c = if temp_raw > 600 {
        (temp_raw as f32 - 1000.0) * 0.1
    } else {
        temp_raw as f32 * 0.1
    };

    let humidity = bcd_value(&msgw, HUMIDITY_DIGITS) as u8;
    let light_raw = bcd_value(&msgw, LIGHT_DIGITS);
    let uv = bcd_value(&msgw, UV_DIGITS) as f32 * 0.1;

    Ok(WeatherRecord {
        sensor_id: u32::from(u16::from_be_bytes([msgw[2], msgw[3]])),
        // Sensor type comes from the raw byte, no de-whitening
        s_type: msg[6] >> 4,
        startup: msgw[6] & 0x08 == 0x00,
        chan: msgw[6] & 0x07,
        battery_ok: !battery_low,
        temp_c,
        temp_ok: true,
        humidity,
        humidity_ok: true,
        wind_gust_meter_sec,
        wind_avg_meter_sec,
        wind_direction_deg,
        wind_ok: true,
        rain_mm,
        rain_ok: true,
        light_lux: light_raw as f32,
        light_klx: light_raw as f32 * 0.001,
        light_ok: true,
        uv,
        uv_ok: true,
        valid: true,
        complete: true,
    })
}
