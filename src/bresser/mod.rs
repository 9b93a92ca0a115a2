//! # Bresser Protocol Module
//!
//! Implementation of the Bresser 7-in-1 weather sensor radio format.
//!
//! This module handles:
//! - Payload de-whitening and sanity checking
//! - LFSR-16 keyed digest computation and validation
//! - BCD measurement field extraction
//! - The decode status vocabulary shared across the sensor family

pub mod protocol;
pub mod decoder;
pub mod digest;
