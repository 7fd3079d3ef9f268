//! Unified error types for the thing-node firmware.
//!
//! `Error` covers the boot path in `main`; [`SensorError`] is the typed
//! failure of a single DHT read.  Both are `Copy` so they can be cached
//! (the DHT driver keeps its last result) and passed through events
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Boot-time failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Why a DHT read produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer, or a pulse exceeded its timeout.
    Timeout,
    /// The 8-bit checksum did not match the four data bytes.
    ChecksumMismatch,
    /// The decoded value is outside the sensor's physical range.
    OutOfRange,
    /// The data line could not be driven or sampled.
    Bus,
    /// The sensor was not detected at boot; no read is attempted.
    Unavailable,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "response timeout"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::Bus => write!(f, "data line error"),
            Self::Unavailable => write!(f, "sensor unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
