//! Unified error type for barlog.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A session snapshot could not be encoded or decoded.
    Codec(CodecError),

    // Storage
    /// Flash read/write/erase failed.
    Storage,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,
}

/// Snapshot encoding/decoding failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Output buffer too small for the encoded snapshot.
    BufferTooSmall,
    /// Input ended before the header or a reading was complete.
    Truncated,
    /// Snapshot written by an unknown format version.
    UnsupportedVersion(u8),
    /// Unknown capacity policy tag.
    InvalidPolicy(u8),
    /// Capacity, cursor and count do not describe a valid log.
    InvalidLayout,
}

// Convenience conversions

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Error::Codec(e)
    }
}
