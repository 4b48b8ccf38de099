//! Unified error types for the UART command link.
//!
//! Frame-level rejections ([`FrameError`]) are expected on a noisy wire and
//! are answered with a NACK, never propagated as a failure of the link.
//! Everything that *is* a failure of the link funnels into [`Error`].

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible link operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The byte sink refused or failed a write.
    Transport,
    /// The command table has no room for another entry.
    TableFull,
    /// Peripheral initialisation failed.
    Hardware(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport write failed"),
            Self::TableFull => write!(f, "command table full"),
            Self::Hardware(msg) => write!(f, "hardware: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Frame errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Length byte exceeds the payload capacity. Detected before any payload
    /// byte is read.
    LengthOverflow(u8),
    /// Computed checksum disagrees with the received checksum byte.
    ChecksumMismatch { expected: u8, received: u8 },
    /// Caller asked to encode more than `MAX_PAYLOAD` bytes.
    PayloadTooLarge(usize),
    /// Output buffer cannot hold the encoded frame.
    BufferTooSmall { needed: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow(len) => write!(f, "length {len} exceeds payload capacity"),
            Self::ChecksumMismatch { expected, received } => write!(
                f,
                "checksum mismatch (expected 0x{expected:02X}, received 0x{received:02X})"
            ),
            Self::PayloadTooLarge(len) => write!(f, "payload of {len} bytes is too large"),
            Self::BufferTooSmall { needed } => {
                write!(f, "output buffer too small ({needed} bytes needed)")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored blob failed deserialization.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
