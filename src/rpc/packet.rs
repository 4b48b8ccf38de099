//! Packet data model and the shared checksum.
//!
//! Wire format:
//! ```text
//! ┌───────┬─────────┬────────┬────────────────┬──────────┐
//! │ START │ COMMAND │ LENGTH │ PAYLOAD        │ CHECKSUM │
//! │ 0xAA  │ 1B      │ 1B     │ 0–10B          │ 1B       │
//! └───────┴─────────┴────────┴────────────────┴──────────┘
//! ```
//!
//! CHECKSUM is the 8-bit wrapping sum of every preceding byte, START
//! included. Multi-byte values inside a payload are little-endian.

use heapless::Vec;

use crate::error::FrameError;

/// Frame synchronisation byte.
pub const START_MARKER: u8 = 0xAA;

/// Maximum payload bytes per frame.
pub const MAX_PAYLOAD: usize = 10;

/// START + COMMAND + LENGTH + CHECKSUM.
pub const FRAME_OVERHEAD: usize = 4;

/// Largest possible encoded frame.
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD;

/// Single-byte acknowledgment sent after every completed frame attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Response {
    /// Frame passed length and checksum validation.
    Ack = 0x06,
    /// Length overflow or checksum mismatch; the sender should retry.
    Nack = 0x15,
}

impl Response {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x06 => Some(Self::Ack),
            0x15 => Some(Self::Nack),
            _ => None,
        }
    }
}

/// 8-bit wrapping sum over `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Trailer byte of the frame carrying `command_id` and `payload`.
///
/// Both the decoder's verification and every encoder go through this.
/// `payload` must already be at most [`MAX_PAYLOAD`] bytes.
pub fn frame_checksum(command_id: u8, payload: &[u8]) -> u8 {
    checksum(&[START_MARKER, command_id, payload.len() as u8]).wrapping_add(checksum(payload))
}

/// One command or reply. The payload capacity is part of the type, so a
/// packet claiming more than [`MAX_PAYLOAD`] bytes cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    command_id: u8,
    payload: Vec<u8, MAX_PAYLOAD>,
}

impl Packet {
    /// Build a packet, rejecting oversized payloads.
    pub fn new(command_id: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload =
            Vec::from_slice(payload).map_err(|()| FrameError::PayloadTooLarge(payload.len()))?;
        Ok(Self {
            command_id,
            payload,
        })
    }

    /// Packet with no payload.
    pub fn empty(command_id: u8) -> Self {
        Self {
            command_id,
            payload: Vec::new(),
        }
    }

    /// Packet carrying a single `f32`, little-endian.
    pub fn from_f32(command_id: u8, value: f32) -> Self {
        let mut payload = Vec::new();
        // 4 bytes always fit in MAX_PAYLOAD.
        let _ = payload.extend_from_slice(&value.to_le_bytes());
        Self {
            command_id,
            payload,
        }
    }

    pub(crate) fn from_parts(command_id: u8, payload: Vec<u8, MAX_PAYLOAD>) -> Self {
        Self {
            command_id,
            payload,
        }
    }

    pub fn command_id(&self) -> u8 {
        self.command_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_len(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Interpret the first four payload bytes as a little-endian `f32`.
    pub fn payload_f32(&self) -> Option<f32> {
        let bytes: [u8; 4] = self.payload.get(..4)?.try_into().ok()?;
        Some(f32::from_le_bytes(bytes))
    }

    /// Checksum this packet carries on the wire.
    pub fn checksum(&self) -> u8 {
        frame_checksum(self.command_id, &self.payload)
    }

    /// Encoded length on the wire (`4 + len`).
    pub fn frame_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut out = Vec::new();
        let _ = out.push(START_MARKER);
        let _ = out.push(self.command_id);
        let _ = out.push(self.payload_len());
        let _ = out.extend_from_slice(&self.payload);
        let _ = out.push(self.checksum());
        out
    }
}
