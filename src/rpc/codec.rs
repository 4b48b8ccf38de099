//! Streaming frame codec.
//!
//! The decoder consumes one byte per call and holds at most one in-flight
//! packet, so memory is fixed regardless of what arrives on the wire:
//!
//! ```text
//!  WaitStart ──0xAA──▶ ReadCommand ──▶ ReadLength ──len>0──▶ ReadPayload
//!      ▲  ▲                              │    │ len==0           │ len bytes
//!      │  └── reject (len > MAX_PAYLOAD) ┘    ▼                  │
//!      └────────── accept / reject ◀── ReadChecksum ◀────────────┘
//! ```
//!
//! A start marker seen mid-frame is treated as ordinary data; only the
//! checksum guards against a desynchronised stream.

use heapless::Vec;

use super::packet::{FRAME_OVERHEAD, MAX_PAYLOAD, Packet, START_MARKER, frame_checksum};
use crate::error::FrameError;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Discarding bytes until a start marker arrives.
    WaitStart,
    /// Start marker seen, next byte is the command id.
    ReadCommand,
    /// Next byte is the payload length.
    ReadLength,
    /// Accumulating payload bytes.
    ReadPayload,
    /// Next byte is the checksum.
    ReadChecksum,
}

/// Streaming frame decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDecoder {
    state: DecoderState,
    command_id: u8,
    expected_len: u8,
    payload: Vec<u8, MAX_PAYLOAD>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub const fn new() -> Self {
        Self {
            state: DecoderState::WaitStart,
            command_id: 0,
            expected_len: 0,
            payload: Vec::new(),
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// `true` when no frame is in progress.
    pub fn is_idle(&self) -> bool {
        self.state == DecoderState::WaitStart
    }

    /// Abandon any in-flight frame.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed a single byte.
    ///
    /// Returns `None` while a frame is incomplete (or the byte was noise),
    /// `Some(Ok(packet))` once a frame passes its checksum, and
    /// `Some(Err(_))` when a frame is rejected. After any `Some` the decoder
    /// is back in its freshly constructed state.
    pub fn feed(&mut self, byte: u8) -> Option<Result<Packet, FrameError>> {
        match self.state {
            DecoderState::WaitStart => {
                if byte == START_MARKER {
                    self.state = DecoderState::ReadCommand;
                }
                None
            }
            DecoderState::ReadCommand => {
                self.command_id = byte;
                self.state = DecoderState::ReadLength;
                None
            }
            DecoderState::ReadLength => {
                // Reject before a single payload byte is buffered.
                if byte as usize > MAX_PAYLOAD {
                    self.reset();
                    return Some(Err(FrameError::LengthOverflow(byte)));
                }
                self.expected_len = byte;
                self.payload.clear();
                self.state = if byte == 0 {
                    DecoderState::ReadChecksum
                } else {
                    DecoderState::ReadPayload
                };
                None
            }
            DecoderState::ReadPayload => {
                if self.payload.push(byte).is_err() {
                    let len = self.expected_len;
                    self.reset();
                    return Some(Err(FrameError::LengthOverflow(len)));
                }
                if self.payload.len() == self.expected_len as usize {
                    self.state = DecoderState::ReadChecksum;
                }
                None
            }
            DecoderState::ReadChecksum => {
                let expected = frame_checksum(self.command_id, &self.payload);
                let command_id = self.command_id;
                let payload = core::mem::take(&mut self.payload);
                self.reset();

                if byte != expected {
                    return Some(Err(FrameError::ChecksumMismatch {
                        expected,
                        received: byte,
                    }));
                }
                Some(Ok(Packet::from_parts(command_id, payload)))
            }
        }
    }
}

/// Encode a frame into `out_buf`.
///
/// Writes `[START, command_id, len, payload.., checksum]` and returns the
/// number of bytes written, always `4 + payload.len()`.
pub fn encode_frame(
    command_id: u8,
    payload: &[u8],
    out_buf: &mut [u8],
) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge(payload.len()));
    }
    let total = FRAME_OVERHEAD + payload.len();
    if out_buf.len() < total {
        return Err(FrameError::BufferTooSmall { needed: total });
    }

    out_buf[0] = START_MARKER;
    out_buf[1] = command_id;
    out_buf[2] = payload.len() as u8;
    out_buf[3..3 + payload.len()].copy_from_slice(payload);
    out_buf[total - 1] = frame_checksum(command_id, payload);

    Ok(total)
}
