//! Outbound link events.
//!
//! Emitted by the [`RpcEngine`](crate::rpc::engine::RpcEngine) through an
//! [`EventSink`](super::ports::EventSink) after each observable step.

use crate::error::FrameError;
use crate::rpc::codec::DecoderState;

/// Structured events produced by the link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// A frame passed validation and was dispatched.
    FrameAccepted { command_id: u8, payload_len: u8 },
    /// A frame was rejected and answered with NACK.
    FrameRejected(FrameError),
    /// A valid frame carried a command id with no table entry.
    UnknownCommand { command_id: u8, nacked: bool },
    /// A setter arrived without the argument byte it needs.
    MissingArgument { command_id: u8 },
    /// A getter reply frame was transmitted.
    ReplySent { command_id: u8, value: f32 },
    /// A partial frame was abandoned after the inactivity timeout.
    FrameTimedOut { state: DecoderState, idle_ms: u64 },
}
