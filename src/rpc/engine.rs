//! RPC engine — the "process one byte" entry point of the link.
//!
//! Owns the decoder for one stream and the command table. For every byte
//! handed in by the byte source:
//!
//! 1. **Timeout** — if enabled, a partial frame older than the inactivity
//!    limit is abandoned first.
//! 2. **Decode** — the byte advances the [`FrameDecoder`].
//! 3. **Dispatch** — a validated packet runs its table handler; a getter's
//!    reply frame is transmitted immediately.
//! 4. **Respond** — exactly one ACK/NACK byte closes every completed frame
//!    attempt, after any reply frame.
//!
//! The engine is not re-entrant: handlers never call back into it, and the
//! reply path writes straight to the transport.

use core::fmt::Debug;

use log::{debug, warn};

use super::codec::FrameDecoder;
use super::packet::{Packet, Response, START_MARKER};
use super::transport::Transport;
use crate::app::commands::{CommandTable, Dispatch};
use crate::app::events::LinkEvent;
use crate::app::ports::{ActuatorPort, EventSink, SensorPort};
use crate::config::{LinkConfig, UnknownCommandPolicy};
use crate::diagnostics::LinkStats;
use crate::error::{Error, FrameError, Result};

/// What happened to one completed frame attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame validated and was dispatched.
    Accepted {
        command_id: u8,
        dispatch: Dispatch,
        response: Response,
    },
    /// The frame was discarded; a NACK was sent.
    Rejected(FrameError),
}

impl FrameOutcome {
    /// Response byte that was sent for this attempt.
    pub fn response(&self) -> Response {
        match self {
            Self::Accepted { response, .. } => *response,
            Self::Rejected(_) => Response::Nack,
        }
    }
}

/// Single-stream link engine.
pub struct RpcEngine {
    decoder: FrameDecoder,
    commands: CommandTable,
    unknown_policy: UnknownCommandPolicy,
    frame_timeout_ms: Option<u32>,
    last_byte_ms: u64,
    stats: LinkStats,
}

impl RpcEngine {
    /// Engine with the default command table.
    pub fn new(config: &LinkConfig) -> Self {
        Self::with_commands(config, CommandTable::with_defaults())
    }

    pub fn with_commands(config: &LinkConfig, commands: CommandTable) -> Self {
        Self {
            decoder: FrameDecoder::new(),
            commands,
            unknown_policy: config.unknown_command,
            frame_timeout_ms: config.frame_timeout(),
            last_byte_ms: 0,
            stats: LinkStats::default(),
        }
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub fn commands_mut(&mut self) -> &mut CommandTable {
        &mut self.commands
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Drop any partial frame (e.g. after the UART was reconfigured).
    pub fn reset(&mut self) {
        self.decoder.reset();
    }

    /// Process one received byte.
    ///
    /// `now_ms` is a monotonic timestamp used only by the inactivity
    /// timeout. Returns the outcome once a frame attempt completes.
    /// Frame-level rejections are not errors; `Err` means the transport
    /// failed while replying.
    pub fn process_byte<H, S, T>(
        &mut self,
        byte: u8,
        now_ms: u64,
        hw: &mut H,
        sink: &mut S,
        tx: &mut T,
    ) -> Result<Option<FrameOutcome>>
    where
        H: ActuatorPort + SensorPort,
        S: EventSink,
        T: Transport,
    {
        self.expire_stale_frame(now_ms, sink);
        self.last_byte_ms = now_ms;
        self.stats.bytes_received = self.stats.bytes_received.wrapping_add(1);

        if self.decoder.is_idle() && byte != START_MARKER {
            self.stats.noise_bytes = self.stats.noise_bytes.wrapping_add(1);
        }

        let Some(result) = self.decoder.feed(byte) else {
            return Ok(None);
        };

        let outcome = match result {
            Ok(packet) => self.handle_packet(&packet, hw, sink, tx)?,
            Err(e) => {
                match e {
                    FrameError::LengthOverflow(_) => {
                        self.stats.length_rejects = self.stats.length_rejects.wrapping_add(1);
                    }
                    _ => {
                        self.stats.checksum_rejects = self.stats.checksum_rejects.wrapping_add(1);
                    }
                }
                sink.emit(&LinkEvent::FrameRejected(e));
                FrameOutcome::Rejected(e)
            }
        };

        send_response(outcome.response(), tx)?;
        Ok(Some(outcome))
    }

    /// Process a run of bytes in order. Returns the number of completed
    /// frame attempts.
    pub fn process_bytes<H, S, T>(
        &mut self,
        bytes: &[u8],
        now_ms: u64,
        hw: &mut H,
        sink: &mut S,
        tx: &mut T,
    ) -> Result<usize>
    where
        H: ActuatorPort + SensorPort,
        S: EventSink,
        T: Transport,
    {
        let mut completed = 0;
        for &byte in bytes {
            if self.process_byte(byte, now_ms, hw, sink, tx)?.is_some() {
                completed += 1;
            }
        }
        Ok(completed)
    }

    /// Check the inactivity timeout without a new byte. Returns `true` if
    /// a partial frame was abandoned.
    pub fn poll_idle<S: EventSink>(&mut self, now_ms: u64, sink: &mut S) -> bool {
        self.expire_stale_frame(now_ms, sink)
    }

    /// Encode `packet` and write it to `tx`.
    pub fn send_packet<T: Transport>(&self, packet: &Packet, tx: &mut T) -> Result<()> {
        let frame = packet.encode();
        write_frame(&frame, tx)
    }

    // ── Internal ──────────────────────────────────────────────

    fn handle_packet<H, S, T>(
        &mut self,
        packet: &Packet,
        hw: &mut H,
        sink: &mut S,
        tx: &mut T,
    ) -> Result<FrameOutcome>
    where
        H: ActuatorPort + SensorPort,
        S: EventSink,
        T: Transport,
    {
        let command_id = packet.command_id();
        self.stats.frames_accepted = self.stats.frames_accepted.wrapping_add(1);
        sink.emit(&LinkEvent::FrameAccepted {
            command_id,
            payload_len: packet.payload_len(),
        });

        let dispatch = self.commands.dispatch(packet, hw);
        let response = match &dispatch {
            Dispatch::Applied { .. } => Response::Ack,
            Dispatch::Reply(reply) => {
                self.send_packet(reply, tx)?;
                self.stats.replies_sent = self.stats.replies_sent.wrapping_add(1);
                sink.emit(&LinkEvent::ReplySent {
                    command_id: reply.command_id(),
                    value: reply.payload_f32().unwrap_or_default(),
                });
                Response::Ack
            }
            Dispatch::MissingArgument => {
                sink.emit(&LinkEvent::MissingArgument { command_id });
                Response::Ack
            }
            Dispatch::Unknown => {
                self.stats.unknown_commands = self.stats.unknown_commands.wrapping_add(1);
                let nacked = self.unknown_policy == UnknownCommandPolicy::Nack;
                sink.emit(&LinkEvent::UnknownCommand { command_id, nacked });
                if nacked { Response::Nack } else { Response::Ack }
            }
        };

        Ok(FrameOutcome::Accepted {
            command_id,
            dispatch,
            response,
        })
    }

    fn expire_stale_frame<S: EventSink>(&mut self, now_ms: u64, sink: &mut S) -> bool {
        let Some(timeout) = self.frame_timeout_ms else {
            return false;
        };
        if self.decoder.is_idle() {
            return false;
        }
        let idle_ms = now_ms.saturating_sub(self.last_byte_ms);
        if idle_ms <= u64::from(timeout) {
            return false;
        }

        let state = self.decoder.state();
        self.decoder.reset();
        self.stats.timeouts = self.stats.timeouts.wrapping_add(1);
        sink.emit(&LinkEvent::FrameTimedOut { state, idle_ms });
        true
    }
}

fn send_response<T: Transport>(response: Response, tx: &mut T) -> Result<()> {
    debug!("TX {:?}", response);
    write_frame(&[response.as_byte()], tx)
}

fn write_frame<T: Transport>(bytes: &[u8], tx: &mut T) -> Result<()> {
    match tx.write_all(bytes) {
        Ok(true) => tx.flush().map_err(transport_error),
        Ok(false) => {
            warn!("TX: transport accepted 0 bytes, dropping {} byte write", bytes.len());
            Err(Error::Transport)
        }
        Err(e) => Err(transport_error(e)),
    }
}

fn transport_error<E: Debug>(e: E) -> Error {
    warn!("TX: transport error: {:?}", e);
    Error::Transport
}
