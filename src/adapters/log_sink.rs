//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing link events to the logger (which
//! goes to the console UART in production, not the command UART).

use log::{debug, info, warn};

use crate::app::events::LinkEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`LinkEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &LinkEvent) {
        match event {
            LinkEvent::FrameAccepted {
                command_id,
                payload_len,
            } => {
                debug!("FRAME | cmd=0x{:02X} len={}", command_id, payload_len);
            }
            LinkEvent::FrameRejected(e) => {
                warn!("NACK  | {}", e);
            }
            LinkEvent::UnknownCommand { command_id, nacked } => {
                warn!(
                    "CMD   | unknown id 0x{:02X} ({})",
                    command_id,
                    if *nacked { "nacked" } else { "ignored" }
                );
            }
            LinkEvent::MissingArgument { command_id } => {
                warn!("CMD   | 0x{:02X} sent without argument byte", command_id);
            }
            LinkEvent::ReplySent { command_id, value } => {
                info!("REPLY | cmd=0x{:02X} value={:.2}", command_id, value);
            }
            LinkEvent::FrameTimedOut { state, idle_ms } => {
                warn!("TIMEOUT | partial frame in {:?} dropped after {}ms", state, idle_ms);
            }
        }
    }
}
