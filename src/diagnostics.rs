//! Runtime link metrics.
//!
//! Counters are updated by the [`RpcEngine`](crate::rpc::engine::RpcEngine)
//! on every byte and frame outcome and are logged periodically as JSON by
//! the firmware main loop.

use serde::Serialize;

/// Monotonic counters since boot (or the last [`LinkStats::reset`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Every byte handed to the engine.
    pub bytes_received: u32,
    /// Bytes discarded while waiting for a start marker.
    pub noise_bytes: u32,
    /// Frames that passed validation.
    pub frames_accepted: u32,
    /// Frames rejected for an oversized length byte.
    pub length_rejects: u32,
    /// Frames rejected for a bad checksum.
    pub checksum_rejects: u32,
    /// Valid frames carrying an unregistered command id.
    pub unknown_commands: u32,
    /// Partial frames abandoned by the inactivity timeout.
    pub timeouts: u32,
    /// Getter reply frames transmitted.
    pub replies_sent: u32,
}

impl LinkStats {
    /// Frames answered with NACK for framing reasons.
    pub fn frames_rejected(&self) -> u32 {
        self.length_rejects.saturating_add(self.checksum_rejects)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Compact JSON rendering for the log.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
