//! Link configuration parameters
//!
//! Tunables for the UART link and the dispatcher. Stored in NVS as a
//! postcard blob; anything missing or invalid falls back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to answer when a valid frame carries an unregistered command id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownCommandPolicy {
    /// ACK the frame and do nothing.
    #[default]
    Ignore,
    /// NACK the frame so the sender learns the opcode is unsupported.
    Nack,
}

/// Core link configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    // --- UART ---
    /// Line rate in baud
    pub baud_rate: u32,
    /// Upper bound for a single blocking transmit (milliseconds)
    pub tx_timeout_ms: u32,

    // --- Decoder ---
    /// Abandon a partial frame after this much silence (0 = wait forever)
    pub frame_timeout_ms: u32,
    /// Reply policy for unregistered command ids
    pub unknown_command: UnknownCommandPolicy,

    // --- Hardware ---
    /// Status LED is lit when its pin is driven low
    pub led_active_low: bool,

    // --- Diagnostics ---
    /// Link statistics log interval (seconds, 0 = never)
    pub stats_interval_secs: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            tx_timeout_ms: 50,
            frame_timeout_ms: 0,
            unknown_command: UnknownCommandPolicy::Ignore,
            led_active_low: false,
            stats_interval_secs: 60,
        }
    }
}

impl LinkConfig {
    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1_200..=3_000_000).contains(&self.baud_rate) {
            return Err(ConfigError::ValidationFailed(
                "baud_rate must be 1200–3000000",
            ));
        }
        if !(1..=1_000).contains(&self.tx_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "tx_timeout_ms must be 1–1000",
            ));
        }
        if self.frame_timeout_ms > 60_000 {
            return Err(ConfigError::ValidationFailed(
                "frame_timeout_ms must be 0–60000",
            ));
        }
        Ok(())
    }

    /// Serialize for persistent storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Corrupted)
    }

    /// Decode a stored blob and validate it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Partial-frame timeout, if enabled.
    pub fn frame_timeout(&self) -> Option<u32> {
        (self.frame_timeout_ms > 0).then_some(self.frame_timeout_ms)
    }
}
