//! Port traits — the boundary between the link and the device it drives.
//!
//! ```text
//!   RpcEngine ──▶ Port trait ──▶ Adapter (GPIO, ADC, log, ...)
//! ```
//!
//! The dispatcher only knows these traits, so every command handler runs
//! unchanged against real peripherals or the mocks in `tests/`.

use super::commands::{OutputId, SensorId};

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: link → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port used by setter commands.
pub trait ActuatorPort {
    /// Drive a boolean output.
    fn set_output(&mut self, output: OutputId, on: bool);

    /// Last value written to `output`.
    fn output_state(&self, output: OutputId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → link)
// ───────────────────────────────────────────────────────────────

/// Read-side port used by getter commands.
pub trait SensorPort {
    fn read_sensor(&mut self, sensor: SensorId) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: link → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The engine emits structured [`LinkEvent`](super::events::LinkEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::LinkEvent);
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &super::events::LinkEvent) {}
}
