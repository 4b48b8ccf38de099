//! Mock adapters for integration tests.
//!
//! Records every actuator call, every event, and every byte written to the
//! wire so tests can assert on the full history without real peripherals.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use uartrpc::app::commands::{OutputId, SensorId};
use uartrpc::app::events::LinkEvent;
use uartrpc::app::ports::{ActuatorPort, EventSink, SensorPort};
use uartrpc::rpc::transport::Transport;

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub led: bool,
    pub temperature: f32,
    pub set_calls: Vec<(OutputId, bool)>,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            led: false,
            temperature: 25.5,
            set_calls: Vec::new(),
            reads: 0,
        }
    }

    /// True if no handler touched the hardware.
    pub fn untouched(&self) -> bool {
        self.set_calls.is_empty() && self.reads == 0
    }
}

impl ActuatorPort for MockBoard {
    fn set_output(&mut self, output: OutputId, on: bool) {
        self.set_calls.push((output, on));
        match output {
            OutputId::StatusLed => self.led = on,
        }
    }

    fn output_state(&self, output: OutputId) -> bool {
        match output {
            OutputId::StatusLed => self.led,
        }
    }
}

impl SensorPort for MockBoard {
    fn read_sensor(&mut self, sensor: SensorId) -> f32 {
        self.reads += 1;
        match sensor {
            SensorId::Temperature => self.temperature,
        }
    }
}

// ── Wire (transport) ──────────────────────────────────────────

/// Captures everything the engine transmits.
#[derive(Default)]
pub struct Wire {
    pub sent: Vec<u8>,
    pub flushes: u32,
    /// When set, every write fails.
    pub broken: bool,
}

#[allow(dead_code)]
impl Wire {
    pub fn take(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.sent)
    }
}

impl Transport for Wire {
    type Error = &'static str;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if self.broken {
            return Err("wire cut");
        }
        self.sent.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<LinkEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &LinkEvent) {
        self.events.push(event.clone());
    }
}

// ── GPIO pin ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPin {
    pub high: bool,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}
