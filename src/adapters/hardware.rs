//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the status LED and the temperature sensor and exposes them through
//! [`ActuatorPort`] and [`SensorPort`]. On non-espidf targets the sensor
//! uses its simulation backend and the LED accepts any mock `OutputPin`.

use embedded_hal::digital::OutputPin;

use crate::app::commands::{OutputId, SensorId};
use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::status_led::StatusLed;
use crate::sensors::temperature::TemperatureSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin> {
    led: StatusLed<P>,
    temperature: TemperatureSensor,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(led: StatusLed<P>, temperature: TemperatureSensor) -> Self {
        Self { led, temperature }
    }

    /// Release the LED driver (e.g. to inspect a mock pin in tests).
    pub fn into_led(self) -> StatusLed<P> {
        self.led
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn set_output(&mut self, output: OutputId, on: bool) {
        match output {
            OutputId::StatusLed => self.led.set(on),
        }
    }

    fn output_state(&self, output: OutputId) -> bool {
        match output {
            OutputId::StatusLed => self.led.is_lit(),
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin> SensorPort for HardwareAdapter<P> {
    fn read_sensor(&mut self, sensor: SensorId) -> f32 {
        match sensor {
            SensorId::Temperature => self.temperature.read_celsius(),
        }
    }
}
