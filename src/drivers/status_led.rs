//! Status LED driver.
//!
//! Generic over any `embedded-hal` [`OutputPin`], so the same driver runs
//! on an ESP-IDF `PinDriver` and on a host-side mock pin. Polarity is
//! configurable because many boards wire the LED to sink current.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    active_low: bool,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap `pin` and drive the LED off.
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut led = Self {
            pin,
            active_low,
            lit: false,
        };
        led.set(false);
        led
    }

    /// Light or extinguish the LED. A pin error is logged and the
    /// remembered state is left unchanged.
    pub fn set(&mut self, on: bool) {
        let drive_high = on != self.active_low;
        let result = if drive_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => self.lit = on,
            Err(e) => warn!("LED: pin write failed: {:?}", e),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}
