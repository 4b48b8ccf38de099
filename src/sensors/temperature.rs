//! Die temperature sensor.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the ESP32-S3 on-chip temperature sensor through the
//! `temperature_sensor_*` driver API.
//! On host/test: reads from a static `AtomicU32` (f32 bits) for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::Error;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    esp, temperature_sensor_config_t, temperature_sensor_enable, temperature_sensor_get_celsius,
    temperature_sensor_handle_t, temperature_sensor_install,
};
#[cfg(target_os = "espidf")]
use log::warn;

/// 25.5 °C until a test injects something else.
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0x41CC_0000);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature(celsius: f32) {
    SIM_TEMP_BITS.store(celsius.to_bits(), Ordering::Relaxed);
}

/// Measurement range requested from the on-chip sensor (°C).
#[cfg(target_os = "espidf")]
const RANGE_MIN_C: i32 = -10;
#[cfg(target_os = "espidf")]
const RANGE_MAX_C: i32 = 80;

pub struct TemperatureSensor {
    #[cfg(target_os = "espidf")]
    handle: temperature_sensor_handle_t,
}

impl TemperatureSensor {
    /// Install and enable the on-chip sensor.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, Error> {
        let cfg = temperature_sensor_config_t {
            range_min: RANGE_MIN_C,
            range_max: RANGE_MAX_C,
            ..Default::default()
        };
        let mut handle: temperature_sensor_handle_t = core::ptr::null_mut();

        // SAFETY: called once from the main task before the handle is
        // shared; `cfg` and `handle` outlive the calls.
        esp!(unsafe { temperature_sensor_install(&cfg, &mut handle) })
            .map_err(|_| Error::Hardware("temperature sensor install"))?;
        esp!(unsafe { temperature_sensor_enable(handle) })
            .map_err(|_| Error::Hardware("temperature sensor enable"))?;

        Ok(Self { handle })
    }

    /// Simulation backend; never fails.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, Error> {
        Ok(Self {})
    }

    /// Current temperature in °C. `NaN` if the driver reports an error.
    #[cfg(target_os = "espidf")]
    pub fn read_celsius(&mut self) -> f32 {
        let mut celsius = 0.0f32;
        // SAFETY: `handle` was installed and enabled in `new`.
        match esp!(unsafe { temperature_sensor_get_celsius(self.handle, &mut celsius) }) {
            Ok(()) => celsius,
            Err(e) => {
                warn!("TEMP: read failed: {}", e);
                f32::NAN
            }
        }
    }

    /// Current temperature in °C.
    #[cfg(not(target_os = "espidf"))]
    pub fn read_celsius(&mut self) -> f32 {
        f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed))
    }
}
