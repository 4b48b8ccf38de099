//! Actuator drivers driven by setter commands.

pub mod status_led;
