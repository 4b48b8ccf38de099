//! Sensor drivers read by getter commands.

pub mod temperature;
