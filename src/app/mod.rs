//! Application core — command semantics, zero I/O.
//!
//! The dispatcher maps validated packets onto device actions. All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
