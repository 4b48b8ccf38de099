//! UART command link firmware library.
//!
//! Exposes the framing, dispatch and adapter modules for integration
//! testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod rpc;

pub mod adapters;
pub mod drivers;
pub mod sensors;
