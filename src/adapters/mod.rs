//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | ActuatorPort       | Status LED (`OutputPin`) |
//! |            | SensorPort         | On-die temperature sensor|
//! | `log_sink` | EventSink          | Serial log output        |
//! | `time`     | —                  | ESP32 system timer       |
//! | `uart`     | Transport          | ESP-IDF UART driver      |

pub mod hardware;
pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
