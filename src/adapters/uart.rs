//! UART transport adapter (ESP32-S3 only).
//!
//! Wraps an `esp-idf-hal` [`UartDriver`] as a [`Transport`]. Reads never
//! block; writes block for at most `tx_timeout_ms` while the TX FIFO drains.

use esp_idf_hal::delay::{TickType, NON_BLOCK};
use esp_idf_hal::uart::UartDriver;
use esp_idf_svc::sys::EspError;
use log::warn;

use crate::rpc::transport::Transport;

pub struct UartTransport<'d> {
    uart: UartDriver<'d>,
    tx_timeout: u32,
}

impl<'d> UartTransport<'d> {
    pub fn new(uart: UartDriver<'d>, tx_timeout_ms: u32) -> Self {
        Self {
            uart,
            tx_timeout: TickType::new_millis(u64::from(tx_timeout_ms)).ticks(),
        }
    }

    /// Blocking read with a bound, used by the main loop so it can idle
    /// without spinning.
    pub fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, EspError> {
        let ticks = TickType::new_millis(u64::from(timeout_ms)).ticks();
        self.uart.read(buf, ticks)
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.uart.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart.wait_tx_done(self.tx_timeout)
    }

    fn available(&self) -> bool {
        match self.uart.remaining_read() {
            Ok(n) => n > 0,
            Err(e) => {
                warn!("UART: remaining_read failed: {}", e);
                false
            }
        }
    }
}
