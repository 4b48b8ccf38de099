//! Transport abstraction — any byte-oriented channel.
//!
//! Concrete implementations:
//! - UART on ESP32-S3 ([`UartTransport`](crate::adapters::uart::UartTransport))
//! - In-memory loopbacks in the integration tests
//!
//! The engine is generic over `Transport`, so swapping the physical link
//! requires zero changes to the framing logic.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;

    /// Write all of `data`, retrying short writes.
    ///
    /// A write that makes no progress is reported as `Ok(false)` rather
    /// than looping forever.
    fn write_all(&mut self, mut data: &[u8]) -> Result<bool, Self::Error> {
        while !data.is_empty() {
            let n = self.write(data)?;
            if n == 0 {
                return Ok(false);
            }
            data = &data[n.min(data.len())..];
        }
        Ok(true)
    }
}

/// A null transport that discards all writes and never reads.
/// Useful as a default when no host is connected.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}
