//! Circular receive buffers for byte sources.
//!
//! A DMA engine (or ISR) writes received bytes into a fixed circular
//! buffer and only exposes how far it has got. [`DmaCursor`] turns that
//! position into an in-order byte stream for the decoder:
//!
//! ```text
//!   normal:      [ . . o=======n . . ]   deliver o..n
//!   wrapped:     [=====n . . . o=====]   deliver o..N, then 0..n
//! ```
//!
//! The cursor cannot tell "nothing new" from "exactly N new bytes"; the
//! producer must keep the reader less than one full lap behind.
//! [`RxRing`] is an owned buffer that enforces this and reports overruns.

/// Read position into a circular buffer of `N` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaCursor<const N: usize> {
    old_pos: usize,
}

impl<const N: usize> Default for DmaCursor<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DmaCursor<N> {
    pub const fn new() -> Self {
        const { assert!(N > 0, "ring buffer must not be empty") };
        Self { old_pos: 0 }
    }

    /// Index of the next unread byte.
    pub fn position(&self) -> usize {
        self.old_pos
    }

    /// Deliver every byte between the last read position and `new_pos`.
    ///
    /// Returns the number of bytes delivered.
    pub fn drain_to(&mut self, buf: &[u8; N], new_pos: usize, mut f: impl FnMut(u8)) -> usize {
        let new_pos = new_pos % N;
        let old_pos = self.old_pos;
        if new_pos == old_pos {
            return 0;
        }

        let delivered = if new_pos > old_pos {
            buf[old_pos..new_pos].iter().for_each(|&b| f(b));
            new_pos - old_pos
        } else {
            buf[old_pos..].iter().for_each(|&b| f(b));
            buf[..new_pos].iter().for_each(|&b| f(b));
            (N - old_pos) + new_pos
        };

        self.old_pos = new_pos;
        delivered
    }

    /// Same as [`drain_to`](Self::drain_to), but takes the DMA transfer
    /// counter (bytes remaining until the engine wraps) instead of a
    /// position.
    pub fn drain_remaining(
        &mut self,
        buf: &[u8; N],
        remaining: usize,
        f: impl FnMut(u8),
    ) -> usize {
        let new_pos = N - remaining.min(N);
        self.drain_to(buf, new_pos, f)
    }
}

/// Owned circular receive buffer with a producer side and overrun
/// detection.
///
/// Holds at most `N - 1` unread bytes. Bytes pushed while full are dropped
/// and counted; the consumer should treat a non-zero
/// [`take_overrun`](Self::take_overrun) as a break in the stream.
#[derive(Debug, Clone)]
pub struct RxRing<const N: usize> {
    buf: [u8; N],
    write_pos: usize,
    unread: usize,
    dropped: u32,
    cursor: DmaCursor<N>,
}

impl<const N: usize> Default for RxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxRing<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            write_pos: 0,
            unread: 0,
            dropped: 0,
            cursor: DmaCursor::new(),
        }
    }

    /// Usable capacity.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    pub fn len(&self) -> usize {
        self.unread
    }

    pub fn is_empty(&self) -> bool {
        self.unread == 0
    }

    /// Producer side: store one byte. Returns `false` if it was dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.unread >= self.capacity() {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        self.buf[self.write_pos] = byte;
        self.write_pos = (self.write_pos + 1) % N;
        self.unread += 1;
        true
    }

    /// Producer side: store as many bytes as fit. Returns how many were
    /// stored.
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&b| self.push(b)).count()
    }

    /// Consumer side: deliver all unread bytes in arrival order.
    pub fn drain(&mut self, f: impl FnMut(u8)) -> usize {
        let n = self.cursor.drain_to(&self.buf, self.write_pos, f);
        self.unread -= n;
        n
    }

    /// Bytes dropped since the last call.
    pub fn take_overrun(&mut self) -> u32 {
        core::mem::take(&mut self.dropped)
    }
}
