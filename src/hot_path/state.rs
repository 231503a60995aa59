//! Per-symbol rolling state
//!
//! One price window per symbol behind a reader/writer lock, with the last
//! price and last update time mirrored into atomics so pollers never touch
//! the lock.

use crate::core::{now_ms, PricePoint};
use crate::infrastructure::RingBuffer;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Rolling window plus lock-free fast-path fields for one symbol
#[derive(Debug)]
pub struct SymbolState {
    buffer: RwLock<RingBuffer<PricePoint>>,
    /// Wall-clock ms of the most recent append
    last_update_ms: AtomicU64,
    /// f64 bits of the most recent price
    last_price_bits: AtomicU64,
}

impl SymbolState {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RwLock::new(RingBuffer::new(capacity)),
            last_update_ms: AtomicU64::new(0),
            last_price_bits: AtomicU64::new(0),
        }
    }

    /// Append a point and refresh the atomic mirrors
    ///
    /// The wall clock is read and the mirrors written while the writer lock
    /// is held, so `last_update_ms` observes appends in writer-lock order.
    pub fn append(&self, point: PricePoint) {
        let mut buffer = self.buffer.write();
        buffer.push(point);
        self.last_update_ms.store(now_ms(), Ordering::Release);
        self.last_price_bits
            .store(point.price.to_bits(), Ordering::Relaxed);
    }

    /// Append with a caller-supplied wall clock, for tests that steer
    /// idleness
    #[cfg(test)]
    pub(crate) fn append_at(&self, point: PricePoint, wall_clock_ms: u64) {
        let mut buffer = self.buffer.write();
        buffer.push(point);
        self.last_update_ms.store(wall_clock_ms, Ordering::Release);
        self.last_price_bits
            .store(point.price.to_bits(), Ordering::Relaxed);
    }

    /// Chronological snapshot of the most recent `n` points
    pub fn recent(&self, n: usize) -> Vec<PricePoint> {
        self.buffer.read().recent(n)
    }

    /// Stored point count
    pub fn len(&self) -> usize {
        self.buffer.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last price, read without the lock
    #[inline]
    pub fn last_price(&self) -> f64 {
        f64::from_bits(self.last_price_bits.load(Ordering::Relaxed))
    }

    /// Wall-clock ms of the most recent append, read without the lock
    #[inline]
    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms.load(Ordering::Acquire)
    }
}
