//! Lock-free SPSC ring buffer for raw ADC samples.
//!
//! Shared between exactly one producer (the sampling interrupt handler) and
//! one consumer (the polling loop). No locks, no allocation, push and pop are
//! O(1) and never block — the producer runs in interrupt context.
//!
//! # Memory Ordering
//!
//! - Producer writes the sample payload, then publishes the advanced write
//!   index with `Release`.
//! - Consumer loads the write index with `Acquire`, then reads the payload.
//!
//! Reversing that order is a data race; the pairing is what makes the payload
//! visible across the interrupt/poll boundary.
//!
//! # Full/empty discipline
//!
//! Indices advance modulo `N`. Empty iff `write == read`; full iff
//! `(write + 1) % N == read`. One slot is sacrificed to disambiguate the two,
//! so at most `N - 1` samples are live. A push into a full buffer drops the
//! sample and bumps a diagnostic counter: the demodulation window integrates
//! over thousands of samples and rare single-sample loss is acceptable.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::config::BUF_SIZE;

/// SPSC ring of raw 12-bit ADC readings.
///
/// `push` is called only from the interrupt handler, `pop` only from the
/// polling context. Violating that split is undefined behaviour; nothing in
/// the type system enforces it (same discipline as a hardware mailbox).
pub struct SampleBuffer<const N: usize = BUF_SIZE> {
    /// Sample slots.
    slots: UnsafeCell<[u16; N]>,

    /// Producer index: next slot to write. Advanced only by the producer.
    write_idx: AtomicUsize,

    /// Consumer index: next slot to read. Advanced only by the consumer.
    read_idx: AtomicUsize,

    /// Samples dropped because the buffer was full (diagnostics only).
    dropped: AtomicU32,
}

// SAFETY: Single producer, single consumer, each owning its own index.
// Payload visibility is ordered by the Release store / Acquire load pairs on
// write_idx (push -> pop) and read_idx (pop -> push full check).
unsafe impl<const N: usize> Sync for SampleBuffer<N> {}
unsafe impl<const N: usize> Send for SampleBuffer<N> {}

impl<const N: usize> SampleBuffer<N> {
    /// Create a new empty buffer.
    pub const fn new() -> Self {
        assert!(N >= 2, "Buffer needs at least one usable slot");

        Self {
            slots: UnsafeCell::new([0u16; N]),
            write_idx: AtomicUsize::new(0),
            read_idx: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a sample (producer side, interrupt-safe).
    ///
    /// Returns `false` and drops the sample if the buffer is full. Never
    /// blocks, never allocates.
    #[inline]
    pub fn push(&self, sample: u16) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let next = (write + 1) % N;

        if next == self.read_idx.load(Ordering::Acquire) {
            // Full: silent best-effort loss, counted for diagnostics.
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: Only the producer writes slots at write_idx, and the
        // consumer will not read this slot until the Release store below.
        unsafe {
            (*self.slots.get())[write] = sample;
        }

        // Publish the payload.
        self.write_idx.store(next, Ordering::Release);
        true
    }

    /// Pop the oldest sample (consumer side).
    ///
    /// Returns `None` if the buffer is empty.
    #[inline]
    pub fn pop(&self) -> Option<u16> {
        let read = self.read_idx.load(Ordering::Relaxed);

        if read == self.write_idx.load(Ordering::Acquire) {
            return None; // Empty
        }

        // SAFETY: The Acquire load above ordered this slot's payload before
        // the read; the producer will not overwrite it until read_idx moves.
        let sample = unsafe { (*self.slots.get())[read] };

        self.read_idx.store((read + 1) % N, Ordering::Release);
        Some(sample)
    }

    /// Number of samples currently buffered.
    #[inline]
    pub fn len(&self) -> usize {
        let write = self.write_idx.load(Ordering::Acquire);
        let read = self.read_idx.load(Ordering::Acquire);
        (write + N - read) % N
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total slot count. At most `capacity() - 1` samples are retrievable.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Samples dropped due to overrun since the last reset.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset indices and the overrun counter, discarding unread samples.
    ///
    /// Only valid while the producer is detached (sampler stopped); the
    /// consumer-side store to `write_idx` races an active interrupt handler.
    pub fn reset(&self) {
        self.write_idx.store(0, Ordering::Relaxed);
        self.read_idx.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
