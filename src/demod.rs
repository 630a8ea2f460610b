//! Synchronous quadrature (lock-in) demodulator.
//!
//! Correlates raw ADC samples against sine/cosine references at the base
//! frequency and integrates over a fixed window — a single-bin DFT evaluated
//! once per window. Recovers amplitude and phase of the base-frequency
//! component buried in noise and DC offset.
//!
//! The window is [`WINDOW_LEN`] samples (one second), independent of the base
//! frequency: sensitivity scales with elapsed time, not signal period count.
//! Because the window covers a whole number of sampling ticks but not
//! necessarily a whole number of signal cycles, residual spectral leakage is
//! possible when the base frequency does not divide the sample rate. That is
//! intrinsic to the design, not corrected here.
//!
//! # Phase convention
//!
//! `angle = atan2(sum_i, sum_q)`: a pure sine at the base frequency (aligned
//! with the reference) reads 0°, a pure cosine reads +90°. Range (−180, 180].

use crate::config::WINDOW_LEN;
use crate::trig::TrigSource;

/// One completed window's measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureResult {
    /// Phase of the base-frequency component in degrees, range (−180, 180].
    pub angle_degrees: f64,
    /// Amplitude of the component in ADC counts: for an input
    /// `A·sin(2π·f_base·t + φ)` this reads `A/2`.
    pub amplitude: f64,
}

/// Running I/Q accumulator over one window.
pub struct LockinDemodulator {
    trig: TrigSource,
    /// In-phase sum: Σ sample·cos(θ_n).
    sum_i: f64,
    /// Quadrature sum: Σ sample·sin(θ_n).
    sum_q: f64,
    /// Sample counter within the current window.
    index: u32,
    /// Window length in samples.
    window: u32,
}

impl LockinDemodulator {
    /// Create a demodulator with the standard one-second window.
    pub fn new(trig: TrigSource) -> Self {
        Self::with_window(trig, WINDOW_LEN)
    }

    /// Create a demodulator with an explicit window length (tests).
    pub fn with_window(trig: TrigSource, window: u32) -> Self {
        Self {
            trig,
            sum_i: 0.0,
            sum_q: 0.0,
            index: 0,
            window,
        }
    }

    /// Accumulate one sample; returns the window result when it completes.
    ///
    /// On completion the accumulators and the sample counter reset to zero,
    /// so the next call starts a fresh window.
    pub fn consume(&mut self, sample: u16) -> Option<MeasureResult> {
        let (sin, cos) = self.trig.sin_cos(self.index);
        let s = sample as f64;
        self.sum_i += s * cos;
        self.sum_q += s * sin;
        self.index += 1;

        if self.index < self.window {
            return None;
        }

        let angle_degrees = libm::atan2(self.sum_i, self.sum_q).to_degrees();
        let amplitude = libm::hypot(self.sum_i, self.sum_q) / self.window as f64;

        self.sum_i = 0.0;
        self.sum_q = 0.0;
        self.index = 0;

        Some(MeasureResult {
            angle_degrees,
            amplitude,
        })
    }

    /// Discard the current partial window.
    pub fn reset(&mut self) {
        self.sum_i = 0.0;
        self.sum_q = 0.0;
        self.index = 0;
    }

    /// Current (in-phase, quadrature) sums.
    pub fn sums(&self) -> (f64, f64) {
        (self.sum_i, self.sum_q)
    }

    /// Samples accumulated in the current window.
    pub fn sample_index(&self) -> u32 {
        self.index
    }

    /// Reference source in use.
    pub fn trig(&self) -> &TrigSource {
        &self.trig
    }

    /// Shrink the window for host tests (the real window is one second).
    #[cfg(test)]
    pub(crate) fn set_window(&mut self, window: u32) {
        self.window = window;
    }
}
