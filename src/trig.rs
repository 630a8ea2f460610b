//! Sine/cosine reference source for the quadrature demodulator.
//!
//! Two interchangeable strategies supply `sin(2π·f_base·n/f_s)` and the
//! matching cosine for a monotonically increasing sample index `n`:
//!
//! - [`SineTable`]: one signal period precomputed at init, cosine derived by a
//!   quarter-period index offset. Cheap per sample, costs `L` table entries.
//! - [`DirectTrig`]: libm evaluation per sample. Exact for any frequency, no
//!   memory, roughly an order of magnitude more CPU per sample.
//!
//! The demodulator only sees [`TrigSource::sin_cos`] and is agnostic to which
//! strategy is active.

use core::f64::consts::PI;

use crate::config::{MAX_TABLE_LEN, MIN_TABLE_LEN};
use crate::error::MeasureError;

/// Strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrigMode {
    /// Precomputed sine table, quarter-period cosine.
    #[default]
    Table,
    /// Per-sample libm sin/cos.
    Direct,
}

/// One period of sine values, length `L = floor(f_s / f_base)`.
///
/// `cosine(n) = sine(n + L/4)` is exact only when `L` is divisible by 4.
/// Otherwise the integer quarter period lags the true 90° offset by up to
/// half an index, a phase bias below `180°/L`. This is a known limitation of
/// the table strategy, accepted (with a warning at init) rather than
/// corrected; use [`TrigMode::Direct`] when it matters.
#[derive(Debug)]
pub struct SineTable {
    values: [f64; MAX_TABLE_LEN],
    len: usize,
    quarter: usize,
}

impl SineTable {
    /// Precompute the table for `base_frequency_hz` at `sample_rate_hz`.
    ///
    /// Fails when the table length would be under [`MIN_TABLE_LEN`] (base
    /// frequency too high) or over [`MAX_TABLE_LEN`] (too low).
    pub fn new(base_frequency_hz: f64, sample_rate_hz: u32) -> Result<Self, MeasureError> {
        if !(base_frequency_hz.is_finite() && base_frequency_hz > 0.0) {
            return Err(MeasureError::InvalidFrequency);
        }

        let len = (sample_rate_hz as f64 / base_frequency_hz) as usize;
        if len < MIN_TABLE_LEN {
            return Err(MeasureError::TableTooShort);
        }
        if len > MAX_TABLE_LEN {
            return Err(MeasureError::TableTooLong);
        }

        if len % 4 != 0 {
            log::warn!(
                "sine table length {} not divisible by 4, cosine phase bias up to {:.3} deg",
                len,
                180.0 / len as f64
            );
        }

        let mut values = [0.0f64; MAX_TABLE_LEN];
        let mut i = 0;
        while i < len {
            values[i] = libm::sin(2.0 * PI * i as f64 / len as f64);
            i += 1;
        }

        Ok(Self {
            values,
            len,
            quarter: len / 4,
        })
    }

    /// Table length `L` (samples per signal period, floored).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn sine(&self, n: u32) -> f64 {
        self.values[n as usize % self.len]
    }

    #[inline]
    fn cosine(&self, n: u32) -> f64 {
        self.values[(n as usize + self.quarter) % self.len]
    }
}

/// Per-sample analytic evaluation.
#[derive(Debug)]
pub struct DirectTrig {
    /// Phase step per sample: 2π·f_base/f_s.
    step: f64,
}

impl DirectTrig {
    pub fn new(base_frequency_hz: f64, sample_rate_hz: u32) -> Result<Self, MeasureError> {
        if !(base_frequency_hz.is_finite() && base_frequency_hz > 0.0) {
            return Err(MeasureError::InvalidFrequency);
        }
        Ok(Self {
            step: 2.0 * PI * base_frequency_hz / sample_rate_hz as f64,
        })
    }

    #[inline]
    fn sin_cos(&self, n: u32) -> (f64, f64) {
        let theta = self.step * n as f64;
        (libm::sin(theta), libm::cos(theta))
    }
}

/// Reference source selected by [`TrigMode`].
#[derive(Debug)]
pub enum TrigSource {
    Table(SineTable),
    Direct(DirectTrig),
}

impl TrigSource {
    /// Build the source for the given strategy and base frequency.
    pub fn new(
        mode: TrigMode,
        base_frequency_hz: f64,
        sample_rate_hz: u32,
    ) -> Result<Self, MeasureError> {
        match mode {
            TrigMode::Table => Ok(Self::Table(SineTable::new(
                base_frequency_hz,
                sample_rate_hz,
            )?)),
            TrigMode::Direct => Ok(Self::Direct(DirectTrig::new(
                base_frequency_hz,
                sample_rate_hz,
            )?)),
        }
    }

    /// `(sin, cos)` of the reference phase at sample index `n`.
    ///
    /// Callers may pass an ever-increasing counter; the table strategy wraps
    /// modulo its period internally.
    #[inline]
    pub fn sin_cos(&self, n: u32) -> (f64, f64) {
        match self {
            Self::Table(t) => (t.sine(n), t.cosine(n)),
            Self::Direct(d) => d.sin_cos(n),
        }
    }

    /// Active strategy.
    pub fn mode(&self) -> TrigMode {
        match self {
            Self::Table(_) => TrigMode::Table,
            Self::Direct(_) => TrigMode::Direct,
        }
    }
}
