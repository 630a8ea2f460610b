//! Module: config
//!
//! Purpose: Fixed parameters of the measurement core.
//!
//! The sampling rate, buffer size and ADC geometry are compile-time constants:
//! the interrupt handler and the ring buffer are sized around them, and the
//! demodulation window is defined as exactly one second of samples.

/// ADC sampling rate in Hz.
///
/// The hardware timer fires at this rate; the demodulation window is exactly
/// `SAMPLE_RATE_HZ` samples, i.e. one second of wall time.
pub const SAMPLE_RATE_HZ: u32 = 5000;

/// Ring buffer capacity in samples (one slot is sacrificed to disambiguate
/// full from empty, so at most `BUF_SIZE - 1` samples are live).
///
/// At 5 kHz this holds ~400 ms of backlog; the polling loop must run more
/// often than that or samples are dropped.
pub const BUF_SIZE: usize = 2048;

/// ADC resolution in bits.
pub const ADC_BITS: u32 = 12;

/// Maximum raw ADC reading (2^12 - 1).
pub const ADC_MAX: u16 = (1u16 << ADC_BITS) - 1;

/// Demodulation window length in samples.
///
/// Deliberately tied to the sampling rate, not the base frequency: the
/// coherent integration time (and thus SNR) is one second regardless of how
/// many signal periods that covers. Hard invariant, do not "fix".
pub const WINDOW_LEN: u32 = SAMPLE_RATE_HZ;

/// Smallest usable sine table length (quarter-period cosine needs L/4 >= 1).
pub const MIN_TABLE_LEN: usize = 4;

/// Backing array size for the precomputed sine table.
///
/// Bounds the lowest table-strategy base frequency to
/// `SAMPLE_RATE_HZ / MAX_TABLE_LEN` (~9.8 Hz). Lower frequencies must use the
/// direct strategy.
pub const MAX_TABLE_LEN: usize = 512;

/// Default analog input: GPIO34 (ADC1 channel 6, input-only pin).
pub const DEFAULT_PIN: u8 = 34;

/// Default base frequency in Hz (mains grid).
pub const DEFAULT_BASE_FREQUENCY_HZ: f64 = 50.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adc_max_matches_resolution() {
        assert_eq!(ADC_MAX, 4095);
    }

    #[test]
    fn test_window_is_one_second() {
        assert_eq!(WINDOW_LEN, SAMPLE_RATE_HZ);
    }

    #[test]
    fn test_default_table_fits() {
        let len = (SAMPLE_RATE_HZ as f64 / DEFAULT_BASE_FREQUENCY_HZ) as usize;
        assert!(len >= MIN_TABLE_LEN);
        assert!(len <= MAX_TABLE_LEN);
    }
}
