//! Lock-in demodulation accuracy tests
//!
//! Synthetic signals at the nominal 5 kHz sampling rate, full one-second
//! windows (5000 samples) exactly as on hardware.

use core::f64::consts::PI;

use rust_lockin_meter::config::{SAMPLE_RATE_HZ, WINDOW_LEN};
use rust_lockin_meter::demod::{LockinDemodulator, MeasureResult};
use rust_lockin_meter::trig::{TrigMode, TrigSource};

/// 50 Hz component of amplitude 1000 on a mid-scale DC offset, quantized the
/// way the 12-bit ADC would.
fn grid_sample(n: u32, phase_deg: f64) -> u16 {
    let theta = 2.0 * PI * 50.0 * n as f64 / SAMPLE_RATE_HZ as f64 + phase_deg.to_radians();
    libm::round(2048.0 + 1000.0 * libm::sin(theta)) as u16
}

fn run_window(mode: TrigMode, signal: impl Fn(u32) -> u16) -> MeasureResult {
    let trig = TrigSource::new(mode, 50.0, SAMPLE_RATE_HZ).unwrap();
    let mut demod = LockinDemodulator::new(trig);

    let mut result = None;
    for n in 0..WINDOW_LEN {
        if let Some(r) = demod.consume(signal(n)) {
            result = Some(r);
        }
    }
    result.expect("one full window must produce exactly one result")
}

#[test]
fn test_accuracy_table_strategy() {
    let result = run_window(TrigMode::Table, |n| grid_sample(n, 0.0));

    // Amplitude reads A/2 = 500, within 1%
    assert!(
        (result.amplitude - 500.0).abs() < 5.0,
        "amplitude {} outside 500 +/- 1%",
        result.amplitude
    );
    // In-phase sine reads 0 degrees, within 2
    assert!(
        result.angle_degrees.abs() < 2.0,
        "angle {} should be ~0",
        result.angle_degrees
    );
}

#[test]
fn test_accuracy_direct_strategy() {
    let result = run_window(TrigMode::Direct, |n| grid_sample(n, 0.0));

    assert!((result.amplitude - 500.0).abs() < 5.0);
    assert!(result.angle_degrees.abs() < 2.0);
}

#[test]
fn test_phase_tracks_signal_shift() {
    for shift in [-135.0, -90.0, -30.0, 30.0, 90.0, 135.0] {
        let result = run_window(TrigMode::Direct, |n| grid_sample(n, shift));
        assert!(
            (result.angle_degrees - shift).abs() < 2.0,
            "signal shifted {} deg read {} deg",
            shift,
            result.angle_degrees
        );
    }
}

#[test]
fn test_strategy_equivalence() {
    // Table length 100 is divisible by 4: strategies must agree closely
    let table = run_window(TrigMode::Table, |n| grid_sample(n, 30.0));
    let direct = run_window(TrigMode::Direct, |n| grid_sample(n, 30.0));

    let rel = (table.amplitude - direct.amplitude).abs() / direct.amplitude;
    assert!(rel < 1e-3, "amplitude relative diff {}", rel);
    assert!(
        (table.angle_degrees - direct.angle_degrees).abs() < 1e-3 * 180.0,
        "angle diff {} vs {}",
        table.angle_degrees,
        direct.angle_degrees
    );
}

#[test]
fn test_dc_offset_rejected() {
    // Pure DC: the window covers 50 whole signal periods, both sums cancel
    let result = run_window(TrigMode::Table, |_| 2048);
    assert!(
        result.amplitude < 1.0,
        "DC-only input leaked amplitude {}",
        result.amplitude
    );
}

#[test]
fn test_window_reset_between_results() {
    let trig = TrigSource::new(TrigMode::Table, 50.0, SAMPLE_RATE_HZ).unwrap();
    let mut demod = LockinDemodulator::new(trig);

    for n in 0..WINDOW_LEN {
        demod.consume(grid_sample(n, 0.0));
    }
    // Window just completed: everything back at zero
    assert_eq!(demod.sample_index(), 0);
    assert_eq!(demod.sums(), (0.0, 0.0));

    // A single new sample contributes exactly sample * (cos 0, sin 0)
    assert!(demod.consume(3000).is_none());
    let (sum_i, sum_q) = demod.sums();
    assert_eq!(sum_i, 3000.0);
    assert_eq!(sum_q, 0.0);
    assert_eq!(demod.sample_index(), 1);
}

#[test]
fn test_consecutive_windows_consistent() {
    let trig = TrigSource::new(TrigMode::Table, 50.0, SAMPLE_RATE_HZ).unwrap();
    let mut demod = LockinDemodulator::new(trig);

    let mut results = Vec::new();
    for n in 0..3 * WINDOW_LEN {
        // Stationary signal: the demodulator's index resets each window but
        // 5000 samples is a whole number of 50 Hz periods, so every window
        // sees the same signal phase.
        if let Some(r) = demod.consume(grid_sample(n % WINDOW_LEN, 45.0)) {
            results.push(r);
        }
    }

    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!((pair[0].amplitude - pair[1].amplitude).abs() < 1e-9);
        assert!((pair[0].angle_degrees - pair[1].angle_degrees).abs() < 1e-9);
    }
}
