//! Measurement controller: composes buffer, trig source, demodulator and
//! sampler into the `init` / `start` / `stop` / `poll` lifecycle consumed by
//! the application.
//!
//! ```text
//! timer ISR ──▶ Sampler ──▶ SampleBuffer ──▶ poll() ──▶ LockinDemodulator
//!                            (lock-free)                 │ window done
//!                                                        ▼
//!                                              MeasureResult (angle, ampl)
//! ```
//!
//! `poll()` is a non-blocking drain; the caller decides the cadence. If the
//! caller polls slower than one window (one second), only the most recent
//! completed window is reported and earlier ones are superseded — a
//! single-slot result by design, counted for diagnostics.

use crate::buffer::SampleBuffer;
use crate::config::SAMPLE_RATE_HZ;
use crate::demod::{LockinDemodulator, MeasureResult};
use crate::error::MeasureError;
use crate::sampler::Sampler;
use crate::trig::{TrigMode, TrigSource};

/// Controller lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterPhase {
    /// Constructed, not yet initialized.
    Idle,
    /// Initialized, sampler disarmed.
    Configured,
    /// Sampler armed, samples flowing.
    Running,
}

/// Lock-in measurement controller.
///
/// Owns the trig table and demodulator state for one measurement session;
/// the ring buffer is a `'static` back-reference because the interrupt
/// handler shares it. Exactly one instance may drive a given pin and timer
/// at a time — that exclusivity is the caller's obligation.
pub struct LockinMeter {
    buffer: &'static SampleBuffer,
    sampler: Sampler,
    demod: Option<LockinDemodulator>,
    phase: MeterPhase,
    /// Windows completed since `init`.
    windows: u32,
    /// Results overwritten because more than one window completed in a
    /// single `poll` call.
    superseded: u32,
}

impl LockinMeter {
    /// Create an idle meter over `buffer`.
    pub fn new(buffer: &'static SampleBuffer) -> Self {
        Self {
            buffer,
            sampler: Sampler::new(buffer),
            demod: None,
            phase: MeterPhase::Idle,
            windows: 0,
            superseded: 0,
        }
    }

    /// Configure a measurement session.
    ///
    /// Validates the base frequency, builds the trig source, configures the
    /// analog input and resets the ring buffer and accumulators — any unread
    /// samples from a previous session are discarded. Stops the sampler
    /// first if it is running.
    pub fn init(
        &mut self,
        pin: u8,
        base_frequency_hz: f64,
        mode: TrigMode,
    ) -> Result<(), MeasureError> {
        self.stop();

        let trig = TrigSource::new(mode, base_frequency_hz, SAMPLE_RATE_HZ)?;
        self.sampler.configure(pin)?;

        // Producer detached: safe to reset indices.
        self.buffer.reset();
        self.demod = Some(LockinDemodulator::new(trig));
        self.windows = 0;
        self.superseded = 0;
        self.phase = MeterPhase::Configured;

        log::info!(
            "measure init: pin {} base {} Hz mode {:?} window {} samples",
            pin,
            base_frequency_hz,
            mode,
            SAMPLE_RATE_HZ
        );
        Ok(())
    }

    /// Arm the sampler. No-op if already running; error before `init`.
    pub fn start(&mut self) -> Result<(), MeasureError> {
        if self.phase == MeterPhase::Idle {
            return Err(MeasureError::NotConfigured);
        }
        self.sampler.start()?;
        if self.phase != MeterPhase::Running {
            log::info!("measure start");
            self.phase = MeterPhase::Running;
        }
        Ok(())
    }

    /// Disarm the sampler. Idempotent. The buffer is not drained; the next
    /// `init` resets it.
    pub fn stop(&mut self) {
        self.sampler.stop();
        if self.phase == MeterPhase::Running {
            log::info!("measure stop");
            self.phase = MeterPhase::Configured;
        }
    }

    /// Drain all buffered samples through the demodulator in FIFO order.
    ///
    /// Returns the latest window result that completed during this call, or
    /// `None` if no window finished. Non-blocking: bounded by the number of
    /// samples currently buffered. Usage error before `init`.
    pub fn poll(&mut self) -> Result<Option<MeasureResult>, MeasureError> {
        let demod = self.demod.as_mut().ok_or(MeasureError::NotConfigured)?;

        let mut latest = None;
        while let Some(sample) = self.buffer.pop() {
            if let Some(result) = demod.consume(sample) {
                if latest.is_some() {
                    // Caller polls slower than one window; older result lost.
                    self.superseded += 1;
                }
                self.windows += 1;
                latest = Some(result);
            }
        }
        Ok(latest)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> MeterPhase {
        self.phase
    }

    /// Samples dropped by the producer since `init` (buffer overrun).
    pub fn overruns(&self) -> u32 {
        self.buffer.dropped()
    }

    /// Windows completed since `init`.
    pub fn windows(&self) -> u32 {
        self.windows
    }

    /// Results superseded by a newer window within one poll since `init`.
    pub fn superseded(&self) -> u32 {
        self.superseded
    }

    #[cfg(test)]
    fn set_window(&mut self, window: u32) {
        self.demod
            .as_mut()
            .expect("init first")
            .set_window(window);
    }
}
