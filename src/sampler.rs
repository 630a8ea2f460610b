//! Hardware-timer-driven ADC sampler.
//!
//! Arms a periodic timer at [`SAMPLE_RATE_HZ`] whose interrupt handler does
//! exactly two things: read the configured analog pin and attempt one
//! [`SampleBuffer::push`]. No locks, no blocking, no allocation — all
//! demodulation math happens in the polling context, never here.
//!
//! # State machine
//!
//! ```text
//! Idle ──configure──▶ Configured ──start──▶ Running
//!                          ▲                   │
//!                          └───────stop────────┘
//! ```
//!
//! `start()` before `configure()` is a usage error. `stop()` is idempotent.

use crate::buffer::SampleBuffer;
use crate::config::SAMPLE_RATE_HZ;
use crate::error::MeasureError;
use crate::hal::{AdcInput, PeriodicTimer};

/// Timer period derived from the fixed sampling rate (200 µs at 5 kHz).
const SAMPLE_PERIOD_US: u64 = 1_000_000 / SAMPLE_RATE_HZ as u64;

/// Sampler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// No ADC configured yet.
    Idle,
    /// ADC configured, timer disarmed.
    Configured,
    /// Timer armed, interrupt handler producing samples.
    Running,
}

/// Everything the interrupt handler touches: the buffer back-reference and a
/// copy of the configured ADC channel. The handler owns nothing.
#[cfg(all(not(test), target_os = "espidf"))]
struct IsrContext {
    buffer: &'static SampleBuffer,
    adc: AdcInput,
}

// Written only while the timer is disarmed, read only by the ISR while armed.
// One sampler per timer is a caller obligation (concurrent samplers over the
// same timer are undefined).
#[cfg(all(not(test), target_os = "espidf"))]
static mut ISR_CTX: Option<IsrContext> = None;

/// Timer interrupt handler: one ADC read, one push attempt, nothing else.
///
/// A failed push is a silent overrun, counted by the buffer; the one-second
/// integration window tolerates rare single-sample loss.
#[cfg(all(not(test), target_os = "espidf"))]
unsafe extern "C" fn sample_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: arg points at ISR_CTX, populated before the timer was armed
    // and cleared only after it is cancelled.
    if let Some(ctx) = (*(arg as *const Option<IsrContext>)).as_ref() {
        ctx.buffer.push(ctx.adc.read());
    }
}

/// Owns the timer lifecycle and the ADC input.
pub struct Sampler {
    buffer: &'static SampleBuffer,
    adc: Option<AdcInput>,
    timer: Option<PeriodicTimer>,
    state: SamplerState,
}

impl Sampler {
    /// Create an idle sampler producing into `buffer`.
    pub fn new(buffer: &'static SampleBuffer) -> Self {
        Self {
            buffer,
            adc: None,
            timer: None,
            state: SamplerState::Idle,
        }
    }

    /// Configure the analog input: 12-bit resolution, 0 dB attenuation.
    ///
    /// Stops the timer first if running. Valid from any state.
    pub fn configure(&mut self, pin: u8) -> Result<(), MeasureError> {
        self.stop();
        self.adc = Some(AdcInput::configure(pin)?);
        self.state = SamplerState::Configured;
        Ok(())
    }

    /// Arm the periodic timer and attach the interrupt handler.
    ///
    /// No-op if already running; usage error before `configure()`.
    pub fn start(&mut self) -> Result<(), MeasureError> {
        match self.state {
            SamplerState::Idle => Err(MeasureError::NotConfigured),
            SamplerState::Running => Ok(()),
            SamplerState::Configured => {
                self.arm()?;
                self.state = SamplerState::Running;
                Ok(())
            }
        }
    }

    /// Disarm the timer and detach the handler. Idempotent; the buffer is
    /// not drained — unread samples stay until the next `configure()` or a
    /// consumer pops them.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
            self.disarm_isr();
        }
        if self.state == SamplerState::Running {
            self.state = SamplerState::Configured;
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SamplerState {
        self.state
    }

    #[cfg(all(not(test), target_os = "espidf"))]
    fn arm(&mut self) -> Result<(), MeasureError> {
        // adc is Some in Configured state
        let adc = self.adc.ok_or(MeasureError::NotConfigured)?;

        // SAFETY: timer is disarmed here, so the ISR cannot observe the
        // write to ISR_CTX mid-update.
        let arg = unsafe {
            ISR_CTX = Some(IsrContext {
                buffer: self.buffer,
                adc,
            });
            core::ptr::addr_of_mut!(ISR_CTX) as *mut core::ffi::c_void
        };

        self.timer = Some(PeriodicTimer::start_periodic(
            sample_isr,
            arg,
            SAMPLE_PERIOD_US,
        )?);
        Ok(())
    }

    #[cfg(all(not(test), target_os = "espidf"))]
    fn disarm_isr(&mut self) {
        // SAFETY: cancel() returned, no further interrupts fire.
        unsafe {
            ISR_CTX = None;
        }
    }

    // Host test double: same state transitions, no hardware.
    #[cfg(any(test, not(target_os = "espidf")))]
    fn arm(&mut self) -> Result<(), MeasureError> {
        unsafe extern "C" fn noop(_arg: *mut core::ffi::c_void) {}

        let _adc = self.adc.ok_or(MeasureError::NotConfigured)?;
        self.timer = Some(PeriodicTimer::start_periodic(
            noop,
            core::ptr::null_mut(),
            SAMPLE_PERIOD_US,
        )?);
        Ok(())
    }

    #[cfg(any(test, not(target_os = "espidf")))]
    fn disarm_isr(&mut self) {}
}
