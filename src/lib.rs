//! # rust-lockin-meter
//!
//! Lock-in (synchronous quadrature) measurement of amplitude and phase at a
//! known base frequency, sampled under hardware-timer interrupt control on
//! ESP32.
//!
//! ## Architecture
//!
//! ```text
//! timer ISR ──▶ Sampler ──▶ SampleBuffer ──▶ LockinMeter::poll ──▶ result
//!               (push only)  (lock-free SPSC)  (drain + demodulate)
//! ```
//!
//! One interrupt producer, one polling consumer, no locks: correctness rests
//! on the ring buffer's single-writer/single-reader discipline and
//! acquire/release index ordering. The interrupt handler reads the ADC and
//! pushes — every other cycle of work happens in the polling context.

#![cfg_attr(not(test), no_std)]

pub mod buffer;
pub mod config;
pub mod demod;
pub mod error;
pub mod hal;
pub mod meter;
pub mod sampler;
pub mod trig;

pub use buffer::SampleBuffer;
pub use demod::{LockinDemodulator, MeasureResult};
pub use error::MeasureError;
pub use meter::{LockinMeter, MeterPhase};
pub use sampler::{Sampler, SamplerState};
pub use trig::{TrigMode, TrigSource};
