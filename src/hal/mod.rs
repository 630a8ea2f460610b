//! Hardware Abstraction Layer for the measurement core.
//!
//! Thin wrappers around ESP-IDF peripherals. Business logic stays in the core
//! modules, HAL is just I/O. Each wrapper has a `#[cfg(test)]` double so the
//! sampler/controller lifecycle is testable on the host.

pub mod adc;
pub mod timer;

pub use adc::AdcInput;
pub use timer::PeriodicTimer;
