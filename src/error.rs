//! Measurement error types.
//!
//! Configuration and usage errors are returned synchronously to the caller.
//! Buffer overrun is deliberately *not* here: a dropped sample is absorbed by
//! the one-second integration window and only counted for diagnostics.

/// Error with code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureError {
    /// E01: Base frequency is non-positive or not finite
    InvalidFrequency,
    /// E02: Sine table would be shorter than the minimum usable length
    TableTooShort,
    /// E03: Sine table would exceed the fixed backing array
    TableTooLong,
    /// E04: GPIO pin is not routed to ADC1
    PinNotAdc,
    /// E05: Operation requires `init()` first
    NotConfigured,
    /// E06: ESP-IDF call failed (esp_err_t)
    Hardware(i32),
}

impl MeasureError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFrequency => "E01",
            Self::TableTooShort => "E02",
            Self::TableTooLong => "E03",
            Self::PinNotAdc => "E04",
            Self::NotConfigured => "E05",
            Self::Hardware(_) => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidFrequency => "invalid base frequency",
            Self::TableTooShort => "sine table too short",
            Self::TableTooLong => "sine table too long",
            Self::PinNotAdc => "pin not ADC1-capable",
            Self::NotConfigured => "not configured",
            Self::Hardware(_) => "hardware error",
        }
    }
}

impl core::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Hardware(err) => write!(f, "{}: {} ({})", self.code(), self.message(), err),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}
