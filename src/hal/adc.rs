//! ADC1 input configured for raw 12-bit, 0 dB attenuation reads.
//!
//! Matches the measurement chain's expectations: full 12-bit resolution
//! (0..=4095) and minimum attenuation for best resolution on small signals.

use crate::error::MeasureError;

/// Map a GPIO number to its ADC1 channel (classic ESP32 routing).
///
/// ADC2 is not usable here: it is shared with the Wi-Fi driver.
pub fn gpio_to_adc1_channel(pin: u8) -> Option<u32> {
    match pin {
        36 => Some(0),
        37 => Some(1),
        38 => Some(2),
        39 => Some(3),
        32 => Some(4),
        33 => Some(5),
        34 => Some(6),
        35 => Some(7),
        _ => None,
    }
}

/// A configured ADC1 channel.
///
/// `Copy` on purpose: the interrupt context keeps its own copy next to the
/// ring buffer reference.
#[derive(Debug, Clone, Copy)]
pub struct AdcInput {
    channel: u32,
}

#[cfg(all(not(test), target_os = "espidf"))]
impl AdcInput {
    /// Configure `pin` for raw reads: 12-bit width, 0 dB attenuation.
    pub fn configure(pin: u8) -> Result<Self, MeasureError> {
        use esp_idf_svc::sys::{
            adc1_config_channel_atten, adc1_config_width, adc_atten_t_ADC_ATTEN_DB_0,
            adc_bits_width_t_ADC_WIDTH_BIT_12, ESP_OK,
        };

        let channel = gpio_to_adc1_channel(pin).ok_or(MeasureError::PinNotAdc)?;

        // SAFETY: plain ESP-IDF configuration calls, no aliasing concerns
        unsafe {
            let err = adc1_config_width(adc_bits_width_t_ADC_WIDTH_BIT_12);
            if err != ESP_OK {
                return Err(MeasureError::Hardware(err));
            }
            let err = adc1_config_channel_atten(channel, adc_atten_t_ADC_ATTEN_DB_0);
            if err != ESP_OK {
                return Err(MeasureError::Hardware(err));
            }
        }

        Ok(Self { channel })
    }

    /// Read one raw sample. Short and non-blocking; called from the timer ISR.
    #[inline]
    pub fn read(&self) -> u16 {
        // SAFETY: channel was configured in `configure`
        unsafe { esp_idf_svc::sys::adc1_get_raw(self.channel) as u16 }
    }
}

// Host test double: validates the pin mapping, reads mid-scale.
#[cfg(any(test, not(target_os = "espidf")))]
impl AdcInput {
    pub fn configure(pin: u8) -> Result<Self, MeasureError> {
        let channel = gpio_to_adc1_channel(pin).ok_or(MeasureError::PinNotAdc)?;
        Ok(Self { channel })
    }

    #[inline]
    pub fn read(&self) -> u16 {
        crate::config::ADC_MAX / 2
    }
}

impl AdcInput {
    /// ADC1 channel number behind this input.
    pub fn channel(&self) -> u32 {
        self.channel
    }
}
