//! Periodic hardware timer with ISR-dispatch callback.
//!
//! Wraps the ESP high-resolution timer (`esp_timer`). The callback runs in
//! interrupt context and must stay short: read one sample, attempt one push.

use core::ffi::c_void;

use crate::error::MeasureError;

/// Interrupt callback signature.
pub type TimerCallback = unsafe extern "C" fn(arg: *mut c_void);

/// An armed periodic timer. Dropping it without [`cancel`](Self::cancel) is a
/// leak on hardware, so the sampler always cancels explicitly.
pub struct PeriodicTimer {
    #[cfg(all(not(test), target_os = "espidf"))]
    handle: esp_idf_svc::sys::esp_timer_handle_t,
    #[cfg(any(test, not(target_os = "espidf")))]
    period_us: u64,
}

#[cfg(all(not(test), target_os = "espidf"))]
impl PeriodicTimer {
    /// Create the timer and start it firing every `period_us` microseconds.
    ///
    /// `arg` is passed verbatim to `callback` on every tick and must stay
    /// valid until [`cancel`](Self::cancel).
    pub fn start_periodic(
        callback: TimerCallback,
        arg: *mut c_void,
        period_us: u64,
    ) -> Result<Self, MeasureError> {
        use esp_idf_svc::sys::{
            esp_timer_create, esp_timer_create_args_t, esp_timer_delete,
            esp_timer_dispatch_t_ESP_TIMER_ISR, esp_timer_handle_t, esp_timer_start_periodic,
            ESP_OK,
        };

        let args = esp_timer_create_args_t {
            callback: Some(callback),
            arg,
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_ISR,
            name: b"lockin\0".as_ptr() as *const core::ffi::c_char,
            skip_unhandled_events: true,
        };

        let mut handle: esp_timer_handle_t = core::ptr::null_mut();

        // SAFETY: args outlives esp_timer_create (it copies), handle is
        // written before use
        unsafe {
            let err = esp_timer_create(&args, &mut handle);
            if err != ESP_OK {
                return Err(MeasureError::Hardware(err));
            }
            let err = esp_timer_start_periodic(handle, period_us);
            if err != ESP_OK {
                esp_timer_delete(handle);
                return Err(MeasureError::Hardware(err));
            }
        }

        Ok(Self { handle })
    }

    /// Stop and delete the timer. After this returns no further callbacks
    /// fire, so the ISR context may be torn down.
    pub fn cancel(self) {
        // SAFETY: handle is valid; stop on an already-stopped timer only
        // returns an ignorable error
        unsafe {
            let _ = esp_idf_svc::sys::esp_timer_stop(self.handle);
            let _ = esp_idf_svc::sys::esp_timer_delete(self.handle);
        }
    }
}

// Host test double: records the period, never fires.
#[cfg(any(test, not(target_os = "espidf")))]
impl PeriodicTimer {
    pub fn start_periodic(
        _callback: TimerCallback,
        _arg: *mut c_void,
        period_us: u64,
    ) -> Result<Self, MeasureError> {
        Ok(Self { period_us })
    }

    pub fn cancel(self) {}

    pub fn period_us(&self) -> u64 {
        self.period_us
    }
}
