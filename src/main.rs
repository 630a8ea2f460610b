//! rust-lockin-meter - Main entry point
//!
//! Wires the measurement core to the hardware: static sample buffer, one
//! controller instance, 50 Hz grid measurement on GPIO34, results logged once
//! per one-second window.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys as esp_idf_sys;

#[cfg(target_os = "espidf")]
use rust_lockin_meter::{
    buffer::SampleBuffer,
    config::{DEFAULT_BASE_FREQUENCY_HZ, DEFAULT_PIN},
    meter::LockinMeter,
    trig::TrigMode,
};

// The ring buffer is static because the interrupt handler keeps a
// back-reference to it for the lifetime of the session.
#[cfg(target_os = "espidf")]
static SAMPLES: SampleBuffer = SampleBuffer::new();

// One controller instance per pin/timer; constructed once at startup.
#[cfg(target_os = "espidf")]
static mut METER: Option<LockinMeter> = None;

// The firmware entry point only exists on the ESP-IDF target; this stub
// keeps the binary target buildable on the host.
#[cfg(not(target_os = "espidf"))]
fn main() {}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("{}", env!("VERSION_STRING"));

    // SAFETY: written once here, before any other access.
    let meter = unsafe {
        METER = Some(LockinMeter::new(&SAMPLES));
        METER.as_mut().unwrap()
    };

    if let Err(err) = meter.init(DEFAULT_PIN, DEFAULT_BASE_FREQUENCY_HZ, TrigMode::Table) {
        log::error!("init failed: {}", err);
        return;
    }
    if let Err(err) = meter.start() {
        log::error!("start failed: {}", err);
        return;
    }

    let mut reported_overruns = 0;
    loop {
        match meter.poll() {
            Ok(Some(result)) => {
                log::info!(
                    "angle {:+8.3} deg  amplitude {:9.2}",
                    result.angle_degrees,
                    result.amplitude
                );

                let overruns = meter.overruns();
                if overruns != reported_overruns {
                    log::warn!(
                        "sampler dropped {} samples (poll too slow?)",
                        overruns - reported_overruns
                    );
                    reported_overruns = overruns;
                }
            }
            Ok(None) => {}
            Err(err) => {
                log::error!("poll failed: {}", err);
            }
        }

        // ~100 ms cadence: well under the buffer's ~400 ms of backlog.
        unsafe {
            esp_idf_sys::vTaskDelay(10);
        }
    }
}
