use core::time::Duration;

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};
use telemetry_agent_common::platform::{Clock, Delay, Indicator, Level};

/// The on-board status LED.
pub struct StatusLed {
    pin: PinDriver<'static, AnyOutputPin, Output>,
}

impl StatusLed {
    pub fn new(pin: AnyOutputPin) -> anyhow::Result<Self> {
        Ok(Self {
            pin: PinDriver::output(pin)?,
        })
    }
}

impl Indicator for StatusLed {
    fn set_level(&mut self, level: Level) {
        let result = match level {
            Level::On => self.pin.set_high(),
            Level::Off => self.pin.set_low(),
        };

        if let Err(err) = result {
            log::warn!("failed to drive status LED: {err}");
        }
    }
}

/// Time since boot from the esp timer, delays through FreeRTOS.
#[derive(Clone, Copy, Default)]
pub struct EspClock;

impl Clock for EspClock {
    fn now(&self) -> Duration {
        // Microseconds since boot, never negative.
        let micros = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(micros.max(0) as u64)
    }
}

impl Delay for EspClock {
    fn delay(&mut self, duration: Duration) {
        FreeRtos::delay_ms(duration.as_millis().try_into().unwrap_or(u32::MAX));
    }
}
