//! Simulated devices for running the agent on a desktop.

use std::cell::{Cell, RefCell};
use std::net::{IpAddr, Ipv4Addr};

use telemetry_agent_common::error::SensorError;
use telemetry_agent_common::platform::{Indicator, Level, Link, LinkStatus, Sensor};

/// A WiFi station that drops now and then and takes a random number of polls to come back.
pub struct SimLink {
    rng: RefCell<fastrand::Rng>,
    connected: Cell<bool>,
    polls_until_up: Cell<Option<u32>>,
    drop_chance: f32,
}

impl SimLink {
    pub fn new(seed: u64, drop_chance: f32) -> Self {
        Self {
            rng: RefCell::new(fastrand::Rng::with_seed(seed)),
            connected: Cell::new(false),
            polls_until_up: Cell::new(None),
            drop_chance,
        }
    }

    fn associate(&self, max_polls: u32) {
        let polls = self.rng.borrow_mut().u32(1..=max_polls);
        log::debug!("Simulated link up after {} polls", polls);
        self.polls_until_up.set(Some(polls));
    }
}

impl Link for SimLink {
    type Error = std::convert::Infallible;

    fn connect(&mut self) -> Result<(), Self::Error> {
        self.associate(5);
        Ok(())
    }

    fn status(&self) -> LinkStatus {
        if self.connected.get() {
            if self.rng.borrow_mut().f32() < self.drop_chance {
                log::warn!("Simulated link dropped");
                self.connected.set(false);
            }
        } else if let Some(polls) = self.polls_until_up.get() {
            let polls = polls.saturating_sub(1);
            if polls == 0 {
                self.connected.set(true);
                self.polls_until_up.set(None);
            } else {
                self.polls_until_up.set(Some(polls));
            }
        }

        if self.connected.get() {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    fn reconnect(&mut self) -> Result<(), Self::Error> {
        // Sometimes longer than the guard is willing to wait.
        self.associate(30);
        Ok(())
    }

    fn local_address(&self) -> Option<IpAddr> {
        self.connected
            .get()
            .then_some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 42)))
    }
}

/// A DHT22-like sensor drifting around room conditions.
///
/// Like the real driver, one bus transaction yields both values: it happens on
/// [`Sensor::read_humidity`] and [`Sensor::read_temperature`] returns the value from that
/// same transaction.
pub struct SimSensor {
    rng: fastrand::Rng,
    temperature: f32,
    humidity: f32,
    last: Result<f32, SensorError>,
    fault_chance: f32,
}

impl SimSensor {
    pub fn new(seed: u64, fault_chance: f32) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            temperature: 28.0,
            humidity: 50.0,
            last: Ok(28.0),
            fault_chance,
        }
    }

    fn drift(&mut self, value: f32, step: f32) -> f32 {
        value + (self.rng.f32() - 0.5) * 2.0 * step
    }
}

impl Sensor for SimSensor {
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        if self.rng.f32() < self.fault_chance {
            // Half of the faults surface as a driver error, the other half as a NaN value.
            return if self.rng.bool() {
                self.last = Err(SensorError::Timeout);
                Err(SensorError::Timeout)
            } else {
                self.last = Ok(f32::NAN);
                Ok(f32::NAN)
            };
        }

        self.temperature = self.drift(self.temperature, 0.5);
        self.humidity = self.drift(self.humidity, 2.0).clamp(0.0, 100.0);
        self.last = Ok(self.temperature);

        Ok(self.humidity)
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.last.clone()
    }
}

/// Prints the status LED to the log.
#[derive(Default)]
pub struct LogIndicator;

impl Indicator for LogIndicator {
    fn set_level(&mut self, level: Level) {
        log::trace!(
            "LED {}",
            match level {
                Level::On => "●",
                Level::Off => "○",
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_comes_up_after_connect() {
        let mut link = SimLink::new(7, 0.0);
        assert_eq!(link.status(), LinkStatus::Disconnected);

        link.connect().unwrap();
        let up = (0..5).any(|_| link.status() == LinkStatus::Connected);

        assert!(up);
        assert!(link.local_address().is_some());
    }

    #[test]
    fn faultless_sensor_stays_in_range() {
        let mut sensor = SimSensor::new(7, 0.0);

        for _ in 0..1000 {
            let humidity = sensor.read_humidity().unwrap();
            let temperature = sensor.read_temperature().unwrap();
            assert!((0.0..=100.0).contains(&humidity));
            assert!(temperature.is_finite());
        }
    }

    #[test]
    fn faulty_sensor_reports_faults() {
        let mut sensor = SimSensor::new(7, 1.0);

        for _ in 0..10 {
            match sensor.read_humidity() {
                Err(_) => assert!(sensor.read_temperature().is_err()),
                Ok(value) => assert!(value.is_nan()),
            }
        }
    }
}
