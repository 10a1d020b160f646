//! The collaborators the control loop talks to.
//!
//! To be implemented for each platform the agent runs on: the firmware backs them with
//! esp-idf drivers, the host simulator with simulated devices.

use core::time::Duration;
use std::net::IpAddr;

use crate::error::{SensorError, TransportError};

/// Monotonic time since boot.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Blocking wait. Every suspension point of the agent goes through this.
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// Link state as reported by the connectivity provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    Disconnected,
}

/// The network connectivity provider (WiFi station on the device).
pub trait Link {
    type Error: core::fmt::Display;

    /// Starts the initial association.
    fn connect(&mut self) -> Result<(), Self::Error>;

    fn status(&self) -> LinkStatus;

    /// Kicks off a new association attempt after the link was lost.
    fn reconnect(&mut self) -> Result<(), Self::Error>;

    fn local_address(&self) -> Option<IpAddr>;
}

/// Temperature/humidity sensor driver.
pub trait Sensor {
    /// Temperature in degrees Celsius.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, SensorError>;
}

/// What the collector answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// Status code as surfaced by the client. Clients that report connection level
    /// failures as codes use non-positive values for them.
    pub status: i32,
    pub body: String,
}

/// HTTP client used for delivery. One call is one request over a connection that
/// lives only for that call.
pub trait Transport {
    /// Posts `body` to `url` with `Content-Type: application/json`.
    fn post_json(&mut self, url: &str, body: &str) -> Result<Response, TransportError>;
}

/// Output level of the status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    On,
    Off,
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::On => Level::Off,
            Level::Off => Level::On,
        }
    }
}

/// The single status output (an LED on the device).
pub trait Indicator {
    fn set_level(&mut self, level: Level);
}

/// [`Clock`] and [`Delay`] backed by the standard library.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    boot: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            boot: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.boot.elapsed()
    }
}

impl Delay for SystemClock {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
