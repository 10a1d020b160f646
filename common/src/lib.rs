//! Platform independent part of the telemetry agent.
//!
//! The agent samples a temperature/humidity sensor once per interval and posts the reading to
//! a collector. Everything hardware related sits behind the traits in [`platform`], so the
//! loop runs unchanged on the device and in the host simulator.

pub mod agent;
pub mod backoff;
pub mod config;
pub mod cycle;
pub mod error;
pub mod platform;
pub mod reading;
pub mod status;

#[cfg(test)]
mod testing;

pub use agent::{Agent, CycleReport, CycleTimer};
pub use config::Config;
pub use reading::Reading;
pub use status::{StatusEvent, StatusSignaler, StatusSink};
