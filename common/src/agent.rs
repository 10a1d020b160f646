use core::time::Duration;

use crate::backoff::Backoff;
use crate::config::Config;
use crate::cycle::{acquire, deliver, ConnectivityGuard, DeliveryOutcome};
use crate::platform::{Clock, Delay, Link, LinkStatus, Sensor, Transport};
use crate::status::{StatusEvent, StatusSink};

/// Decides when the next cycle is due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleTimer {
    last_attempt: Option<Duration>,
    interval: Duration,
}

impl CycleTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            last_attempt: None,
            interval,
        }
    }

    /// A cycle is due on the very first tick, and afterwards once `interval` has passed since
    /// the last attempt.
    pub fn is_due(&self, now: Duration) -> bool {
        match self.last_attempt {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        }
    }

    /// Records an attempt, whatever its outcome.
    pub fn mark(&mut self, now: Duration) {
        self.last_attempt = Some(now);
    }

    pub fn last_attempt(&self) -> Option<Duration> {
        self.last_attempt
    }
}

/// How a fired cycle ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleReport {
    Delivered { status: i32 },
    DeliveryFailed,
    LinkDown,
    SensorFault,
}

/// The telemetry agent: owns the collaborators and runs the sampling loop.
pub struct Agent<L, S, T, K, C> {
    config: Config,
    link: L,
    sensor: S,
    transport: T,
    status: K,
    clock: C,
    timer: CycleTimer,
    guard: ConnectivityGuard,
}

impl<L, S, T, K, C> Agent<L, S, T, K, C>
where
    L: Link,
    S: Sensor,
    T: Transport,
    K: StatusSink,
    C: Clock + Delay,
{
    pub fn new(config: Config, link: L, sensor: S, transport: T, status: K, clock: C) -> Self {
        Self {
            timer: CycleTimer::new(config.sample_interval),
            guard: ConnectivityGuard::new(Backoff::new(
                config.reconnect_attempts,
                config.reconnect_pause,
            )),
            config,
            link,
            sensor,
            transport,
            status,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timer(&self) -> &CycleTimer {
        &self.timer
    }

    pub fn guard(&self) -> &ConnectivityGuard {
        &self.guard
    }

    /// Brings the link up at boot.
    ///
    /// Returns whether the link is up. Failing here is not fatal: the first cycle will try
    /// to reconnect again.
    pub fn start(&mut self) -> bool {
        log::info!("Agent starting, posting to {}", self.config.endpoint);

        if let Err(e) = self.link.connect() {
            log::warn!("Initial connect failed: {}", e);
        }

        let connected = self.link.status() == LinkStatus::Connected
            || self
                .guard
                .ensure_connected(&mut self.link, &mut self.status, &mut self.clock)
                .is_ok();

        if connected {
            match self.link.local_address() {
                Some(address) => log::info!("Connected, local address {}", address),
                None => log::info!("Connected"),
            }
            self.status.signal(StatusEvent::Connected);
        }

        connected
    }

    /// One scheduler tick. Returns a report if a cycle fired.
    pub fn tick(&mut self) -> Option<CycleReport> {
        let now = self.clock.now();

        if !self.timer.is_due(now) {
            return None;
        }

        self.timer.mark(now);
        log::debug!("Cycle fired at {:?}", now);

        Some(self.run_cycle())
    }

    fn run_cycle(&mut self) -> CycleReport {
        if self
            .guard
            .ensure_connected(&mut self.link, &mut self.status, &mut self.clock)
            .is_err()
        {
            return CycleReport::LinkDown;
        }

        let Some(reading) = acquire(&mut self.sensor, &mut self.status) else {
            return CycleReport::SensorFault;
        };

        match deliver(
            &mut self.transport,
            self.config.endpoint,
            reading,
            &mut self.status,
        ) {
            DeliveryOutcome::Success { status, .. } => CycleReport::Delivered { status },
            DeliveryOutcome::Failure(_) => CycleReport::DeliveryFailed,
        }
    }

    /// Runs the loop forever, idling one tick between checks.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
            self.clock.delay(self.config.tick);
        }
    }
}
