//! Status indicator patterns.
//!
//! The control components only emit [`StatusEvent`]s. [`StatusSignaler`] is the single place
//! that turns them into level changes on the [`Indicator`].

use core::time::Duration;

use crate::platform::{Delay, Indicator, Level};

/// Something worth showing on the status LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    /// Waiting for the link to come back, emitted once per reconnect attempt.
    Connecting,
    /// The link came up at boot.
    Connected,
    /// The link came back during a cycle. Ends the `Connecting` toggling dark.
    LinkRestored,
    /// The sensor returned an invalid reading.
    SensorError,
    /// A request is in flight.
    Sending,
    SendSuccess,
    SendFailure,
}

/// One level held for a duration. A zero duration just sets the level.
pub type Step = (Level, Duration);

const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

const CONNECTED: &[Step] = &[
    (Level::On, ms(100)),
    (Level::Off, ms(100)),
    (Level::On, ms(100)),
    (Level::Off, ms(100)),
    (Level::On, ms(100)),
    (Level::Off, ms(100)),
    (Level::On, ms(100)),
    (Level::Off, ms(100)),
    (Level::On, ms(100)),
    (Level::Off, ms(100)),
];

const SENSOR_ERROR: &[Step] = &[
    (Level::On, ms(500)),
    (Level::Off, ms(500)),
    (Level::On, ms(500)),
    (Level::Off, ms(500)),
    (Level::On, ms(500)),
    (Level::Off, ms(500)),
];

const LINK_RESTORED: &[Step] = &[(Level::Off, Duration::ZERO)];

const SENDING: &[Step] = &[(Level::On, Duration::ZERO)];

const SEND_SUCCESS: &[Step] = &[
    (Level::Off, ms(50)),
    (Level::On, ms(200)),
    (Level::Off, Duration::ZERO),
];

const SEND_FAILURE: &[Step] = &[
    (Level::Off, ms(50)),
    (Level::On, ms(100)),
    (Level::Off, ms(100)),
    (Level::On, ms(100)),
    (Level::Off, ms(100)),
];

/// How an event looks on the indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Flip whatever the indicator currently shows. The caller's own pause sets the cadence.
    Toggle,
    Steps(&'static [Step]),
}

impl Pattern {
    /// Number of off-to-on transitions, which is what an observer counts as blinks.
    pub fn pulses(&self) -> usize {
        match self {
            Pattern::Toggle => 1,
            Pattern::Steps(steps) => steps.iter().filter(|(level, _)| *level == Level::On).count(),
        }
    }

    /// Longest time the indicator is held on in this pattern.
    pub fn longest_on(&self) -> Duration {
        match self {
            Pattern::Toggle => Duration::ZERO,
            Pattern::Steps(steps) => steps
                .iter()
                .filter(|(level, _)| *level == Level::On)
                .map(|(_, duration)| *duration)
                .max()
                .unwrap_or_default(),
        }
    }
}

impl StatusEvent {
    pub fn pattern(self) -> Pattern {
        match self {
            StatusEvent::Connecting => Pattern::Toggle,
            StatusEvent::Connected => Pattern::Steps(CONNECTED),
            StatusEvent::LinkRestored => Pattern::Steps(LINK_RESTORED),
            StatusEvent::SensorError => Pattern::Steps(SENSOR_ERROR),
            StatusEvent::Sending => Pattern::Steps(SENDING),
            StatusEvent::SendSuccess => Pattern::Steps(SEND_SUCCESS),
            StatusEvent::SendFailure => Pattern::Steps(SEND_FAILURE),
        }
    }
}

/// Receiver of status events.
pub trait StatusSink {
    fn signal(&mut self, event: StatusEvent);
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn signal(&mut self, event: StatusEvent) {
        (**self).signal(event)
    }
}

/// Plays [`StatusEvent`] patterns on an [`Indicator`].
pub struct StatusSignaler<I, D> {
    indicator: I,
    delay: D,
    level: Level,
}

impl<I: Indicator, D: Delay> StatusSignaler<I, D> {
    /// Creates the signaler and switches the indicator off.
    pub fn new(mut indicator: I, delay: D) -> Self {
        indicator.set_level(Level::Off);

        Self {
            indicator,
            delay,
            level: Level::Off,
        }
    }

    /// Current level of the indicator.
    pub fn level(&self) -> Level {
        self.level
    }

    fn set(&mut self, level: Level) {
        self.indicator.set_level(level);
        self.level = level;
    }
}

impl<I: Indicator, D: Delay> StatusSink for StatusSignaler<I, D> {
    fn signal(&mut self, event: StatusEvent) {
        log::debug!("Status: {:?}", event);

        match event.pattern() {
            Pattern::Toggle => {
                let level = !self.level;
                self.set(level);
            }
            Pattern::Steps(steps) => {
                for &(level, duration) in steps {
                    self.set(level);
                    if !duration.is_zero() {
                        self.delay.delay(duration);
                    }
                }
            }
        }
    }
}
