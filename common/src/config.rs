use core::time::Duration;

/// Build-time settings of the agent.
///
/// Everything here is fixed when the firmware is compiled. The collector URL can be
/// overridden with the `COLLECTOR_URL` environment variable at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// URL the readings are posted to.
    pub endpoint: &'static str,
    /// Minimum time between two cycle attempts.
    pub sample_interval: Duration,
    /// How often the link status is polled after a reconnect before the cycle gives up.
    pub reconnect_attempts: u32,
    /// Pause after every reconnect poll.
    pub reconnect_pause: Duration,
    /// Idle time between two scheduler ticks.
    pub tick: Duration,
}

impl Config {
    pub const DEFAULT_ENDPOINT: &'static str = "http://192.168.1.100:8000/update";
    pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(60_000);
    pub const RECONNECT_ATTEMPTS: u32 = 20;
    pub const RECONNECT_PAUSE: Duration = Duration::from_millis(100);
    pub const TICK: Duration = Duration::from_millis(10);

    pub const DEFAULT: Self = Self {
        endpoint: match option_env!("COLLECTOR_URL") {
            Some(url) => url,
            None => Self::DEFAULT_ENDPOINT,
        },
        sample_interval: Self::SAMPLE_INTERVAL,
        reconnect_attempts: Self::RECONNECT_ATTEMPTS,
        reconnect_pause: Self::RECONNECT_PAUSE,
        tick: Self::TICK,
    };
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.sample_interval, Duration::from_secs(60));
    assert_eq!(config.reconnect_attempts, 20);
    assert_eq!(config.reconnect_pause, Duration::from_millis(100));
    assert!(config.tick < config.reconnect_pause);
    assert!(config.endpoint.starts_with("http"));
}
