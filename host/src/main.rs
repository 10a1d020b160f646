mod collector;
mod sim;

use std::time::Duration;

use telemetry_agent_common::platform::{Delay, SystemClock};
use telemetry_agent_common::{Agent, Config, CycleReport, StatusSignaler};

use collector::DummyCollector;
use sim::{LogIndicator, SimLink, SimSensor};

type SimAgent = Agent<
    SimLink,
    SimSensor,
    DummyCollector,
    StatusSignaler<LogIndicator, SystemClock>,
    SystemClock,
>;

/// Counts how the cycles ended.
#[derive(Debug, Default)]
struct Tally {
    delivered: u32,
    delivery_failed: u32,
    link_down: u32,
    sensor_fault: u32,
}

impl Tally {
    fn record(&mut self, report: &CycleReport) {
        match report {
            CycleReport::Delivered { .. } => self.delivered += 1,
            CycleReport::DeliveryFailed => self.delivery_failed += 1,
            CycleReport::LinkDown => self.link_down += 1,
            CycleReport::SensorFault => self.sensor_fault += 1,
        }
    }
}

/// Our App struct that holds the agent wired to simulated devices.
struct App {
    agent: SimAgent,
    clock: SystemClock,
    tally: Tally,
}

impl App {
    /// A much shorter interval than on the device, so something happens on screen.
    const SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

    fn new() -> anyhow::Result<Self> {
        let seed: u64 = match std::option_env!("SIM_SEED") {
            Some(seed) => seed.parse()?,
            None => 42,
        };

        let config = Config {
            sample_interval: Self::SAMPLE_INTERVAL,
            ..Config::DEFAULT
        };

        let clock = SystemClock::new();
        let agent = Agent::new(
            config,
            SimLink::new(seed, 0.05),
            SimSensor::new(seed.wrapping_add(1), 0.1),
            DummyCollector::new(seed.wrapping_add(2), 0.1),
            StatusSignaler::new(LogIndicator, clock),
            clock,
        );

        Ok(Self {
            agent,
            clock,
            tally: Tally::default(),
        })
    }

    /// Run the agent loop, logging a running tally after every cycle.
    fn run(&mut self) -> anyhow::Result<()> {
        if !self.agent.start() {
            log::warn!("No link at startup, the first cycle will retry");
        }

        let tick = self.agent.config().tick;
        loop {
            if let Some(report) = self.agent.tick() {
                self.tally.record(&report);
                log::info!("Cycle: {:?}, so far {:?}", report, self.tally);
            }
            self.clock.delay(tick);
        }
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new()?;

    app.run()
}
