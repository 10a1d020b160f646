mod dht22;
mod http;
mod led;
mod wifi;

use core::time::Duration;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::OutputPin;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::info;

use telemetry_agent_common::{Agent, Config, StatusSignaler};

/// GPIO the DHT22 data line is wired to.
const DHT22_PIN: i32 = 13;

/// Timeout of a single POST, including connect.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sys_loop.clone(), Some(nvs))?,
        sys_loop,
    )?;

    let clock = led::EspClock;
    let status = StatusSignaler::new(
        led::StatusLed::new(peripherals.pins.gpio2.downgrade_output())?,
        clock,
    );

    let config = Config::default();
    info!(
        "Sampling every {:?}, collector {}",
        config.sample_interval, config.endpoint
    );

    let mut agent = Agent::new(
        config,
        wifi::WifiLink::new(wifi),
        dht22::Dht22Sensor::new(DHT22_PIN),
        http::EspTransport::new(HTTP_TIMEOUT),
        status,
        clock,
    );

    agent.start();
    agent.run()
}
