use std::net::IpAddr;

use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::info;
use telemetry_agent_common::platform::{Link, LinkStatus};

const SSID: &str = env!("WIFI_SSID");
const PASSWORD: &str = env!("WIFI_PASS");

/// The WiFi station as the agent's link.
///
/// Association is only kicked off here; waiting for it is left to the connectivity guard.
pub struct WifiLink {
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl WifiLink {
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self { wifi }
    }
}

impl Link for WifiLink {
    type Error = anyhow::Error;

    fn connect(&mut self) -> anyhow::Result<()> {
        let wifi_configuration: Configuration = Configuration::Client(ClientConfiguration {
            ssid: SSID
                .try_into()
                .map_err(|_| anyhow::anyhow!("SSID too long: {}", SSID))?,
            bssid: None,
            auth_method: AuthMethod::WPA2Personal,
            password: PASSWORD
                .try_into()
                .map_err(|_| anyhow::anyhow!("WiFi password too long"))?,
            channel: None,
            ..Default::default()
        });

        self.wifi.set_configuration(&wifi_configuration)?;

        self.wifi.start()?;
        info!("Wifi started");

        self.wifi.wifi_mut().connect()?;
        info!("Wifi connecting to {}", SSID);

        Ok(())
    }

    fn status(&self) -> LinkStatus {
        let up = self.wifi.is_connected().unwrap_or(false) && self.wifi.is_up().unwrap_or(false);

        if up {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    fn reconnect(&mut self) -> anyhow::Result<()> {
        // A stale association has to be torn down before esp-idf accepts a new one.
        if let Err(err) = self.wifi.wifi_mut().disconnect() {
            log::debug!("Wifi disconnect before reconnect failed: {err}");
        }
        self.wifi.wifi_mut().connect()?;
        info!("Wifi reconnecting to {}", SSID);

        Ok(())
    }

    fn local_address(&self) -> Option<IpAddr> {
        let ip_info = self.wifi.wifi().sta_netif().get_ip_info().ok()?;
        info!("Wifi DHCP info: {:?}", ip_info);

        Some(IpAddr::V4(ip_info.ip))
    }
}
