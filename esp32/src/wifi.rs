use anyhow::anyhow;
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

use gas_telemetry_common::NetworkStatus;

use crate::config::{WIFI_PASS, WIFI_SSID};

/// The WiFi station, as seen by the uploader.
pub struct StationLink(BlockingWifi<EspWifi<'static>>);

impl StationLink {
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self(wifi)
    }

    /// Configures the station and joins the network.
    pub fn connect(&mut self) -> anyhow::Result<()> {
        let wifi_configuration: Configuration = Configuration::Client(ClientConfiguration {
            ssid: WIFI_SSID
                .try_into()
                .map_err(|_| anyhow!("WIFI_SSID is too long"))?,
            bssid: None,
            auth_method: AuthMethod::WPA2Personal,
            password: WIFI_PASS
                .try_into()
                .map_err(|_| anyhow!("WIFI_PASS is too long"))?,
            channel: None,
            ..Default::default()
        });

        self.0.set_configuration(&wifi_configuration)?;

        self.0.start()?;
        info!("Wifi started");

        self.0.connect()?;
        info!("Wifi connected");

        self.0.wait_netif_up()?;
        info!("Wifi netif up");

        let ip_info = self.0.wifi().sta_netif().get_ip_info()?;
        info!("Wifi DHCP info: {:?}", ip_info);

        Ok(())
    }
}

impl NetworkStatus for StationLink {
    fn is_connected(&self) -> bool {
        self.0.is_connected().unwrap_or_else(|e| {
            warn!("Failed to query WiFi state: {}", e);
            false
        })
    }
}
