use anyhow::anyhow;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::adc::oneshot::AdcDriver;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{error, info, warn};

use gas_telemetry_common::{AckPulse, ReadingSource, Reporter, Uploader};

mod config;
mod http;
mod sensor;
mod wifi;

use http::EspConnector;
use sensor::GasSensors;
use wifi::StationLink;

fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut link = StationLink::new(BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sys_loop.clone(), Some(nvs))?,
        sys_loop,
    )?);

    // Uploads are skipped (and logged) while the station is down, so keep going.
    if let Err(e) = link.connect() {
        warn!("Failed to connect to WiFi: {}", e);
    }

    let upload_config = config::upload_config();
    info!("Uploading to {:?}", upload_config);

    // Status LED, pulsed after every successful upload.
    let led = PinDriver::output(peripherals.pins.gpio10)?;
    let ack = AckPulse::new(led, FreeRtos, upload_config.ack_pulse)
        .map_err(|e| anyhow!("Failed to drive the status LED: {:?}", e))?;

    let adc = AdcDriver::new(peripherals.adc1)?;
    let mut sensors = GasSensors::new(&adc, peripherals.pins.gpio3, peripherals.pins.gpio4)?;

    let mut reporter = Reporter::new(Uploader::new(link, EspConnector, upload_config), ack);

    loop {
        match sensors.read() {
            Ok(reading) => {
                info!("Methane={} CO2={}", reading.methane, reading.co2);
                // The outcome is already logged by the reporter.
                let _ = reporter.report(&reading);
            }
            Err(e) => error!("Failed to read sensors: {}", e),
        }

        FreeRtos::delay_ms(config::SAMPLE_INTERVAL_MS);
    }
}
