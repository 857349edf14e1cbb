use esp_idf_svc::hal::adc::attenuation::DB_11;
use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::adc::ADC1;
use esp_idf_svc::hal::gpio::{Gpio3, Gpio4};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::sys::EspError;

use gas_telemetry_common::{Reading, ReadingSource};

/// The two analog gas sensors: methane (MQ-4) on GPIO3 and CO2 (MQ-135) on GPIO4.
///
/// Raw ADC counts are reported, the server does the calibration.
pub struct GasSensors<'d> {
    methane: AdcChannelDriver<'d, Gpio3, &'d AdcDriver<'d, ADC1>>,
    co2: AdcChannelDriver<'d, Gpio4, &'d AdcDriver<'d, ADC1>>,
}

impl<'d> GasSensors<'d> {
    pub fn new(
        adc: &'d AdcDriver<'d, ADC1>,
        methane_pin: impl Peripheral<P = Gpio3> + 'd,
        co2_pin: impl Peripheral<P = Gpio4> + 'd,
    ) -> Result<Self, EspError> {
        // Full range, the sensor modules swing up to 3.3V.
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };

        Ok(Self {
            methane: AdcChannelDriver::new(adc, methane_pin, &config)?,
            co2: AdcChannelDriver::new(adc, co2_pin, &config)?,
        })
    }
}

impl ReadingSource for GasSensors<'_> {
    fn read(&mut self) -> Result<Reading, Box<dyn std::error::Error>> {
        let methane = self.methane.read()?;
        let co2 = self.co2.read()?;

        Ok(Reading::new(methane.into(), co2.into()))
    }
}
