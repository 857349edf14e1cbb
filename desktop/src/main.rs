use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use embedded_hal::digital::{ErrorType, OutputPin};
use gas_telemetry_common::dummy::{DummyConnector, DummyNetwork, DummyReadingSource, DummyReply};
use gas_telemetry_common::{
    AckPulse, Reading, ReadingSource, Reporter, StdDelay, UploadConfig, Uploader, ValueStore,
};
use log::{error, info};

const DEFAULT_URL: &str = "https://ctop.iiit.ac.in/api/cin/create/69";

/// Stands in for the status LED and logs every level change.
struct ConsoleLed;

impl ErrorType for ConsoleLed {
    type Error = Infallible;
}

impl OutputPin for ConsoleLed {
    fn set_low(&mut self) -> Result<(), Infallible> {
        log::debug!("LED off");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        info!("LED on");
        Ok(())
    }
}

/// Simulation settings, read from the environment.
#[derive(Debug, PartialEq)]
struct Settings {
    url: String,
    token: String,
    /// Status the dummy server answers with on failing rounds.
    fail_status: u16,
    rounds: usize,
}

impl Settings {
    fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            url: lookup("CTOP_URL").unwrap_or_else(|| DEFAULT_URL.to_string()),
            token: lookup("CTOP_TOKEN").unwrap_or_else(|| "dummy-token".to_string()),
            fail_status: parse_or(lookup("SIM_FAIL_STATUS"), 500)?,
            rounds: parse_or(lookup("SIM_ROUNDS"), 8)?,
        })
    }
}

fn parse_or<T>(value: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(value) => Ok(value.parse()?),
        None => Ok(default),
    }
}

type SimReporter = Reporter<DummyNetwork, DummyConnector, ConsoleLed, StdDelay>;

/// Simulates the device: a sensor thread samples dummy readings, the main loop
/// uploads the latest one to a dummy server.
///
/// Every `OFFLINE_EVERY`th round the simulated WiFi link is down, every
/// `FAIL_EVERY`th round the server answers with the configured failure status.
struct App {
    reporter: SimReporter,
    network: DummyNetwork,
    server: DummyConnector,
    latest: ValueStore<Reading>,
    settings: Settings,
}

impl App {
    const SAMPLE_INTERVAL: Duration = Duration::from_millis(400);
    const UPLOAD_INTERVAL: Duration = Duration::from_secs(1);
    const OFFLINE_EVERY: usize = 4;
    const FAIL_EVERY: usize = 3;

    fn new(settings: Settings) -> anyhow::Result<Self> {
        // Keep the simulation snappy.
        let config = UploadConfig::new(settings.url.clone(), settings.token.clone())
            .with_ack_pulse(Duration::from_millis(100));
        info!("Using {:?}", config);

        let network = DummyNetwork::new(true);
        let server = DummyConnector::default();
        let ack = AckPulse::new(ConsoleLed, StdDelay, config.ack_pulse)?;
        let uploader = Uploader::new(network.clone(), server.clone(), config);

        Ok(Self {
            reporter: Reporter::new(uploader, ack),
            network,
            server,
            latest: ValueStore::default(),
            settings,
        })
    }

    /// How the dummy server answers in `round`.
    fn reply_for_round(&self, round: usize) -> DummyReply {
        if round % Self::FAIL_EVERY == 0 {
            DummyReply::status(self.settings.fail_status, "Simulated failure")
        } else {
            DummyReply::ok("OK")
        }
    }

    fn spawn_sampler(&self) {
        let latest = self.latest.clone();
        std::thread::spawn(move || {
            let mut source = DummyReadingSource::default();
            loop {
                match source.read() {
                    Ok(reading) => latest.set(reading),
                    Err(e) => error!("Failed to read sensors: {}", e),
                }
                std::thread::sleep(Self::SAMPLE_INTERVAL);
            }
        });
    }

    fn run(&mut self) -> anyhow::Result<()> {
        self.spawn_sampler();

        for round in 1..=self.settings.rounds {
            std::thread::sleep(Self::UPLOAD_INTERVAL);

            self.network.set_connected(round % Self::OFFLINE_EVERY != 0);
            self.server.set_reply(self.reply_for_round(round));

            let Some(reading) = self.latest.take() else {
                info!("No new reading yet");
                continue;
            };

            info!("Round {}: Methane={} CO2={}", round, reading.methane, reading.co2);
            // The outcome is already logged by the reporter.
            let _ = self.reporter.report(&reading);
        }

        Ok(())
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new(Settings::from_env()?)?;

    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gas_telemetry_common::UploadError;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        Settings::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn test_settings_defaults() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.url, DEFAULT_URL);
        assert_eq!(settings.fail_status, 500);
        assert_eq!(settings.rounds, 8);
    }

    #[test]
    fn test_settings_from_vars() {
        let settings = settings(&[
            ("CTOP_URL", "http://localhost:8080/api"),
            ("CTOP_TOKEN", "abc"),
            ("SIM_FAIL_STATUS", "404"),
            ("SIM_ROUNDS", "2"),
        ])
        .unwrap();

        assert_eq!(
            settings,
            Settings {
                url: "http://localhost:8080/api".into(),
                token: "abc".into(),
                fail_status: 404,
                rounds: 2,
            }
        );

        assert!(self::settings(&[("SIM_FAIL_STATUS", "teapot")]).is_err());
    }

    #[test]
    fn test_failing_rounds() {
        let mut app = App::new(settings(&[("SIM_FAIL_STATUS", "503")]).unwrap()).unwrap();

        let mut statuses = Vec::new();
        for round in 1..=3 {
            app.server.set_reply(app.reply_for_round(round));
            statuses.push(match app.reporter.post_data(1, 2) {
                Ok(delivery) => delivery.status,
                Err(UploadError::RequestFailed { status }) => status,
                Err(e) => panic!("unexpected error {}", e),
            });
        }

        assert_eq!(statuses, vec![200, 200, 503]);
        assert_eq!(app.server.requests().len(), 3);
    }
}
