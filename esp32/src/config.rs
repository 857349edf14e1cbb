use gas_telemetry_common::UploadConfig;

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASS: &str = env!("WIFI_PASS");

const CTOP_URL: &str = match option_env!("CTOP_URL") {
    Some(url) => url,
    None => "https://ctop.iiit.ac.in/api/cin/create/69",
};
const CTOP_TOKEN: &str = env!("CTOP_TOKEN");

/// Milliseconds between two samples (and uploads).
pub const SAMPLE_INTERVAL_MS: u32 = 15_000;

pub fn upload_config() -> UploadConfig {
    UploadConfig::new(CTOP_URL, CTOP_TOKEN)
}
