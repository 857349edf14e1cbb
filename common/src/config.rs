use serde::Deserialize;
use std::time::Duration;

/// Content type of every upload.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// How long the status LED stays on after a successful upload.
pub const DEFAULT_ACK_PULSE: Duration = Duration::from_millis(500);

/// Where and how readings are uploaded.
///
/// Built once by the application and handed to the [`Uploader`](crate::Uploader).
#[derive(Deserialize, Clone, PartialEq)]
pub struct UploadConfig {
    /// Full endpoint URL, e.g. `https://host/api/cin/create/69`.
    pub url: String,

    /// Bearer credential sent in the `Authorization` header.
    pub bearer_token: String,

    /// Length of the acknowledgment pulse.
    #[serde(rename = "ack_pulse_ms", with = "millis", default = "default_ack_pulse")]
    pub ack_pulse: Duration,
}

impl UploadConfig {
    pub fn new(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer_token: bearer_token.into(),
            ack_pulse: DEFAULT_ACK_PULSE,
        }
    }

    pub fn with_ack_pulse(mut self, ack_pulse: Duration) -> Self {
        self.ack_pulse = ack_pulse;
        self
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer_token)
    }

    /// The request headers, in the order they are sent.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("Content-Type", CONTENT_TYPE_JSON.to_string()),
            ("Authorization", self.authorization()),
        ]
    }
}

// The token ends up in log output otherwise.
impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("url", &self.url)
            .field("bearer_token", &"<redacted>")
            .field("ack_pulse", &self.ack_pulse)
            .finish()
    }
}

fn default_ack_pulse() -> Duration {
    DEFAULT_ACK_PULSE
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[test]
fn test_headers() {
    let config = UploadConfig::new("https://example.org/api/cin/create/1", "secret");
    let headers = config.headers();

    assert_eq!(headers[0], ("Content-Type", "application/json".to_string()));
    assert_eq!(headers[1], ("Authorization", "Bearer secret".to_string()));
    assert_eq!(config.ack_pulse, Duration::from_millis(500));
}

#[test]
fn test_debug_hides_token() {
    let config = UploadConfig::new("https://example.org", "c7941a70");
    let printed = format!("{:?}", config);

    assert!(printed.contains("https://example.org"));
    assert!(!printed.contains("c7941a70"));
}

#[test]
fn test_config_from_json() {
    let config: UploadConfig = serde_json::from_str(
        r#"{ "url": "https://example.org/api", "bearer_token": "abc", "ack_pulse_ms": 20 }"#,
    )
    .unwrap();
    assert_eq!(config.ack_pulse, Duration::from_millis(20));

    let config: UploadConfig =
        serde_json::from_str(r#"{ "url": "https://example.org/api", "bearer_token": "abc" }"#)
            .unwrap();
    assert_eq!(config, UploadConfig::new("https://example.org/api", "abc"));
}
