use std::fmt;

use crate::config::UploadConfig;
use crate::network::NetworkStatus;
use crate::reading::Reading;
use crate::transport::{HttpConnection, HttpConnector, TransportError};

/// The only status code treated as a successful upload.
pub const STATUS_OK: u16 = 200;

/// A successful upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
    pub body: String,
}

/// Why an upload did not go through.
#[derive(Debug)]
pub enum UploadError {
    /// No network connectivity, nothing was sent.
    NotConnected,
    /// The server answered with something other than 200.
    RequestFailed { status: u16 },
    /// The request did not produce a status code.
    Transport(TransportError),
    /// The body could not be serialized.
    Encode(serde_json::Error),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "WiFi not connected"),
            Self::RequestFailed { status } => write!(f, "{}", status),
            Self::Transport(e) => write!(f, "{}", e),
            Self::Encode(e) => write!(f, "failed to encode reading: {}", e),
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for UploadError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

/// Posts readings to the configured endpoint, one blocking request per call.
///
/// The uploader has no side effects besides the request itself. Logging and the
/// status LED are handled by the [`Reporter`](crate::Reporter).
pub struct Uploader<N, C> {
    network: N,
    connector: C,
    config: UploadConfig,
}

impl<N: NetworkStatus, C: HttpConnector> Uploader<N, C> {
    pub fn new(network: N, connector: C, config: UploadConfig) -> Self {
        Self {
            network,
            connector,
            config,
        }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Uploads `reading`.
    ///
    /// Returns [`UploadError::NotConnected`] without opening a connection if the
    /// network is down. The connection is released before this returns.
    pub fn upload(&mut self, reading: &Reading) -> Result<Delivery, UploadError> {
        if !self.network.is_connected() {
            return Err(UploadError::NotConnected);
        }

        let body = reading.to_json()?;
        let headers = self.config.headers();
        let headers = headers.iter().map(|(k, v)| (*k, v.as_str())).collect::<Vec<_>>();

        log::debug!("-> POST {} {}", self.config.url, body);

        let response = {
            let mut connection = self.connector.open()?;
            connection.post(&self.config.url, &headers, body.as_bytes())?
        };

        log::debug!("<- {}", response.status);

        if response.status == STATUS_OK {
            Ok(Delivery {
                status: response.status,
                body: response.body,
            })
        } else {
            Err(UploadError::RequestFailed {
                status: response.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyConnector, DummyNetwork, DummyReply};

    fn uploader(
        connected: bool,
        reply: DummyReply,
    ) -> (Uploader<DummyNetwork, DummyConnector>, DummyConnector) {
        let connector = DummyConnector::new(reply);
        let config = UploadConfig::new("https://example.org/api/cin/create/69", "token");
        let uploader = Uploader::new(DummyNetwork::new(connected), connector.clone(), config);
        (uploader, connector)
    }

    #[test]
    fn test_not_connected_sends_nothing() {
        let (mut uploader, connector) = uploader(false, DummyReply::ok("OK"));

        let result = uploader.upload(&Reading::new(1, 2));

        assert!(matches!(result, Err(UploadError::NotConnected)));
        assert_eq!(connector.opened(), 0);
        assert!(connector.requests().is_empty());
    }

    #[test]
    fn test_success() {
        let (mut uploader, connector) = uploader(true, DummyReply::ok("OK"));

        let delivery = uploader.upload(&Reading::new(12, 430)).unwrap();
        assert_eq!(
            delivery,
            Delivery {
                status: 200,
                body: "OK".into()
            }
        );

        let requests = connector.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.org/api/cin/create/69");
        assert_eq!(
            requests[0].headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer token".to_string()),
            ]
        );
        assert_eq!(requests[0].body, br#"{"Methane":12,"CO2":430}"#.to_vec());
        assert_eq!(connector.opened(), 1);
        assert_eq!(connector.released(), 1);
    }

    #[test]
    fn test_non_200_is_failure() {
        for status in [201, 404, 500] {
            let (mut uploader, connector) = uploader(true, DummyReply::status(status, "nope"));

            let result = uploader.upload(&Reading::new(5, 6));

            match result {
                Err(UploadError::RequestFailed { status: s }) => assert_eq!(s, status),
                other => panic!("unexpected result {:?}", other),
            }
            assert_eq!(connector.requests().len(), 1);
            assert_eq!(connector.released(), 1);
        }
    }

    #[test]
    fn test_transport_failure() {
        let (mut uploader, connector) =
            uploader(true, DummyReply::transport_failure("TLS handshake failed"));

        let result = uploader.upload(&Reading::new(5, 6));

        match result {
            Err(UploadError::Transport(e)) => {
                assert_eq!(e, TransportError::new("TLS handshake failed"))
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(connector.opened(), 1);
        assert_eq!(connector.released(), 1);
    }

    #[test]
    fn test_connection_refused() {
        let (mut uploader, connector) = uploader(true, DummyReply::Unreachable("no route".into()));

        let result = uploader.upload(&Reading::new(5, 6));

        assert!(matches!(result, Err(UploadError::Transport(_))));
        assert_eq!(connector.opened(), 0);
        assert!(connector.requests().is_empty());
    }
}
