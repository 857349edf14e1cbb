//! Stand-in collaborators for running the uploader without hardware.
//!
//! Used by the desktop simulator and by the tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::network::NetworkStatus;
use crate::sensor::ReadingSource;
use crate::transport::{HttpConnection, HttpConnector, HttpResponse, TransportError};
use crate::Reading;

/// A network whose state is set by hand. Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct DummyNetwork(Arc<AtomicBool>);

impl DummyNetwork {
    pub fn new(connected: bool) -> Self {
        Self(Arc::new(AtomicBool::new(connected)))
    }

    pub fn set_connected(&self, connected: bool) {
        self.0.store(connected, Ordering::SeqCst);
    }
}

impl NetworkStatus for DummyNetwork {
    fn is_connected(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the dummy server does with a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DummyReply {
    /// Answer with a status code and body.
    Status(u16, String),
    /// Fail the request after the connection was opened.
    TransportFailure(String),
    /// Fail to open the connection at all.
    Unreachable(String),
}

impl DummyReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Status(200, body.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status(status, body.into())
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::TransportFailure(message.into())
    }
}

/// A request as seen by the [`DummyConnector`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Debug, Default)]
struct Journal {
    requests: Vec<RecordedRequest>,
    opened: usize,
    released: usize,
}

/// Connector that answers every request with a fixed [`DummyReply`] and keeps a
/// journal of what happened. Clones share the journal.
#[derive(Clone, Debug)]
pub struct DummyConnector {
    reply: Arc<Mutex<DummyReply>>,
    journal: Arc<Mutex<Journal>>,
}

impl DummyConnector {
    pub fn new(reply: DummyReply) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply)),
            journal: Arc::default(),
        }
    }

    /// Changes the reply for subsequent requests.
    ///
    /// # Panics
    ///
    /// If locking the internally used mutex fails.
    pub fn set_reply(&self, reply: DummyReply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// All requests sent so far.
    ///
    /// # Panics
    ///
    /// If locking the internally used mutex fails.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.journal.lock().unwrap().requests.clone()
    }

    /// Number of connections opened so far.
    pub fn opened(&self) -> usize {
        self.journal.lock().unwrap().opened
    }

    /// Number of connections released so far.
    pub fn released(&self) -> usize {
        self.journal.lock().unwrap().released
    }
}

impl Default for DummyConnector {
    fn default() -> Self {
        Self::new(DummyReply::ok("OK"))
    }
}

impl HttpConnector for DummyConnector {
    type Connection = DummyConnection;

    fn open(&mut self) -> Result<DummyConnection, TransportError> {
        let reply = self.reply.lock().unwrap().clone();
        if let DummyReply::Unreachable(message) = &reply {
            return Err(TransportError(message.clone()));
        }

        self.journal.lock().unwrap().opened += 1;

        Ok(DummyConnection {
            reply,
            journal: self.journal.clone(),
        })
    }
}

/// Connection handed out by the [`DummyConnector`].
pub struct DummyConnection {
    reply: DummyReply,
    journal: Arc<Mutex<Journal>>,
}

impl HttpConnection for DummyConnection {
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        self.journal.lock().unwrap().requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_vec(),
        });

        match &self.reply {
            DummyReply::Status(status, body) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            DummyReply::TransportFailure(message) | DummyReply::Unreachable(message) => {
                Err(TransportError(message.clone()))
            }
        }
    }
}

impl Drop for DummyConnection {
    fn drop(&mut self) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.released += 1;
        }
    }
}

/// Cycles through a fixed list of readings.
pub struct DummyReadingSource {
    readings: Vec<Reading>,
    next: usize,
}

impl DummyReadingSource {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings, next: 0 }
    }
}

impl Default for DummyReadingSource {
    fn default() -> Self {
        Self::new(vec![
            Reading::new(12, 430),
            Reading::new(15, 455),
            Reading::new(21, 512),
            Reading::new(18, 470),
        ])
    }
}

impl ReadingSource for DummyReadingSource {
    fn read(&mut self) -> Result<Reading, Box<dyn std::error::Error>> {
        let reading = *self
            .readings
            .get(self.next)
            .ok_or("no dummy readings configured")?;
        self.next = (self.next + 1) % self.readings.len();
        Ok(reading)
    }
}

#[test]
fn test_dummy_reading_source_cycles() {
    let mut source = DummyReadingSource::new(vec![Reading::new(1, 2), Reading::new(3, 4)]);

    assert_eq!(source.read().unwrap(), Reading::new(1, 2));
    assert_eq!(source.read().unwrap(), Reading::new(3, 4));
    assert_eq!(source.read().unwrap(), Reading::new(1, 2));

    assert!(DummyReadingSource::new(vec![]).read().is_err());
}

#[test]
fn test_dummy_network_is_shared() {
    let network = DummyNetwork::new(false);
    let handle = network.clone();

    handle.set_connected(true);
    assert!(network.is_connected());
}

#[test]
fn test_dummy_connector_set_reply() {
    let mut connector = DummyConnector::new(DummyReply::ok("OK"));
    let handle = connector.clone();

    let first = connector.open().unwrap().post("http://x", &[], b"{}");
    handle.set_reply(DummyReply::status(500, "down"));
    let second = connector.open().unwrap().post("http://x", &[], b"{}");

    assert_eq!(first.unwrap().status, 200);
    assert_eq!(
        second.unwrap(),
        HttpResponse {
            status: 500,
            body: "down".into()
        }
    );
    assert_eq!(connector.requests().len(), 2);
    assert_eq!(connector.released(), 2);
}
