//! Uploads methane and CO2 readings to a remote HTTP endpoint and acknowledges
//! each successful upload with a pulse on a status LED.
//!
//! The crate is hardware independent. Platforms plug in through
//! [`NetworkStatus`], [`HttpConnector`], [`ReadingSource`] and the `embedded-hal`
//! [`OutputPin`](embedded_hal::digital::OutputPin) and
//! [`DelayNs`](embedded_hal::delay::DelayNs) traits.

pub mod ack;
pub mod config;
pub mod dummy;
pub mod network;
pub mod reading;
pub mod reporter;
pub mod sensor;
pub mod transport;
pub mod upload;

pub use ack::{AckPulse, StdDelay};
pub use config::{UploadConfig, CONTENT_TYPE_JSON, DEFAULT_ACK_PULSE};
pub use network::NetworkStatus;
pub use reading::Reading;
pub use reporter::{Reporter, NOT_CONNECTED_MESSAGE};
pub use sensor::ReadingSource;
pub use transport::{HttpConnection, HttpConnector, HttpResponse, TransportError};
pub use upload::{Delivery, UploadError, Uploader, STATUS_OK};

/// Hands the latest value from one thread to another, e.g. from a thread sampling
/// the sensors to the one uploading. Older values that were never taken are overwritten.
#[derive(Clone)]
pub struct ValueStore<T>(std::sync::Arc<std::sync::Mutex<Option<T>>>);

impl<T> Default for ValueStore<T> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<T> ValueStore<T> {
    /// Stores `value`, replacing whatever was there.
    ///
    /// # Panics
    ///
    /// If locking the internally used mutex fails.
    pub fn set(&self, value: T) {
        let mut data = self.0.lock().unwrap();
        let _ = data.insert(value);
    }

    /// Takes the stored value, leaving the store empty.
    ///
    /// # Panics
    ///
    /// If locking the internally used mutex fails.
    pub fn take(&self) -> Option<T> {
        self.0.lock().unwrap().take()
    }
}

#[test]
fn test_value_store_keeps_latest() {
    let store = ValueStore::default();
    let producer = store.clone();

    std::thread::spawn(move || {
        producer.set(Reading::new(1, 2));
        producer.set(Reading::new(3, 4));
    })
    .join()
    .unwrap();

    assert_eq!(store.take(), Some(Reading::new(3, 4)));
    assert_eq!(store.take(), None);
}
