use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{error, info, warn};

use crate::ack::AckPulse;
use crate::network::NetworkStatus;
use crate::reading::Reading;
use crate::transport::HttpConnector;
use crate::upload::{Delivery, UploadError, Uploader};

/// Logged when an upload is skipped for lack of connectivity.
pub const NOT_CONNECTED_MESSAGE: &str = "WiFi not connected. Cannot send data.";

/// Uploads readings and reports the outcome on the log and the status LED.
///
/// A successful upload logs the status code and the response body and then
/// pulses the LED. Failures are logged and leave the LED alone. Nothing is retried.
pub struct Reporter<N, C, P, D> {
    uploader: Uploader<N, C>,
    ack: AckPulse<P, D>,
}

impl<N, C, P, D> Reporter<N, C, P, D>
where
    N: NetworkStatus,
    C: HttpConnector,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(uploader: Uploader<N, C>, ack: AckPulse<P, D>) -> Self {
        Self { uploader, ack }
    }

    pub fn uploader(&self) -> &Uploader<N, C> {
        &self.uploader
    }

    /// Uploads one methane/CO2 pair.
    pub fn post_data(&mut self, methane: i32, co2: i32) -> Result<Delivery, UploadError> {
        self.report(&Reading::new(methane, co2))
    }

    /// Uploads `reading`, blocking for the request and, on success, for the LED pulse.
    pub fn report(&mut self, reading: &Reading) -> Result<Delivery, UploadError> {
        let result = self.uploader.upload(reading);

        match &result {
            Ok(delivery) => {
                info!("{}", delivery.status);
                info!("{}", delivery.body);

                if let Err(e) = self.ack.pulse() {
                    warn!("Failed to drive the status LED: {:?}", e);
                }
            }
            Err(UploadError::NotConnected) => warn!("{}", NOT_CONNECTED_MESSAGE),
            Err(e) => error!("Error on sending POST: {}", e),
        }

        result
    }
}
