use embedded_svc::http::client::Client as HttpClient;
use embedded_svc::http::Status;
use embedded_svc::io::Write;
use embedded_svc::utils::io;
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

use gas_telemetry_common::{HttpConnection, HttpConnector, HttpResponse, TransportError};

/// Response bodies are truncated to this many bytes.
const MAX_RESPONSE_BODY: usize = 1024;

fn transport<E: core::fmt::Display>(e: E) -> TransportError {
    TransportError::new(e.to_string())
}

/// Opens HTTPS connections through the ESP-IDF HTTP client. Server certificates
/// are checked against the ESP-IDF certificate bundle.
#[derive(Default)]
pub struct EspConnector;

impl HttpConnector for EspConnector {
    type Connection = EspConnection;

    fn open(&mut self) -> Result<EspConnection, TransportError> {
        let configuration = Configuration {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let connection = EspHttpConnection::new(&configuration).map_err(transport)?;

        Ok(EspConnection {
            client: HttpClient::wrap(connection),
        })
    }
}

/// One ESP-IDF HTTP client. Dropping it cleans up the underlying connection.
pub struct EspConnection {
    client: HttpClient<EspHttpConnection>,
}

impl HttpConnection for EspConnection {
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        let content_length = body.len().to_string();
        let mut all_headers = headers.to_vec();
        all_headers.push(("Content-Length", content_length.as_str()));

        let mut request = self.client.post(url, &all_headers).map_err(transport)?;
        request.write_all(body).map_err(transport)?;
        request.flush().map_err(transport)?;
        log::debug!("-> POST {}", url);

        let mut response = request.submit().map_err(transport)?;
        let status = response.status();
        log::debug!("<- {}", status);

        let mut buf = [0u8; MAX_RESPONSE_BODY];
        let bytes_read = io::try_read_full(&mut response, &mut buf).map_err(|e| transport(e.0))?;

        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&buf[..bytes_read]).into_owned(),
        })
    }
}
