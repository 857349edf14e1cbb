use std::fmt;

/// Status code and body of a finished request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP client failed before a status code was available,
/// e.g. on DNS resolution, TLS handshake or a dropped socket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Opens HTTP connections.
pub trait HttpConnector {
    type Connection: HttpConnection;

    /// Acquires a connection. It is released when dropped.
    fn open(&mut self) -> Result<Self::Connection, TransportError>;
}

/// A single open HTTP connection.
pub trait HttpConnection {
    /// Sends a blocking POST and waits for the response.
    fn post(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<HttpResponse, TransportError>;
}
