use core::time::Duration;

use embedded_svc::http::client::Client as HttpClient;
use embedded_svc::io::Write;
use embedded_svc::utils::io;
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use telemetry_agent_common::error::TransportError;
use telemetry_agent_common::platform::{Response, Transport};

/// Posts over a fresh `EspHttpConnection` per request.
///
/// The connection is created inside [`Transport::post_json`] and dropped before it returns,
/// on every path.
pub struct EspTransport {
    timeout: Duration,
}

impl EspTransport {
    const MAX_BODY: usize = 1024;

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn new_client(&self) -> Result<HttpClient<EspHttpConnection>, TransportError> {
        let connection = EspHttpConnection::new(&Configuration {
            timeout: Some(self.timeout),
            ..Default::default()
        })
        .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(HttpClient::wrap(connection))
    }
}

impl Transport for EspTransport {
    fn post_json(&mut self, url: &str, body: &str) -> Result<Response, TransportError> {
        let mut client = self.new_client()?;

        let content_length = body.len().to_string();
        let headers = [
            ("content-type", "application/json"),
            ("content-length", content_length.as_str()),
        ];

        let mut request = client
            .post(url, &headers)
            .map_err(|e| TransportError::Request(format!("{e:?}")))?;
        request
            .write_all(body.as_bytes())
            .map_err(|e| TransportError::Request(format!("{e:?}")))?;
        request
            .flush()
            .map_err(|e| TransportError::Request(format!("{e:?}")))?;

        let mut response = request
            .submit()
            .map_err(|e| TransportError::Request(format!("{e:?}")))?;
        let status = i32::from(response.status());

        let mut buf = [0u8; Self::MAX_BODY];
        let bytes_read = io::try_read_full(&mut response, &mut buf)
            .map_err(|e| TransportError::Io(format!("{:?}", e.0)))?;

        let body = match std::str::from_utf8(&buf[..bytes_read]) {
            Ok(body) => body.to_owned(),
            Err(e) => {
                log::warn!("Error decoding response body: {}", e);
                String::from_utf8_lossy(&buf[..bytes_read]).into_owned()
            }
        };

        Ok(Response { status, body })
    }
}
