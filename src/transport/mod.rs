// transport/mod.rs
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{config::HttpSettings, error::LampError, models::Envelope};

pub const DEVICE_PATH: &str = "diyledinfo";

/// Relays one envelope to the lamp and hands back the raw response body.
///
/// The firmware serves reads and writes on the same PUT endpoint, so there is
/// a single `invoke`; the intent lives in the envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, envelope: &Envelope, ip: &str) -> Result<String, LampError>;

    async fn send(&self, envelope: &Envelope, ip: &str) -> Result<(), LampError> {
        debug!(%ip, key = ?envelope.data.key, "Sending change request");
        match self.invoke(envelope, ip).await {
            Ok(_) => {
                debug!(%ip, "Change request delivered");
                Ok(())
            }
            Err(e) => {
                debug!(%ip, "Change request failed: {}", e);
                Err(e)
            }
        }
    }

    /// Empty string on any failure.
    async fn fetch(&self, envelope: &Envelope, ip: &str) -> String {
        self.invoke(envelope, ip).await.unwrap_or_else(|e| {
            debug!(%ip, "Request failed: {}", e);
            String::new()
        })
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    port: u16,
}

impl HttpTransport {
    pub fn new(settings: HttpSettings) -> Result<Self, LampError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.timeout())
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            port: settings.port,
        })
    }

    pub fn with_timeout(timeout: Duration, port: u16) -> Result<Self, LampError> {
        Self::new(HttpSettings {
            timeout_ms: timeout.as_millis() as u64,
            port,
        })
    }

    pub fn url(&self, ip: &str) -> String {
        format!("http://{}:{}/{}", ip, self.port, DEVICE_PATH)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, envelope: &Envelope, ip: &str) -> Result<String, LampError> {
        let response = self.client.put(self.url(ip)).json(envelope).send().await?;
        let status = response.status();
        if !status.is_success() {
            // The body is still handed back; the firmware may answer with a non-200 code.
            debug!(%ip, %status, "Device replied with non-success status");
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn url_targets_fixed_endpoint() {
        let transport = HttpTransport::new(HttpSettings::default()).unwrap();
        assert_eq!(transport.url("192.168.1.40"), "http://192.168.1.40:80/diyledinfo");
    }

    #[tokio::test]
    async fn fetch_from_unreachable_host_is_empty_within_timeout() {
        let transport = HttpTransport::new(HttpSettings::default()).unwrap();
        let started = Instant::now();
        // TEST-NET-1, never routed
        let body = transport
            .fetch(&Envelope::info_request("desk"), "192.0.2.1")
            .await;
        assert_eq!(body, "");
        assert!(started.elapsed() < Duration::from_millis(2500));
    }

    #[tokio::test]
    async fn send_to_closed_port_reports_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = HttpTransport::with_timeout(Duration::from_millis(500), port).unwrap();
        let result = transport
            .send(&Envelope::set_power("desk", true), "127.0.0.1")
            .await;
        assert!(matches!(result, Err(LampError::Transport(_))));
    }
}
