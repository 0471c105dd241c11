// HTTP health probe
// Any response means something is listening on the port; only a
// transport error counts as "down". Status codes are deliberately
// not inspected.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use nutrisci_core::port::health_probe::HealthProbe;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Probes a service with a bounded-timeout HTTP GET
pub struct HttpHealthProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn is_healthy(&self, endpoint: &str) -> bool {
        match self.client.get(endpoint).timeout(self.timeout).send().await {
            Ok(response) => {
                debug!(endpoint = %endpoint, status = %response.status(), "Health probe answered");
                true
            }
            Err(e) => {
                debug!(endpoint = %endpoint, error = %e, "Health probe got no answer");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn fake_responder() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let _ = stream
                    .write_all(
                        b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
            }
        });

        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn listening_endpoint_is_healthy() {
        let endpoint = fake_responder().await;
        let probe = HttpHealthProbe::with_timeout(Duration::from_secs(1));
        assert!(probe.is_healthy(&endpoint).await);
    }

    #[tokio::test]
    async fn closed_port_is_down() {
        // Bind-then-drop guarantees a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpHealthProbe::with_timeout(Duration::from_millis(500));
        assert!(!probe.is_healthy(&format!("http://{}/", addr)).await);
    }
}
