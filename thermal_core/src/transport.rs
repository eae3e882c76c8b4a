//! HTTP transport for the calculation backend.
//!
//! [`Transport`] is the seam between the command handlers and the network.
//! [`HttpTransport`] is the reqwest implementation used by the CLI.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::config::ServerConfig;
use crate::errors::{ThermalError, ThermalResult};
use crate::protocol::HttpReply;

/// Client version, sent in the User-Agent header
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Something that can POST a JSON body and hand back the raw reply.
///
/// Implementations report only transport-level failures as errors; any
/// reply that arrived, whatever its status, is returned as `Ok`.
pub trait Transport {
    fn post_json(&self, path: &str, body: &Value) -> impl Future<Output = ThermalResult<HttpReply>> + Send;
}

/// reqwest-backed transport bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(settings: &ServerConfig) -> ThermalResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("ThermalSim/{}", CLIENT_VERSION))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ThermalError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpTransport {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> ThermalResult<HttpReply> {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ThermalError::transport(format!("POST {}: {}", url, e)))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ThermalError::transport(format!("reading body from {}: {}", url, e)))?;

        debug!(%url, status, len = bytes.len(), "reply");
        Ok(HttpReply::new(status, bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let settings = ServerConfig {
            base_url: "http://localhost:5000/".to_string(),
            timeout_secs: 5,
        };
        let transport = HttpTransport::new(&settings).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(transport.url("/calculate_fin"), "http://localhost:5000/calculate_fin");
        assert_eq!(transport.url("export_pdf"), "http://localhost:5000/export_pdf");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Reserve a free port, then release it so nothing is listening there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let settings = ServerConfig {
            base_url: format!("http://127.0.0.1:{}", port),
            timeout_secs: 2,
        };
        let transport = HttpTransport::new(&settings).unwrap();
        let err = transport
            .post_json("/calculate_fin", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    }
}
