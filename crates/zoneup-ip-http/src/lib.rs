// # HTTP IP Discovery
//
// This crate implements the `IpSource` trait by asking an external
// "what is my IP" service.
//
// ## Response format
//
// The request declares itself as a command-line HTTP client because some
// lookup services vary their response format by the caller's declared
// identity, and the curl variant is the stable plain-text one. The address
// sits on the first line of the body, after a colon:
//
// ```text
// IP      : 203.0.113.7
// Address : ...
// ```

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use zoneup_core::traits::IpSource;
use zoneup_core::{Error, Result};

/// Default lookup service
pub const DEFAULT_LOOKUP_URL: &str = "https://www.cip.cc";

/// User agent declared on lookup requests; keeps the response plain text
const LOOKUP_USER_AGENT: &str = "curl/7.54";

/// Timeout for the lookup request
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP source
pub struct HttpIpSource {
    /// URL of the lookup service
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new source querying `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_URL)
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    /// Fetch and parse the caller's public IP
    ///
    /// A single request, no retries: an unreachable service or a body that
    /// does not carry an address propagates as an error to the caller.
    async fn discover(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, LOOKUP_USER_AGENT)
            .send()
            .await
            .map_err(|e| Error::network(format!("IP lookup request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "IP lookup service returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("failed to read IP lookup response: {e}")))?;

        let ip = extract_ip(&body)?;
        tracing::info!("discovered public IP: {}", ip);
        Ok(ip)
    }
}

/// Pull the address out of a lookup response body
///
/// Only the first line matters; everything after the first colon on it is
/// trimmed and parsed as an address.
fn extract_ip(body: &str) -> Result<IpAddr> {
    let first_line = body
        .lines()
        .next()
        .ok_or_else(|| Error::malformed("IP lookup response is empty"))?;

    let (_, value) = first_line.split_once(':').ok_or_else(|| {
        Error::malformed(format!("IP lookup response has no delimiter: {first_line}"))
    })?;

    let value = value.trim();
    value
        .parse()
        .map_err(|_| Error::malformed(format!("IP lookup response is not an address: {value}")))
}
