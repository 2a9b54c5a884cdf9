// # Cloudflare DNS Provider
//
// This crate implements the `DnsProvider` trait against the Cloudflare API.
//
// ## Wire contract
//
// - List records: GET `/zones/:zone_id/dns_records?name=...&match=all`
// - Update record: PATCH `/zones/:zone_id/dns_records/:record_id`
// - Create record: POST `/zones/:zone_id/dns_records`
//
// All calls authenticate with the legacy `X-Auth-Email` / `X-Auth-Key`
// header pair; no token or token-refresh mode is supported. Writes succeed
// only on HTTP 200.
//
// ## Responsibilities
//
// One HTTP request per method, full error propagation to the engine, no
// retry or backoff, no caching, no background tasks.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use zoneup_core::config::ProviderCredential;
use zoneup_core::traits::{DnsProvider, DnsProviderFactory, RecordPayload};
use zoneup_core::{Error, Result};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Auth headers expected by the legacy key authentication mode
const AUTH_EMAIL_HEADER: &str = "X-Auth-Email";
const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// Cloudflare DNS provider
///
/// Bound to a single credential; the engine mints one instance per
/// credential group and discards it when the group is done.
pub struct CloudflareProvider {
    /// Caller identity. The key never appears in logs.
    credential: ProviderCredential,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a credential field is empty or the
    /// HTTP client cannot be built.
    pub fn new(credential: ProviderCredential) -> Result<Self> {
        credential.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { credential, client })
    }

    /// Attach the auth headers to a request
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(AUTH_EMAIL_HEADER, &self.credential.auth_email)
            .header(AUTH_KEY_HEADER, &self.credential.auth_key)
    }

    /// Send a create or update request and check the write contract
    ///
    /// Cloudflare reports success for these calls as HTTP 200 exactly; any
    /// other status fails the record with enough context to diagnose.
    async fn send_write(
        &self,
        request: reqwest::RequestBuilder,
        zone_id: &str,
        payload: &RecordPayload,
    ) -> Result<()> {
        let response = self
            .authed(request)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::provider_write(format!("record write request failed: {e}")))?;

        if response.status() != reqwest::StatusCode::OK {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());

            return Err(Error::provider_write(format!(
                "write for {} in zone {} (content {}) returned {}: {}",
                payload.name, zone_id, payload.content, status, body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Look up the id of an existing record by exact name
    ///
    /// Queries the per-zone listing endpoint with `match=all` and returns
    /// the first entry of the `result` array, if any.
    async fn find_record_id(&self, zone_id: &str, name: &str) -> Result<Option<String>> {
        let url = format!("{}/zones/{}/dns_records", CLOUDFLARE_API_BASE, zone_id);

        let response = self
            .authed(self.client.get(&url).query(&[("name", name), ("match", "all")]))
            .send()
            .await
            .map_err(|e| Error::provider_query(format!("record lookup request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());

            return Err(Error::provider_query(format!(
                "record lookup for {} in zone {} returned {}: {}",
                name, zone_id, status, body
            )));
        }

        let envelope: Value = response.json().await.map_err(|e| {
            Error::malformed(format!("record lookup response is not valid JSON: {e}"))
        })?;

        first_record_id(&envelope)
    }

    async fn create_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<()> {
        let url = format!("{}/zones/{}/dns_records", CLOUDFLARE_API_BASE, zone_id);
        tracing::debug!("creating {} in zone {}", payload.name, zone_id);

        self.send_write(self.client.post(&url), zone_id, payload)
            .await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<()> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            CLOUDFLARE_API_BASE, zone_id, record_id
        );
        tracing::debug!("updating {} ({}) in zone {}", payload.name, record_id, zone_id);

        self.send_write(self.client.patch(&url), zone_id, payload)
            .await
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Extract the authoritative record id from a listing envelope
///
/// The first entry of `result` wins even when several records share the
/// queried name; the remaining entries are never considered.
fn first_record_id(envelope: &Value) -> Result<Option<String>> {
    let result = envelope["result"]
        .as_array()
        .ok_or_else(|| Error::malformed("record lookup response has no result array"))?;

    match result.first() {
        None => Ok(None),
        Some(entry) => {
            let id = entry["id"]
                .as_str()
                .ok_or_else(|| Error::malformed("record entry id is not a string"))?;
            Ok(Some(id.to_string()))
        }
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, credential: &ProviderCredential) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(CloudflareProvider::new(credential.clone())?))
    }
}
