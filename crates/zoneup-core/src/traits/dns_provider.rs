// # DNS Provider Trait
//
// Defines the interface for locating and writing DNS records via a
// provider's API.
//
// ## Implementations
//
// - Cloudflare: `zoneup-provider-cloudflare` crate
//
// ## Responsibilities
//
// A provider is a thin wire client: one HTTP call per method, full error
// propagation, no retry or scheduling decisions (those belong to the
// engine) and no state kept between calls.

use crate::config::ProviderCredential;
use async_trait::async_trait;
use serde::Serialize;

/// The full request body sent on every create or update
///
/// All five fields are always present. Constructing a payload requires
/// concrete content, so a record whose content is still unresolved can never
/// reach a write call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    /// Record type (e.g., "A")
    #[serde(rename = "type")]
    pub record_type: String,

    /// Fully qualified record name
    pub name: String,

    /// Record content (an address for A/AAAA records)
    pub content: String,

    /// Time-to-live in seconds
    pub ttl: u32,

    /// Whether the record is proxied through the provider's edge
    pub proxied: bool,
}

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the identifier of an existing record by zone and name
    ///
    /// At most one identifier is returned even when the provider knows
    /// several records under the same name: the first entry in the
    /// provider's response order is authoritative.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))`: A matching record exists
    /// - `Ok(None)`: No record with this name exists in the zone
    /// - `Err(Error)`: The listing call failed or returned an unexpected body
    async fn find_record_id(
        &self,
        zone_id: &str,
        name: &str,
    ) -> Result<Option<String>, crate::Error>;

    /// Create a new record in the zone
    async fn create_record(
        &self,
        zone_id: &str,
        payload: &RecordPayload,
    ) -> Result<(), crate::Error>;

    /// Overwrite an existing record identified by `record_id`
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from a credential
///
/// The engine mints one provider per credential group and discards it at the
/// end of the group, so credentials are never shared across groups.
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance bound to `credential`
    fn create(&self, credential: &ProviderCredential) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
