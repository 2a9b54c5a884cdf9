//! Configuration types for the reconciler
//!
//! The shapes here mirror the operator-facing configuration file: a list of
//! credential groups, each owning the records reconciled with that credential.

use crate::traits::RecordPayload;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Top-level reconciler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cloudflare credential groups, processed in order
    pub cloudflare: Vec<ProviderGroup>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.cloudflare.is_empty() {
            return Err(crate::Error::config("no provider groups configured"));
        }

        for group in &self.cloudflare {
            group.validate()?;
        }

        Ok(())
    }

    /// Total number of configured records across all groups
    pub fn record_count(&self) -> usize {
        self.cloudflare.iter().map(|g| g.subdomains.len()).sum()
    }
}

/// One credential plus the records it manages
///
/// Credentials are scoped to the records listed under them; a run never uses
/// a group's credential for another group's records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderGroup {
    /// Credential used for every request in this group
    pub authentication: ProviderCredential,

    /// Records to reconcile with this credential, in order
    pub subdomains: Vec<DesiredRecord>,
}

impl ProviderGroup {
    /// Validate the group
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.authentication.validate()?;

        if self.subdomains.is_empty() {
            return Err(crate::Error::config(format!(
                "provider group for {} has no subdomains",
                self.authentication.auth_email
            )));
        }

        for record in &self.subdomains {
            record.validate()?;
        }

        Ok(())
    }
}

/// Caller identity for the DNS provider API
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderCredential {
    /// Account email, sent as `X-Auth-Email`
    pub auth_email: String,

    /// API key, sent as `X-Auth-Key`
    pub auth_key: String,
}

impl ProviderCredential {
    /// Validate that both credential fields are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.auth_email.is_empty() {
            return Err(crate::Error::config("auth_email cannot be empty"));
        }
        if self.auth_key.is_empty() {
            return Err(crate::Error::config("auth_key cannot be empty"));
        }
        Ok(())
    }
}

// The API key never appears in logs or debug output.
impl std::fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("auth_email", &self.auth_email)
            .field("auth_key", &"<REDACTED>")
            .finish()
    }
}

/// One DNS entry the operator wants to exist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesiredRecord {
    /// Zone the record lives in
    pub zone_id: String,

    /// Fully qualified record name (e.g., "home.example.com")
    pub name: String,

    /// Explicit record content. When absent, the run's discovered public IP
    /// is used instead.
    #[serde(default)]
    pub content: Option<String>,

    /// Record type
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,

    /// Time-to-live in seconds
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Whether the record is proxied through the provider's edge
    #[serde(default)]
    pub proxied: bool,
}

impl DesiredRecord {
    /// Create a new desired record with default type, ttl and proxying
    pub fn new(zone_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
            content: None,
            record_type: default_record_type(),
            ttl: default_ttl(),
            proxied: false,
        }
    }

    /// Set explicit content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the record type
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_id.is_empty() {
            return Err(crate::Error::config(format!(
                "record {} has no zone_id",
                self.name
            )));
        }
        if self.name.is_empty() {
            return Err(crate::Error::config("record has no name"));
        }
        Ok(())
    }

    /// Produce the full wire payload for this record
    ///
    /// Explicit content always wins; `fallback_ip` fills the gap for records
    /// that track the discovered public IP. The payload carries all five
    /// fields regardless of which of them would actually change.
    pub fn resolve(&self, fallback_ip: IpAddr) -> RecordPayload {
        RecordPayload {
            record_type: self.record_type.clone(),
            name: self.name.clone(),
            content: self
                .content
                .clone()
                .unwrap_or_else(|| fallback_ip.to_string()),
            ttl: self.ttl,
            proxied: self.proxied,
        }
    }
}

fn default_record_type() -> String {
    "A".to_string()
}

fn default_ttl() -> u32 {
    120
}
