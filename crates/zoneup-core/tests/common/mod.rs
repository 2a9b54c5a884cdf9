//! Test doubles and common utilities for engine contract tests
//!
//! The mocks here record every provider call in arrival order so tests can
//! assert on call sequences, not just counts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zoneup_core::config::{DesiredRecord, ProviderCredential, ProviderGroup};
use zoneup_core::error::{Error, Result};
use zoneup_core::traits::{DnsProvider, DnsProviderFactory, IpSource, RecordPayload};

/// One provider API call as observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Find {
        zone_id: String,
        name: String,
    },
    Create {
        zone_id: String,
        payload: RecordPayload,
    },
    Update {
        zone_id: String,
        record_id: String,
        payload: RecordPayload,
    },
}

/// Shared state backing every provider minted by a [`RecordingFactory`]
///
/// Simulates the provider-side record set: `records` maps (zone, name) to
/// the record ids the listing endpoint would return, in response order.
#[derive(Default)]
pub struct ProviderState {
    records: Mutex<HashMap<(String, String), Vec<String>>>,
    calls: Mutex<Vec<ProviderCall>>,
    fail_lookup_for: Mutex<Vec<String>>,
    fail_write_for: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl ProviderState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Pre-populate the provider with an existing record id
    pub fn seed_record(&self, zone_id: &str, name: &str, record_id: &str) {
        self.records
            .lock()
            .unwrap()
            .entry((zone_id.to_string(), name.to_string()))
            .or_default()
            .push(record_id.to_string());
    }

    /// Make lookups for `name` fail with a query error
    pub fn fail_lookup_for(&self, name: &str) {
        self.fail_lookup_for.lock().unwrap().push(name.to_string());
    }

    /// Make writes for `name` fail with a write error
    pub fn fail_write_for(&self, name: &str) {
        self.fail_write_for.lock().unwrap().push(name.to_string());
    }

    /// Every call observed so far, in arrival order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Record ids currently stored for (zone, name)
    pub fn record_ids(&self, zone_id: &str, name: &str) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .get(&(zone_id.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

/// A mock DnsProvider writing to shared [`ProviderState`]
pub struct RecordingProvider {
    state: Arc<ProviderState>,
}

#[async_trait]
impl DnsProvider for RecordingProvider {
    async fn find_record_id(&self, zone_id: &str, name: &str) -> Result<Option<String>> {
        self.state.calls.lock().unwrap().push(ProviderCall::Find {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
        });

        if self
            .state
            .fail_lookup_for
            .lock()
            .unwrap()
            .iter()
            .any(|n| n == name)
        {
            return Err(Error::provider_query(format!(
                "record lookup for {name} returned 500"
            )));
        }

        Ok(self
            .state
            .records
            .lock()
            .unwrap()
            .get(&(zone_id.to_string(), name.to_string()))
            .and_then(|ids| ids.first().cloned()))
    }

    async fn create_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<()> {
        self.state.calls.lock().unwrap().push(ProviderCall::Create {
            zone_id: zone_id.to_string(),
            payload: payload.clone(),
        });

        if self
            .state
            .fail_write_for
            .lock()
            .unwrap()
            .iter()
            .any(|n| n == &payload.name)
        {
            return Err(Error::provider_write(format!(
                "create for {} returned 500",
                payload.name
            )));
        }

        let id = format!("rec-{}", self.state.next_id.fetch_add(1, Ordering::SeqCst));
        self.state.seed_record(zone_id, &payload.name, &id);
        Ok(())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<()> {
        self.state.calls.lock().unwrap().push(ProviderCall::Update {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
            payload: payload.clone(),
        });

        if self
            .state
            .fail_write_for
            .lock()
            .unwrap()
            .iter()
            .any(|n| n == &payload.name)
        {
            return Err(Error::provider_write(format!(
                "update for {} returned 500",
                payload.name
            )));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Factory minting [`RecordingProvider`]s that share one [`ProviderState`]
///
/// Records the `auth_email` of every credential it was asked to build a
/// provider for, so tests can assert credential scoping per group.
pub struct RecordingFactory {
    state: Arc<ProviderState>,
    created_with: Arc<Mutex<Vec<String>>>,
}

impl RecordingFactory {
    pub fn new(state: Arc<ProviderState>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let created_with = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                state,
                created_with: Arc::clone(&created_with),
            },
            created_with,
        )
    }
}

impl DnsProviderFactory for RecordingFactory {
    fn create(&self, credential: &ProviderCredential) -> Result<Box<dyn DnsProvider>> {
        self.created_with
            .lock()
            .unwrap()
            .push(credential.auth_email.clone());

        Ok(Box::new(RecordingProvider {
            state: Arc::clone(&self.state),
        }))
    }
}

/// An IpSource that returns a fixed address and counts discoveries
pub struct FixedIpSource {
    ip: IpAddr,
    discover_calls: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: IpAddr) -> (Self, Arc<AtomicUsize>) {
        let discover_calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                ip,
                discover_calls: Arc::clone(&discover_calls),
            },
            discover_calls,
        )
    }
}

#[async_trait]
impl IpSource for FixedIpSource {
    async fn discover(&self) -> Result<IpAddr> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// An IpSource whose lookup always fails
pub struct FailingIpSource;

#[async_trait]
impl IpSource for FailingIpSource {
    async fn discover(&self) -> Result<IpAddr> {
        Err(Error::network("lookup service unreachable"))
    }
}

/// Helper to build a credential with a throwaway key
pub fn credential(auth_email: &str) -> ProviderCredential {
    ProviderCredential {
        auth_email: auth_email.to_string(),
        auth_key: "test-key".to_string(),
    }
}

/// Helper to build a provider group
pub fn group(auth_email: &str, subdomains: Vec<DesiredRecord>) -> ProviderGroup {
    ProviderGroup {
        authentication: credential(auth_email),
        subdomains,
    }
}
