//! Reconciliation engine
//!
//! The engine owns the per-run decision flow:
//!
//! 1. Discover the public IP once per run via [`IpSource`]
//! 2. For each credential group, mint a provider from its credential
//! 3. Resolve each desired record into a full wire payload
//! 4. Upsert the record: update the located record, or create one
//!
//! ```text
//! ┌────────────┐
//! │  IpSource  │── resolved IP ──┐
//! └────────────┘                 ▼
//!                        ┌─────────────────┐
//!                        │ ReconcileEngine │
//!                        └─────────────────┘
//!                                │ locate / create / update
//!                                ▼
//!                        ┌─────────────────┐
//!                        │   DnsProvider   │
//!                        └─────────────────┘
//! ```
//!
//! Every run is a fresh, fully sequential pass: records are reconciled in
//! configuration order, nothing runs concurrently, and no state survives
//! between runs.

use crate::config::ProviderGroup;
use crate::error::Result;
use crate::traits::{DnsProvider, DnsProviderFactory, IpSource, RecordPayload};
use tracing::{debug, error, info};

/// How a single record was brought up to date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No record existed under this name; one was created
    Created,

    /// An existing record was overwritten
    Updated {
        /// Identifier of the record that was updated
        record_id: String,
    },
}

/// Counters for one completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records created this run
    pub created: usize,
    /// Records updated this run
    pub updated: usize,
}

impl RunSummary {
    fn tally(&mut self, outcome: &ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Created => self.created += 1,
            ReconcileOutcome::Updated { .. } => self.updated += 1,
        }
    }
}

/// Bring one record in line with its desired payload
///
/// This is an upsert keyed by (zone, name): the locate result is the sole
/// branch condition between create and update. The full payload is sent
/// either way; there is no diffing against the provider's current content,
/// so an update that changes nothing is still performed.
///
/// # Errors
///
/// Propagates the locate error unchanged (no write is attempted in that
/// case), or the create/update error when the write call fails.
pub async fn reconcile(
    provider: &dyn DnsProvider,
    zone_id: &str,
    payload: &RecordPayload,
) -> Result<ReconcileOutcome> {
    let outcome = match provider.find_record_id(zone_id, &payload.name).await? {
        Some(record_id) => {
            provider.update_record(zone_id, &record_id, payload).await?;
            ReconcileOutcome::Updated { record_id }
        }
        None => {
            provider.create_record(zone_id, payload).await?;
            ReconcileOutcome::Created
        }
    };

    info!(
        "reconciled {} {} -> {}",
        payload.name, payload.record_type, payload.content
    );

    Ok(outcome)
}

/// Batch orchestrator for a full reconciliation pass
pub struct ReconcileEngine {
    /// Source of the public IP used for records without explicit content
    ip_source: Box<dyn IpSource>,

    /// Factory minting one provider per credential group
    provider_factory: Box<dyn DnsProviderFactory>,
}

impl ReconcileEngine {
    /// Create a new engine
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider_factory: Box<dyn DnsProviderFactory>,
    ) -> Self {
        Self {
            ip_source,
            provider_factory,
        }
    }

    /// Run one full reconciliation pass over `groups`
    ///
    /// The public IP is discovered exactly once, before any provider call;
    /// records that carry explicit content keep it, all others resolve to
    /// the discovered address. Records are processed strictly in
    /// configuration order, group by group.
    ///
    /// # Errors
    ///
    /// The run aborts on the first failure: a discovery error means no group
    /// is processed at all, and a locate/write error skips every remaining
    /// record. Prior successful writes are not rolled back. The caller is
    /// expected to log the error and try again on the next interval.
    pub async fn run_once(&self, groups: &[ProviderGroup]) -> Result<RunSummary> {
        let resolved_ip = self.ip_source.discover().await?;
        debug!("reconciling {} group(s) against {}", groups.len(), resolved_ip);

        let mut summary = RunSummary::default();

        for group in groups {
            let provider = self.provider_factory.create(&group.authentication)?;

            for record in &group.subdomains {
                let payload = record.resolve(resolved_ip);

                match reconcile(provider.as_ref(), &record.zone_id, &payload).await {
                    Ok(outcome) => summary.tally(&outcome),
                    Err(e) => {
                        error!(
                            "failed to reconcile {} in zone {} (content {}): {}",
                            record.name, record.zone_id, payload.content, e
                        );
                        return Err(e);
                    }
                }
            }
        }

        Ok(summary)
    }
}
