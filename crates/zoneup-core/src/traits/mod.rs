//! Core traits for the reconciler
//!
//! This module defines the abstract interfaces the engine depends on.
//!
//! - [`IpSource`]: Discover the caller's current public IP address
//! - [`DnsProvider`]: Locate and write DNS records via a provider API

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{DnsProvider, DnsProviderFactory, RecordPayload};
pub use ip_source::IpSource;
