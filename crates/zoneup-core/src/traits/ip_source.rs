// # IP Source Trait
//
// Defines the interface for discovering the caller's public IP address.
//
// ## Implementations
//
// - HTTP lookup service: `zoneup-ip-http` crate

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public-IP discovery implementations
///
/// Implementations must be thread-safe and usable across async tasks. They
/// perform a single lookup per call and own no retry logic; a failed or
/// malformed lookup propagates as an error to the caller.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Determine the caller's current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The discovered address
    /// - `Err(Error)`: If the lookup service is unreachable or its response
    ///   cannot be parsed
    async fn discover(&self) -> Result<IpAddr, crate::Error>;
}
