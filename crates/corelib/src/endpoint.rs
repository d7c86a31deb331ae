//! Chaincode endpoint resolution.
//!
//! Computes the address a chaincode container dials to reach the peer. Rules
//! are evaluated in order and the first one that applies wins:
//!
//! 1. `chaincode.address` is authoritative when set. A wildcard host is
//!    rejected since it cannot be dialed.
//! 2. `peer.chaincodeListenAddress` is used when set. A wildcard host is
//!    replaced by the peer's own host, keeping the configured port.
//! 3. Otherwise the peer's host with [`DEFAULT_CHAINCODE_PORT`].

use crate::address::{is_wildcard_host, HostPort};
use crate::config::PeerNetworkConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Conventional chaincode callback port.
pub const DEFAULT_CHAINCODE_PORT: u16 = 7052;

/// A validated, non-wildcard `host:port` a chaincode container can dial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolvedEndpoint(String);

impl ResolvedEndpoint {
    /// The endpoint as handed to the chaincode launcher.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedEndpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves the chaincode endpoint for one peer configuration.
#[derive(Debug, Clone, Copy)]
pub struct EndpointResolver<'a> {
    config: &'a PeerNetworkConfig,
}

impl<'a> EndpointResolver<'a> {
    pub fn new(config: &'a PeerNetworkConfig) -> Self {
        Self { config }
    }

    /// Resolve against `peer_host`, the host segment of `peer.address`.
    pub fn resolve(&self, peer_host: &str) -> Result<ResolvedEndpoint> {
        if let Some(address) = self.config.chaincode_address() {
            let parsed = HostPort::parse(address)?;
            if parsed.is_wildcard() {
                return Err(Error::wildcard(
                    address,
                    "chaincode.address must be a dialable host",
                ));
            }
            info!(endpoint = address, "using chaincode.address as chaincode endpoint");
            return Ok(ResolvedEndpoint(address.to_string()));
        }

        if let Some(address) = self.config.chaincode_listen_address() {
            let parsed = HostPort::parse(address)?;
            if !parsed.is_wildcard() {
                info!(
                    endpoint = address,
                    "using peer.chaincodeListenAddress as chaincode endpoint"
                );
                return Ok(ResolvedEndpoint(address.to_string()));
            }
            if is_wildcard_host(peer_host) {
                return Err(Error::wildcard(
                    address,
                    format!(
                        "chaincode listen address and peer host {:?} are both wildcards",
                        peer_host
                    ),
                ));
            }
            let endpoint = parsed.with_host(peer_host).to_string();
            warn!(
                listen_address = address,
                %endpoint,
                "chaincode listen address is a wildcard, advertising peer host instead"
            );
            return Ok(ResolvedEndpoint(endpoint));
        }

        if is_wildcard_host(peer_host) {
            return Err(Error::wildcard(
                peer_host,
                "peer host is a wildcard and no chaincode address is configured",
            ));
        }
        let default = HostPort::new(peer_host, DEFAULT_CHAINCODE_PORT);
        let endpoint = default.to_string();
        info!(%endpoint, "using peer host with default chaincode port");
        Ok(ResolvedEndpoint(endpoint))
    }
}

/// Compute the address a chaincode container dials to reach the peer.
///
/// Free-function form of [`EndpointResolver::resolve`]; see the module docs
/// for the precedence rules.
///
/// # Arguments
/// * `config` - The peer's network configuration
/// * `peer_host` - Host segment of `peer.address`, see
///   [`PeerNetworkConfig::peer_host`]
///
/// # Errors
/// - [`Error::MalformedAddress`] if the configured address that applies cannot
///   be split into host and port
/// - [`Error::UnresolvableWildcard`] if no concrete host is available
///
/// # Example
///
/// ```rust
/// use peercore::{compute_chaincode_endpoint, PeerNetworkConfig};
///
/// let config = PeerNetworkConfig {
///     chaincode_listen_address: Some("0.0.0.0:8052".to_string()),
///     ..Default::default()
/// };
/// let endpoint = compute_chaincode_endpoint(&config, "127.0.0.1").unwrap();
/// assert_eq!(endpoint.as_str(), "127.0.0.1:8052");
///
/// // No concrete host to advertise.
/// assert!(compute_chaincode_endpoint(&config, "0.0.0.0").is_err());
/// ```
pub fn compute_chaincode_endpoint(
    config: &PeerNetworkConfig,
    peer_host: &str,
) -> Result<ResolvedEndpoint> {
    EndpointResolver::new(config).resolve(peer_host)
}
