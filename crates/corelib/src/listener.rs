//! Admin listener separation.
//!
//! Decides whether `peer.adminService.listenAddress` needs its own listener
//! or is served by the main peer listener.
//!
//! A malformed non-empty address here is not an ordinary [`crate::Error`]:
//! it names a listener that can never be bound, so it surfaces as a
//! [`FatalConfigError`] and the bootstrap must stop. `FatalConfigError` does
//! not convert into [`crate::Error`].

use crate::address::HostPort;
use crate::config::PeerNetworkConfig;
use crate::error::Error;
use tracing::{debug, error};

/// Exit status used by the bootstrap when it aborts on a [`FatalConfigError`].
pub const FATAL_EXIT_CODE: u8 = 2;

/// Unrecoverable listener configuration. Abort the bootstrap on sight.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fatal: {role} listen address {address:?} can never be bound")]
pub struct FatalConfigError {
    /// Which listener was misconfigured (`peer` or `admin`).
    pub role: &'static str,
    pub address: String,
    #[source]
    pub source: Error,
}

fn parse_listener(role: &'static str, address: &str) -> Result<HostPort, FatalConfigError> {
    HostPort::parse(address).map_err(|source| {
        error!(role, address, %source, "listen address can never be bound");
        FatalConfigError {
            role,
            address: address.to_string(),
            source,
        }
    })
}

/// True if the admin service must open a listener of its own.
///
/// An empty admin address shares the peer listener. Otherwise the two
/// listeners coincide when their ports match and their hosts are equal
/// (ignoring ASCII case) or either host is a wildcard.
///
/// Two distinct concrete hosts on the same port, e.g. `10.0.0.1:7051` and
/// `127.0.0.1:7051`, are treated as separate listeners. This is a chosen
/// rule: comparing ports alone would report them as shared.
///
/// # Errors
///
/// A malformed non-empty address on either side yields a
/// [`FatalConfigError`]; the caller must abort the bootstrap.
///
/// # Example
///
/// ```rust
/// use peercore::admin_has_separate_listener;
///
/// assert!(!admin_has_separate_listener("0.0.0.0:7051", "").unwrap());
/// assert!(!admin_has_separate_listener("0.0.0.0:7051", "127.0.0.1:7051").unwrap());
/// assert!(admin_has_separate_listener("0.0.0.0:7051", "0.0.0.0:7055").unwrap());
/// assert!(admin_has_separate_listener("0.0.0.0:7051", "blabla").is_err());
/// ```
pub fn admin_has_separate_listener(
    peer_listen_address: &str,
    admin_listen_address: &str,
) -> Result<bool, FatalConfigError> {
    if admin_listen_address.is_empty() {
        debug!("no admin listen address, admin service shares the peer listener");
        return Ok(false);
    }

    let peer = parse_listener("peer", peer_listen_address)?;
    let admin = parse_listener("admin", admin_listen_address)?;

    let same_host = peer.is_wildcard()
        || admin.is_wildcard()
        || peer.host().eq_ignore_ascii_case(admin.host());
    let separate = !(same_host && peer.port() == admin.port());

    debug!(
        peer = peer_listen_address,
        admin = admin_listen_address,
        separate,
        "checked admin listener separation"
    );
    Ok(separate)
}

impl PeerNetworkConfig {
    /// [`admin_has_separate_listener`] over `peer.listenAddress` and
    /// `peer.adminService.listenAddress`.
    pub fn admin_has_separate_listener(&self) -> Result<bool, FatalConfigError> {
        admin_has_separate_listener(
            &self.listen_address,
            self.admin_listen_address().unwrap_or_default(),
        )
    }
}
