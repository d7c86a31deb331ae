//! Peer configuration model and loader.
//!
//! The loader turns a TOML file plus `CORE_*` environment overrides into
//! immutable values. Components never read ambient state; they are handed a
//! [`PeerNetworkConfig`] or [`VmConfig`] once at bootstrap.

use crate::address::HostPort;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_PEER_ADDRESS: &str = "0.0.0.0:7051";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:7051";
pub const DEFAULT_VM_ENDPOINT: &str = "unix:///var/run/docker.sock";

/// Network identity of the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerNetworkConfig {
    /// `peer.address`: host:port advertised externally.
    pub peer_address: String,
    /// `peer.listenAddress`: bind address of the main service.
    pub listen_address: String,
    /// `peer.chaincodeListenAddress`: bind override for the chaincode callback server.
    pub chaincode_listen_address: Option<String>,
    /// `chaincode.address`: explicit advertised chaincode endpoint.
    pub chaincode_address: Option<String>,
    /// `peer.adminService.listenAddress`: separate admin bind address.
    pub admin_listen_address: Option<String>,
}

impl Default for PeerNetworkConfig {
    fn default() -> Self {
        Self {
            peer_address: DEFAULT_PEER_ADDRESS.to_string(),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            chaincode_listen_address: None,
            chaincode_address: None,
            admin_listen_address: None,
        }
    }
}

impl PeerNetworkConfig {
    /// Host segment of `peer.address`.
    pub fn peer_host(&self) -> Result<String> {
        Ok(HostPort::parse(&self.peer_address)?.host().to_string())
    }

    pub fn chaincode_address(&self) -> Option<&str> {
        non_empty(&self.chaincode_address)
    }

    pub fn chaincode_listen_address(&self) -> Option<&str> {
        non_empty(&self.chaincode_listen_address)
    }

    pub fn admin_listen_address(&self) -> Option<&str> {
        non_empty(&self.admin_listen_address)
    }
}

/// Container engine settings (`vm.*`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    pub endpoint: String,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VM_ENDPOINT.to_string(),
        }
    }
}

/// Everything the bootstrap decisions consume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeerConfig {
    pub network: PeerNetworkConfig,
    pub vm: VmConfig,
    /// Raw `peer.handlers` subtree, parsed by the handler chain builder.
    pub handlers: Option<toml::Value>,
}

impl PeerConfig {
    /// Read and decode a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;
        debug!(path = %path.display(), "loaded peer configuration file");
        let file: FileConfig = toml::from_str(&content)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;
        Ok(file.into())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig =
            toml::from_str(content).map_err(|err| Error::Config(err.to_string()))?;
        Ok(file.into())
    }

    /// Apply `CORE_*` overrides, e.g. `CORE_PEER_ADDRESS`.
    ///
    /// Unrelated variables are ignored. An override with an empty value
    /// clears an optional address.
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            match key {
                "CORE_PEER_ADDRESS" => self.network.peer_address = value.into(),
                "CORE_PEER_LISTENADDRESS" => self.network.listen_address = value.into(),
                "CORE_PEER_CHAINCODELISTENADDRESS" => {
                    self.network.chaincode_listen_address = Some(value.into())
                }
                "CORE_CHAINCODE_ADDRESS" => self.network.chaincode_address = Some(value.into()),
                "CORE_PEER_ADMINSERVICE_LISTENADDRESS" => {
                    self.network.admin_listen_address = Some(value.into())
                }
                "CORE_VM_ENDPOINT" => self.vm.endpoint = value.into(),
                _ => continue,
            }
            debug!(key, "applied environment override");
        }
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// On-disk layout. The peer, chaincode and vm sections are shared with other
// subsystems, so keys not listed here are ignored.

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    peer: PeerSection,
    #[serde(default)]
    chaincode: ChaincodeSection,
    #[serde(default)]
    vm: VmSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeerSection {
    address: Option<String>,
    listen_address: Option<String>,
    chaincode_listen_address: Option<String>,
    admin_service: Option<AdminServiceSection>,
    handlers: Option<toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminServiceSection {
    listen_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChaincodeSection {
    address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VmSection {
    endpoint: Option<String>,
}

impl From<FileConfig> for PeerConfig {
    fn from(file: FileConfig) -> Self {
        let peer = file.peer;
        Self {
            network: PeerNetworkConfig {
                peer_address: peer
                    .address
                    .unwrap_or_else(|| DEFAULT_PEER_ADDRESS.to_string()),
                listen_address: peer
                    .listen_address
                    .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string()),
                chaincode_listen_address: peer.chaincode_listen_address,
                chaincode_address: file.chaincode.address,
                admin_listen_address: peer.admin_service.and_then(|a| a.listen_address),
            },
            vm: VmConfig {
                endpoint: file
                    .vm
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_VM_ENDPOINT.to_string()),
            },
            handlers: peer.handlers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[peer]
address = "peer0.org1:7051"
listenAddress = "0.0.0.0:7051"
chaincodeListenAddress = "0.0.0.0:7052"

[peer.adminService]
listenAddress = "0.0.0.0:7055"

[[peer.handlers.authFilters]]
name = "filter1"
library = "/opt/lib/filter1.so"

[chaincode]
address = "peer0.org1:7052"

[vm]
endpoint = "tcp://docker:2375"

[ledger]
state = "goleveldb"
"#;

    #[test]
    fn test_parse_full_file() {
        let config = PeerConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.network.peer_address, "peer0.org1:7051");
        assert_eq!(config.network.chaincode_listen_address(), Some("0.0.0.0:7052"));
        assert_eq!(config.network.chaincode_address(), Some("peer0.org1:7052"));
        assert_eq!(config.network.admin_listen_address(), Some("0.0.0.0:7055"));
        assert_eq!(config.vm.endpoint, "tcp://docker:2375");
        assert!(config.handlers.is_some());
    }

    #[test]
    fn test_defaults_for_empty_file() {
        let config = PeerConfig::from_toml_str("").unwrap();
        assert_eq!(config.network, PeerNetworkConfig::default());
        assert_eq!(config.vm.endpoint, DEFAULT_VM_ENDPOINT);
        assert!(config.handlers.is_none());
    }

    #[test]
    fn test_foreign_keys_ignored() {
        // Keys owned by other subsystems sit next to the addresses.
        let config = PeerConfig::from_toml_str(
            r#"
[peer]
address = "localhost:6051"
listenAddress = "0.0.0.0:6051"
chaincodeListenAddress = "0.0.0.0:6052"
fileSystemPath = "/var/hyperledger/production"

[peer.adminService]
listenAddress = "0.0.0.0:6055"
tls = { enabled = false }

[chaincode]
executetimeout = "30s"
mode = "dev"

[vm]
endpoint = "unix:///var/run/docker.sock"
docker = { attachStdout = false }
"#,
        )
        .unwrap();
        assert_eq!(config.network.peer_address, "localhost:6051");
        assert_eq!(config.network.chaincode_listen_address(), Some("0.0.0.0:6052"));
        assert_eq!(config.network.chaincode_address(), None);
        assert_eq!(config.network.admin_listen_address(), Some("0.0.0.0:6055"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = PeerConfig::from_toml_str("[peer]\naddress = 7051\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_optional_is_unset() {
        let config = PeerConfig::from_toml_str("[chaincode]\naddress = \"\"\n").unwrap();
        assert_eq!(config.network.chaincode_address(), None);
    }

    #[test]
    fn test_env_overrides() {
        let config = PeerConfig::from_toml_str(SAMPLE).unwrap().with_overrides([
            ("CORE_PEER_ADDRESS", "10.0.0.5:7051"),
            ("CORE_CHAINCODE_ADDRESS", ""),
            ("CORE_PEER_ADMINSERVICE_LISTENADDRESS", "127.0.0.1:9443"),
            ("HOME", "/root"),
        ]);
        assert_eq!(config.network.peer_address, "10.0.0.5:7051");
        assert_eq!(config.network.chaincode_address(), None);
        assert_eq!(config.network.admin_listen_address(), Some("127.0.0.1:9443"));
        assert_eq!(config.network.listen_address, "0.0.0.0:7051");
    }

    #[test]
    fn test_peer_host() {
        let network = PeerNetworkConfig {
            peer_address: "peer0.org1:7051".to_string(),
            ..Default::default()
        };
        assert_eq!(network.peer_host().unwrap(), "peer0.org1");

        let network = PeerNetworkConfig {
            peer_address: "peer0".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            network.peer_host(),
            Err(Error::MalformedAddress { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PeerConfig::load("/nonexistent/core.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
