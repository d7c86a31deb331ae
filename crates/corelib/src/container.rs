//! Host policy for chaincode containers.
//!
//! Every chaincode container is created from the same template: host
//! networking, rotated `json-file` logs and a hard memory cap. Build it once
//! at startup and share it read-only (e.g. behind an `Arc`).

use crate::config::VmConfig;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

pub const NETWORK_MODE_HOST: &str = "host";
pub const LOG_DRIVER_JSON_FILE: &str = "json-file";
pub const LOG_MAX_SIZE_MB: u64 = 50;
pub const LOG_MAX_FILE_COUNT: u32 = 5;
/// 2 GiB.
pub const MEMORY_LIMIT_BYTES: i64 = 2 * 1024 * 1024 * 1024;
pub const CPU_SHARES: i64 = 0;

/// Log driver and rotation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    log_type: String,
    max_size_mb: u64,
    max_file_count: u32,
}

impl LogConfig {
    /// Driver name, e.g. `json-file`.
    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    pub fn max_size_mb(&self) -> u64 {
        self.max_size_mb
    }

    pub fn max_file_count(&self) -> u32 {
        self.max_file_count
    }

    /// Driver options in the container engine's string form.
    pub fn options(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("max-size", format!("{}m", self.max_size_mb)),
            ("max-file", self.max_file_count.to_string()),
        ])
    }
}

// Engine API shape: {"Type": "...", "Config": {"max-size": "50m", ...}}
impl Serialize for LogConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LogConfig", 2)?;
        state.serialize_field("Type", &self.log_type)?;
        state.serialize_field("Config", &self.options())?;
        state.end()
    }
}

/// Template applied to every chaincode container. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerHostPolicy {
    network_mode: String,
    log_config: LogConfig,
    #[serde(rename = "Memory")]
    memory_limit_bytes: i64,
    #[serde(rename = "CpuShares")]
    cpu_shares: i64,
}

impl ContainerHostPolicy {
    pub fn network_mode(&self) -> &str {
        &self.network_mode
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log_config
    }

    pub fn memory_limit_bytes(&self) -> i64 {
        self.memory_limit_bytes
    }

    pub fn cpu_shares(&self) -> i64 {
        self.cpu_shares
    }
}

/// Build the host policy applied to every chaincode container.
///
/// The template is fixed:
///
/// | Setting | Value |
/// |---|---|
/// | network mode | `host` (chaincode reaches the peer over localhost) |
/// | log driver | `json-file`, rotated at 50 MB, 5 files kept |
/// | memory | 2 GiB hard cap |
/// | CPU shares | 0 (no relative weighting) |
///
/// `vm` is only logged; no input changes the template, so there is no error
/// path. Call once at startup and share the result.
///
/// # Example
///
/// ```rust
/// use peercore::{build_host_policy, VmConfig};
///
/// let policy = build_host_policy(&VmConfig::default());
/// assert_eq!(policy.network_mode(), "host");
/// assert_eq!(policy.log_config().options()["max-size"], "50m");
/// assert_eq!(policy.memory_limit_bytes(), 2 * 1024 * 1024 * 1024);
/// ```
pub fn build_host_policy(vm: &VmConfig) -> ContainerHostPolicy {
    let policy = ContainerHostPolicy {
        network_mode: NETWORK_MODE_HOST.to_string(),
        log_config: LogConfig {
            log_type: LOG_DRIVER_JSON_FILE.to_string(),
            max_size_mb: LOG_MAX_SIZE_MB,
            max_file_count: LOG_MAX_FILE_COUNT,
        },
        memory_limit_bytes: MEMORY_LIMIT_BYTES,
        cpu_shares: CPU_SHARES,
    };
    debug!(
        vm_endpoint = %vm.endpoint,
        network_mode = %policy.network_mode,
        memory = policy.memory_limit_bytes,
        "built chaincode container host policy"
    );
    policy
}
