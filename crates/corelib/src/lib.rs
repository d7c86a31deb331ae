//! Core library for peer bootstrap decisions.
//!
//! This crate provides the startup-time decision logic of a peer:
//! - `host:port` parsing and wildcard classification
//! - Chaincode endpoint resolution
//! - Admin listener separation
//! - Chaincode container host policy
//! - Configuration model and loader

pub mod address;
pub mod config;
pub mod container;
pub mod endpoint;
pub mod error;
pub mod listener;

pub use address::HostPort;
pub use config::{PeerConfig, PeerNetworkConfig, VmConfig};
pub use container::{build_host_policy, ContainerHostPolicy, LogConfig};
pub use endpoint::{compute_chaincode_endpoint, EndpointResolver, ResolvedEndpoint};
pub use error::{Error, Result};
pub use listener::{admin_has_separate_listener, FatalConfigError};
