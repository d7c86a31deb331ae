//! CLI tool for bootstrapping a peer.
//!
//! Provides commands for:
//! - Computing the full bootstrap plan
//! - Resolving the chaincode endpoint
//! - Printing the chaincode container host policy

pub mod commands;
pub mod config;

pub use commands::{exit_code, BootstrapPlan, Command, CommandResult, NodeCommand, PlanError};
pub use config::CliConfig;
