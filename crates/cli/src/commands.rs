//! Bootstrap commands.
//!
//! Every decision runs once over an immutable configuration value; the
//! results are printed as JSON for the subsystems that consume them.

use crate::config::{CliConfig, ConfigArgs};
use anyhow::Context;
use clap::Subcommand;
use handlers::HandlersConfig;
use peercore::listener::FATAL_EXIT_CODE;
use peercore::{
    build_host_policy, compute_chaincode_endpoint, ContainerHostPolicy, FatalConfigError,
    PeerConfig, ResolvedEndpoint,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Peer node operations.
    #[command(subcommand)]
    Node(NodeCommand),
}

#[derive(Debug, Subcommand)]
pub enum NodeCommand {
    /// Run every bootstrap decision and print the plan.
    Start(ConfigArgs),
    /// Print the chaincode endpoint.
    Endpoint(ConfigArgs),
    /// Print the chaincode container host policy.
    HostPolicy(ConfigArgs),
}

/// Everything the peer bootstrap hands to downstream subsystems.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapPlan {
    pub chaincode_endpoint: ResolvedEndpoint,
    pub admin_separate_listener: bool,
    pub host_policy: ContainerHostPolicy,
    pub handlers: HandlersConfig,
}

/// Why a plan could not be built.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Unrecoverable listener configuration; the bootstrap must exit.
    #[error(transparent)]
    Fatal(#[from] FatalConfigError),
    #[error(transparent)]
    Config(#[from] peercore::Error),
}

/// Output of a single command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    Plan(BootstrapPlan),
    Endpoint(ResolvedEndpoint),
    HostPolicy(ContainerHostPolicy),
}

impl BootstrapPlan {
    pub fn build(config: &PeerConfig) -> Result<Self, PlanError> {
        let peer_host = config.network.peer_host()?;
        let chaincode_endpoint = compute_chaincode_endpoint(&config.network, &peer_host)?;
        let admin_separate_listener = config.network.admin_has_separate_listener()?;
        let host_policy = build_host_policy(&config.vm);
        let handlers = HandlersConfig::from_value(config.handlers.as_ref())?;

        info!(
            chaincode_endpoint = %chaincode_endpoint,
            admin_separate_listener,
            auth_filters = handlers.auth_filters.len(),
            "bootstrap plan ready"
        );
        Ok(Self {
            chaincode_endpoint,
            admin_separate_listener,
            host_policy,
            handlers,
        })
    }
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<PeerConfig> {
        let config = PeerConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if self.no_env {
            Ok(config)
        } else {
            Ok(config.with_overrides(std::env::vars()))
        }
    }
}

impl NodeCommand {
    pub fn execute(&self) -> anyhow::Result<CommandResult> {
        match self {
            NodeCommand::Start(args) => {
                let config = args.load()?;
                let plan = BootstrapPlan::build(&config).context("peer bootstrap failed")?;
                Ok(CommandResult::Plan(plan))
            }
            NodeCommand::Endpoint(args) => {
                let config = args.load()?;
                let peer_host = config.network.peer_host()?;
                let endpoint = compute_chaincode_endpoint(&config.network, &peer_host)
                    .context("computing chaincode endpoint")?;
                Ok(CommandResult::Endpoint(endpoint))
            }
            NodeCommand::HostPolicy(args) => {
                let config = args.load()?;
                Ok(CommandResult::HostPolicy(build_host_policy(&config.vm)))
            }
        }
    }
}

/// Process exit status for a failed command.
///
/// A [`FatalConfigError`] anywhere in the chain maps to [`FATAL_EXIT_CODE`];
/// every other failure is `1`.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let fatal = matches!(err.downcast_ref::<PlanError>(), Some(PlanError::Fatal(_)))
        || err.downcast_ref::<FatalConfigError>().is_some();
    if fatal {
        FATAL_EXIT_CODE
    } else {
        1
    }
}

impl CliConfig {
    pub fn run(&self) -> anyhow::Result<()> {
        let result = match &self.command {
            Command::Node(node) => node.execute()?,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }
}
