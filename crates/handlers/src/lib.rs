//! Pluggable request handler chains.
//!
//! This crate parses the `peer.handlers` configuration subtree into ordered
//! handler chains:
//! - Which handlers run, and in which order
//! - Whether each handler comes from the in-process registry or a library

pub mod chain;
pub mod config;

pub use chain::{parse_handler_chain, HandlerChainSpec, HandlerSource, HandlerSpec};
pub use config::HandlersConfig;
