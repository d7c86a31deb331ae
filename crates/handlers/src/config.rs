//! The `peer.handlers` subtree.

use crate::chain::HandlerChainSpec;
use peercore::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Handler chains handed to the request pipeline builder.
///
/// Decoded exactly: keys other than `authFilters` and `decorators` are
/// rejected, as are unknown keys inside an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HandlersConfig {
    /// Filters run on every inbound proposal, in order.
    #[serde(default)]
    pub auth_filters: HandlerChainSpec,
    /// Decorators applied to proposal inputs, in order.
    #[serde(default)]
    pub decorators: HandlerChainSpec,
}

impl HandlersConfig {
    /// Parse the subtree; `None` yields empty chains.
    pub fn from_value(value: Option<&toml::Value>) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::default());
        };
        let config = value
            .clone()
            .try_into::<HandlersConfig>()
            .map_err(|err| {
                Error::InvalidHandlerSpec(format!("peer.handlers: {}", err.to_string().trim_end()))
            })?;
        let config = Self {
            auth_filters: config
                .auth_filters
                .normalize()
                .map_err(|err| prefixed("authFilters", err))?,
            decorators: config
                .decorators
                .normalize()
                .map_err(|err| prefixed("decorators", err))?,
        };

        info!(
            auth_filters = config.auth_filters.len(),
            decorators = config.decorators.len(),
            "parsed handler chains"
        );
        Ok(config)
    }
}

fn prefixed(chain: &str, err: Error) -> Error {
    match err {
        Error::InvalidHandlerSpec(msg) => {
            Error::InvalidHandlerSpec(format!("peer.handlers.{}: {}", chain, msg))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_subtree() {
        let config = HandlersConfig::from_value(None).unwrap();
        assert!(config.auth_filters.is_empty());
        assert!(config.decorators.is_empty());
    }

    #[test]
    fn test_one_chain_only() {
        // Absent chains default to empty.
        let value: toml::Value = toml::from_str("authFilters = [{ name = \"f\" }]").unwrap();
        let config = HandlersConfig::from_value(Some(&value)).unwrap();
        assert_eq!(config.auth_filters.len(), 1);
        assert!(config.decorators.is_empty());
    }

    #[test]
    fn test_unknown_chain_rejected() {
        let value: toml::Value = toml::from_str("validators = []").unwrap();
        let err = HandlersConfig::from_value(Some(&value)).unwrap_err();
        assert!(matches!(err, Error::InvalidHandlerSpec(_)));
    }

    #[test]
    fn test_missing_name_rejected() {
        let value: toml::Value = toml::from_str("decorators = [{ library = \"/x.so\" }]").unwrap();
        let err = HandlersConfig::from_value(Some(&value)).unwrap_err();
        assert!(matches!(err, Error::InvalidHandlerSpec(_)));
        assert!(err.to_string().contains("peer.handlers"));
    }

    #[test]
    fn test_empty_name_names_chain() {
        let value: toml::Value = toml::from_str("decorators = [{ name = \"\" }]").unwrap();
        let err = HandlersConfig::from_value(Some(&value)).unwrap_err();
        assert!(err.to_string().contains("peer.handlers.decorators"));
    }

    #[test]
    fn test_not_a_mapping() {
        let value = toml::Value::Integer(3);
        assert!(matches!(
            HandlersConfig::from_value(Some(&value)),
            Err(Error::InvalidHandlerSpec(_))
        ));
    }
}
