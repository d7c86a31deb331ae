//! Ordered handler chains.
//!
//! A chain is declared as a sequence of `{name, library}` mappings:
//!
//! ```toml
//! [[peer.handlers.authFilters]]
//! name = "filter1"
//! library = "/opt/lib/filter1.so"
//!
//! [[peer.handlers.authFilters]]
//! name = "filter2"
//! ```
//!
//! Declaration order is invocation order. Names are not required to be
//! unique; duplicate entries are kept as declared.

use peercore::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One handler in a chain.
///
/// `library` absent (or empty) means the handler is looked up by `name` in
/// the in-process registry; otherwise it is loaded from that path.
///
/// # Example
///
/// ```rust
/// use handlers::{HandlerSource, HandlerSpec};
///
/// let filter = HandlerSpec::with_library("filter1", "/opt/lib/filter1.so");
/// assert!(matches!(filter.source(), HandlerSource::Library(_)));
///
/// let builtin = HandlerSpec::new("DefaultAuth");
/// assert_eq!(builtin.source(), HandlerSource::Registry("DefaultAuth"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
}

/// Where a handler implementation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSource<'a> {
    /// Looked up by name in the in-process registry.
    Registry(&'a str),
    /// Loaded from a dynamic library.
    Library(&'a Path),
}

impl HandlerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            library: None,
        }
    }

    pub fn with_library(name: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            library: Some(library.into()),
        }
    }

    pub fn source(&self) -> HandlerSource<'_> {
        match &self.library {
            Some(library) => HandlerSource::Library(Path::new(library)),
            None => HandlerSource::Registry(&self.name),
        }
    }
}

/// Ordered, immutable handler chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerChainSpec(Vec<HandlerSpec>);

impl HandlerChainSpec {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HandlerSpec> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HandlerSpec> {
        self.0.iter()
    }

    /// Handler names in invocation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|h| h.name.as_str())
    }
}

impl From<Vec<HandlerSpec>> for HandlerChainSpec {
    fn from(handlers: Vec<HandlerSpec>) -> Self {
        Self(handlers)
    }
}

impl<'a> IntoIterator for &'a HandlerChainSpec {
    type Item = &'a HandlerSpec;
    type IntoIter = std::slice::Iter<'a, HandlerSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a sequence of `{name, library}` mappings.
///
/// Fails with [`Error::InvalidHandlerSpec`] if `value` is not an array of
/// tables, if an entry has no non-empty string `name`, if `library` is not a
/// string, or if an entry carries any other key. An empty `library` is the
/// same as none.
pub fn parse_handler_chain(value: &toml::Value) -> Result<HandlerChainSpec> {
    value
        .clone()
        .try_into::<HandlerChainSpec>()
        .map_err(|err| Error::InvalidHandlerSpec(err.to_string().trim_end().to_string()))?
        .normalize()
}

impl HandlerChainSpec {
    /// Reject empty names and fold an empty `library` into none.
    pub(crate) fn normalize(mut self) -> Result<Self> {
        for (index, handler) in self.0.iter_mut().enumerate() {
            if handler.name.is_empty() {
                return Err(Error::InvalidHandlerSpec(format!(
                    "entry {} has an empty name",
                    index
                )));
            }
            if handler.library.as_deref() == Some("") {
                handler.library = None;
            }
            debug!(
                index,
                name = %handler.name,
                library = ?handler.library,
                "parsed handler entry"
            );
        }
        Ok(self)
    }
}
