//! `host:port` parsing and wildcard classification.
//!
//! Purely syntactic: nothing here resolves names or touches sockets. Every
//! other decision in the crate is built on [`HostPort::parse`].

use crate::error::{Error, Result};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// The IPv4 "listen on all interfaces" host.
pub const WILDCARD_HOST: &str = "0.0.0.0";

/// A syntactically valid `host:port` pair.
///
/// The host is kept exactly as written (brackets around IPv6 literals are
/// stripped); it may be empty, which binds to every interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPort {
    host: String,
    port: u16,
}

impl HostPort {
    /// Split `address` into host and port.
    ///
    /// Accepts `host:port`, `:port` and `[ipv6]:port`. Fails with
    /// [`Error::MalformedAddress`] when there is no port separator, when an
    /// unbracketed host contains a colon, or when the port is not a decimal
    /// number in `0..=65535`.
    pub fn parse(address: &str) -> Result<Self> {
        let (host, port) = if let Some(rest) = address.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| Error::malformed(address, "missing ']' in address"))?;
            let port = after
                .strip_prefix(':')
                .ok_or_else(|| Error::malformed(address, "missing port in address"))?;
            (host, port)
        } else {
            let (host, port) = address
                .rsplit_once(':')
                .ok_or_else(|| Error::malformed(address, "missing port in address"))?;
            if host.contains(':') {
                return Err(Error::malformed(address, "too many colons in address"));
            }
            if host.contains('[') || host.contains(']') {
                return Err(Error::malformed(address, "unexpected bracket in address"));
            }
            (host, port)
        };

        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::malformed(address, format!("invalid port {:?}", port)));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| Error::malformed(address, format!("port {} out of range", port)))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Build from parts without validation. An IPv6 host is given without
    /// brackets; [`Display`](fmt::Display) adds them.
    ///
    /// # Example
    /// ```rust
    /// use peercore::HostPort;
    ///
    /// assert_eq!(HostPort::new("peer0", 7052).to_string(), "peer0:7052");
    /// assert_eq!(HostPort::new("::1", 7052).to_string(), "[::1]:7052");
    /// ```
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// True if the host means "every interface" rather than a dialable host.
    pub fn is_wildcard(&self) -> bool {
        is_wildcard_host(&self.host)
    }

    /// Same port, different host.
    pub fn with_host(&self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: self.port,
        }
    }
}

impl FromStr for HostPort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// True for the empty host and for unspecified IP literals (`0.0.0.0`, `::`).
pub fn is_wildcard_host(host: &str) -> bool {
    if host.is_empty() {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(ip) => ip.is_unspecified(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_concrete() {
        let addr = HostPort::parse("127.0.0.1:7051").unwrap();
        assert_eq!(addr.host(), "127.0.0.1");
        assert_eq!(addr.port(), 7051);
        assert!(!addr.is_wildcard());
    }

    #[test]
    fn test_parse_hostname() {
        let addr: HostPort = "peer0.org1.example.com:7051".parse().unwrap();
        assert_eq!(addr.host(), "peer0.org1.example.com");
        assert!(!addr.is_wildcard());
    }

    #[test]
    fn test_wildcard_forms() {
        assert!(HostPort::parse("0.0.0.0:7051").unwrap().is_wildcard());
        assert!(HostPort::parse(":7051").unwrap().is_wildcard());
        assert!(HostPort::parse("[::]:7051").unwrap().is_wildcard());
        assert!(!HostPort::parse("[::1]:7051").unwrap().is_wildcard());
    }

    #[test]
    fn test_ipv6_display_rebrackets() {
        let addr = HostPort::parse("[fe80::1]:9443").unwrap();
        assert_eq!(addr.host(), "fe80::1");
        assert_eq!(addr.to_string(), "[fe80::1]:9443");
    }

    #[test]
    fn test_malformed() {
        for bad in [
            "abc", "bcd", "foo", "blabla", "", "::1:7051", "[::1", "[::1]7051", "host:",
            "host:port", "host:70510", "host:-1", "a]:1",
        ] {
            match HostPort::parse(bad) {
                Err(Error::MalformedAddress { address, .. }) => assert_eq!(address, bad),
                other => panic!("expected MalformedAddress for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_with_host_keeps_port() {
        let addr = HostPort::parse("0.0.0.0:8052").unwrap().with_host("127.0.0.1");
        assert_eq!(addr.to_string(), "127.0.0.1:8052");
    }

    #[test]
    fn test_is_wildcard_host() {
        assert!(is_wildcard_host(""));
        assert!(is_wildcard_host(WILDCARD_HOST));
        assert!(is_wildcard_host("::"));
        assert!(!is_wildcard_host("localhost"));
        assert!(!is_wildcard_host("127.0.0.1"));
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(s in ".*") {
            let _ = HostPort::parse(&s);
        }

        #[test]
        fn prop_host_and_numeric_port_parse(host in "[a-z0-9.-]{0,20}", port in any::<u16>()) {
            let addr = HostPort::parse(&format!("{}:{}", host, port)).unwrap();
            prop_assert_eq!(addr.host(), host.as_str());
            prop_assert_eq!(addr.port(), port);
        }

        #[test]
        fn prop_missing_colon_is_malformed(s in "[a-z0-9.]{0,20}") {
            let is_malformed = matches!(
                HostPort::parse(&s),
                Err(Error::MalformedAddress { .. })
            );
            prop_assert!(is_malformed);
        }
    }
}
