//! Server Configuration
//!
//! The daemon is configured by its collaborators (the CLI front-end in
//! `main.rs`); this module holds the configuration record itself plus the
//! endpoint-selection rule, so the rule stays unit-testable.

use std::fmt;
use std::path::PathBuf;

/// Default Unix socket path when no endpoint is given.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/herdlockd.sock";

/// Default hard cap on concurrent client connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 32;

/// Where the daemon listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// TCP stream bound to all interfaces on the given port.
    Tcp(u16),
    /// Unix stream socket at the given filesystem path.
    Unix(PathBuf),
}

impl Endpoint {
    /// Parses an endpoint value.
    ///
    /// A value that parses as a decimal unsigned 16-bit integer is a TCP
    /// port; anything else is a socket path. That means `"70000"` is a
    /// (strange) filesystem path, not an out-of-range port.
    pub fn parse(value: &str) -> Self {
        match value.parse::<u16>() {
            Ok(port) => Endpoint::Tcp(port),
            Err(_) => Endpoint::Unix(PathBuf::from(value)),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(port) => write!(f, "0.0.0.0:{}", port),
            Endpoint::Unix(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The endpoint to listen on.
    pub endpoint: Endpoint,
    /// Hard cap on concurrent client connections. Must be positive; the
    /// listener stops accepting while the cap is reached.
    pub max_connections: usize,
    /// Remove a stale socket file before binding a Unix endpoint.
    pub force_unlink: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Unix(PathBuf::from(DEFAULT_SOCKET_PATH)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            force_unlink: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_number_is_tcp() {
        assert_eq!(Endpoint::parse("6379"), Endpoint::Tcp(6379));
        assert_eq!(Endpoint::parse("0"), Endpoint::Tcp(0));
        assert_eq!(Endpoint::parse("65535"), Endpoint::Tcp(65535));
    }

    #[test]
    fn test_path_is_unix() {
        assert_eq!(
            Endpoint::parse("/tmp/locks.sock"),
            Endpoint::Unix(PathBuf::from("/tmp/locks.sock"))
        );
        assert_eq!(
            Endpoint::parse("relative.sock"),
            Endpoint::Unix(PathBuf::from("relative.sock"))
        );
    }

    #[test]
    fn test_out_of_range_port_is_a_path() {
        // 65536 does not fit in u16, so the distinguishing rule makes it a
        // filesystem path.
        assert_eq!(
            Endpoint::parse("65536"),
            Endpoint::Unix(PathBuf::from("65536"))
        );
        assert_eq!(Endpoint::parse("-1"), Endpoint::Unix(PathBuf::from("-1")));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.endpoint,
            Endpoint::Unix(PathBuf::from(DEFAULT_SOCKET_PATH))
        );
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(!config.force_unlink);
    }
}
