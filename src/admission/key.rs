//! Client key type used to partition per-client state.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// An opaque identifier for the origin of a request.
///
/// Typically a client's network address, but any equality-comparable
/// string works: the registry and trusted set only ever hash and compare
/// keys, never interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientKey(String);

impl ClientKey {
    /// Create a new client key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The underlying string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ClientKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ClientKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<IpAddr> for ClientKey {
    fn from(addr: IpAddr) -> Self {
        Self(addr.to_string())
    }
}

impl From<SocketAddr> for ClientKey {
    fn from(addr: SocketAddr) -> Self {
        // Port-agnostic: one client per address, not per connection
        Self(addr.ip().to_string())
    }
}

impl std::fmt::Display for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality() {
        let key1 = ClientKey::from("192.168.1.1");
        let key2 = ClientKey::new("192.168.1.1");

        assert_eq!(key1, key2);
        assert_ne!(key1, ClientKey::from("192.168.1.2"));
    }

    #[test]
    fn test_key_from_ip_addr() {
        let addr: IpAddr = "10.0.0.1".parse().unwrap();
        let key = ClientKey::from(addr);

        assert_eq!(key.as_str(), "10.0.0.1");
    }

    #[test]
    fn test_key_from_socket_addr_drops_port() {
        let addr: SocketAddr = "10.0.0.1:54321".parse().unwrap();
        let key = ClientKey::from(addr);

        assert_eq!(key, ClientKey::from("10.0.0.1"));
    }

    #[test]
    fn test_key_display() {
        let key = ClientKey::from("127.0.0.1");
        assert_eq!(format!("{}", key), "127.0.0.1");
    }
}
