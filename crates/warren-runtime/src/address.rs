//! Control-plane URLs and bind/advertise addresses
//!
//! Every accessor reads configuration on each call. The only write is the
//! memoization of a resolved advertise address as a default.

use std::net::IpAddr;

use tracing::debug;
use warren_common::utils::host_interface_ip;
use warren_common::{Result, WarrenError, join_host_port};

use crate::keys::{
    CONFIG_MODE_LOCAL, CONFIG_MODE_RAFT, CONFIG_MODE_REMOTE, KEY_ADVERTISE_ADDRESS,
    KEY_BIND_ADDRESS, KEY_BROKER, KEY_CONFIG, KEY_GRPC_EXTERNAL, KEY_GRPC_PORT, KEY_HTTP_PORT,
    KEY_REGISTRY,
};
use crate::runtime::Runtime;

/// Resolves a reachable local address for a bind specification
pub trait BindAddressResolver: Send + Sync {
    /// `bind` is `None` when the bind host is empty or not an IP literal.
    fn resolve_bind_address(&self, bind: Option<IpAddr>) -> Result<IpAddr>;
}

/// Resolver backed by the host's network interfaces
///
/// A specific bind IP is reachable as-is. Wildcard, loopback or missing bind
/// hosts select the first non-loopback interface, preferring the family of
/// the bind IP and falling back to the other one.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceResolver;

impl BindAddressResolver for InterfaceResolver {
    fn resolve_bind_address(&self, bind: Option<IpAddr>) -> Result<IpAddr> {
        if let Some(ip) = bind
            && !ip.is_unspecified()
            && !ip.is_loopback()
        {
            return Ok(ip);
        }

        let prefer_v6 = matches!(bind, Some(IpAddr::V6(_)));
        for ipv6 in [prefer_v6, !prefer_v6] {
            let found =
                host_interface_ip(ipv6).map_err(|e| WarrenError::NetworkError(e.to_string()))?;
            if let Some(ip) = found {
                return Ok(ip);
            }
        }

        Err(WarrenError::NetworkError(
            "no non-loopback network interface available".to_string(),
        ))
    }
}

impl Runtime {
    /// The scheme://address url of the registry
    pub fn registry_url(&self) -> String {
        self.get_string(KEY_REGISTRY)
    }

    /// The scheme://address url of the broker
    pub fn broker_url(&self) -> String {
        self.get_string(KEY_BROKER)
    }

    /// The scheme://address url of the config service, or a config mode
    pub fn config_url(&self) -> String {
        self.get_string(KEY_CONFIG)
    }

    /// `advertise_address:grpc_port`
    pub fn grpc_bind_address(&self) -> String {
        join_host_port(
            &self.get_string(KEY_ADVERTISE_ADDRESS),
            &self.get_string(KEY_GRPC_PORT),
        )
    }

    /// Optional gRPC port used for external binding
    pub fn grpc_external_port(&self) -> String {
        self.get_string(KEY_GRPC_EXTERNAL)
    }

    /// `bind_address:http_port`
    pub fn http_bind_address(&self) -> String {
        join_host_port(
            &self.get_string(KEY_BIND_ADDRESS),
            &self.get_string(KEY_HTTP_PORT),
        )
    }

    /// Config is generated locally
    pub fn is_local(&self) -> bool {
        self.config_url() == CONFIG_MODE_LOCAL
    }

    /// Config is served by a remote or raft-backed store
    pub fn is_remote(&self) -> bool {
        let mode = self.config_url();
        mode == CONFIG_MODE_REMOTE || mode == CONFIG_MODE_RAFT
    }

    /// Read or compute the advertise address using the host interfaces
    pub fn default_advertise_address(&self) -> String {
        self.default_advertise_address_with(&InterfaceResolver)
    }

    /// Read or compute the advertise address
    ///
    /// A configured, non-empty advertise address wins. Otherwise the bind
    /// host is resolved to a reachable address, which is stored as the
    /// default for [`KEY_ADVERTISE_ADDRESS`]; an empty explicit value does
    /// not shadow it. When resolution fails the raw bind host is
    /// returned and nothing is stored.
    pub fn default_advertise_address_with(&self, resolver: &dyn BindAddressResolver) -> String {
        let advertise = self.get_string(KEY_ADVERTISE_ADDRESS);
        if !advertise.is_empty() {
            return advertise;
        }

        let bind_host = self.get_string(KEY_BIND_ADDRESS);
        let bind_ip = bind_host.parse::<IpAddr>().ok();
        match resolver.resolve_bind_address(bind_ip) {
            Ok(ip) => {
                debug!(bind = %bind_host, advertise = %ip, "Resolved advertise address");
                let advertise = ip.to_string();
                self.set_default(KEY_ADVERTISE_ADDRESS, advertise.clone());
                advertise
            }
            Err(e) => {
                debug!(
                    bind = %bind_host,
                    error = %e,
                    "Could not resolve advertise address, using bind host"
                );
                bind_host
            }
        }
    }
}
