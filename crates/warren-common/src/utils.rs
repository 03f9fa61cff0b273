//! Utility functions for Warren
//!
//! Host/port formatting and local interface discovery.

use std::net::IpAddr;

/// Combine a host and a port into a `host:port` network address.
///
/// Hosts containing a colon (IPv6 literals) are wrapped in square brackets.
///
/// # Examples
///
/// ```
/// use warren_common::join_host_port;
///
/// assert_eq!(join_host_port("127.0.0.1", "8002"), "127.0.0.1:8002");
/// assert_eq!(join_host_port("::1", "8002"), "[::1]:8002");
/// assert_eq!(join_host_port("", "0"), ":0");
/// ```
pub fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Find the address of the first non-loopback interface.
///
/// When `ipv6` is false only IPv4 interfaces are considered, otherwise only
/// IPv6 ones. Link-local IPv6 addresses are skipped since they are not
/// reachable without a zone.
pub fn host_interface_ip(ipv6: bool) -> std::io::Result<Option<IpAddr>> {
    let addrs = if_addrs::get_if_addrs()?;
    Ok(addrs
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .map(|iface| iface.ip())
        .find(|ip| match ip {
            IpAddr::V4(_) => !ipv6,
            IpAddr::V6(v6) => ipv6 && (v6.segments()[0] & 0xffc0) != 0xfe80,
        }))
}

/// Get the local IP address
///
/// Returns the first non-loopback IPv4 address found,
/// or "127.0.0.1" as fallback.
///
/// # Examples
///
/// ```
/// use warren_common::local_ip;
///
/// let ip = local_ip();
/// assert!(!ip.is_empty());
/// ```
pub fn local_ip() -> String {
    host_interface_ip(false)
        .ok()
        .flatten()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}
