//! Well-known configuration keys
//!
//! Key names double as command line flag names (`--<key>`), so a fork
//! argument vector built from them parses back into the same keys.

// Control plane
pub const KEY_REGISTRY: &str = "registry";
pub const KEY_BROKER: &str = "broker";
pub const KEY_CONFIG: &str = "config";

// Network
pub const KEY_BIND_ADDRESS: &str = "bind_address";
pub const KEY_ADVERTISE_ADDRESS: &str = "advertise_address";
pub const KEY_GRPC_PORT: &str = "grpc_port";
pub const KEY_GRPC_EXTERNAL: &str = "grpc_external";
pub const KEY_HTTP_SERVER: &str = "http";
pub const KEY_HTTP_PORT: &str = "http_port";

// Logging
pub const KEY_LOG: &str = "log";
pub const KEY_LOG_JSON: &str = "log_json";
pub const KEY_LOG_TO_FILE: &str = "log_to_file";

// Process
pub const KEY_FORK: &str = "fork";
/// Older processes mark forks with this key instead of [`KEY_FORK`]
pub const KEY_FORK_LEGACY: &str = "is_fork";
pub const KEY_ENABLE_METRICS: &str = "enable_metrics";
pub const KEY_ENABLE_PPROF: &str = "enable_pprof";

// Service selection
pub const KEY_ARG_EXCLUDE: &str = "exclude";
pub const KEY_ARG_TAGS: &str = "tags";

/// HTTP server kinds accepted by [`KEY_HTTP_SERVER`]
pub const HTTP_SERVER_CADDY: &str = "caddy";
pub const HTTP_SERVER_NATIVE: &str = "http";

/// Values of [`KEY_CONFIG`] that name a mode instead of a URL
pub const CONFIG_MODE_LOCAL: &str = "local";
pub const CONFIG_MODE_REMOTE: &str = "remote";
pub const CONFIG_MODE_RAFT: &str = "raft";
