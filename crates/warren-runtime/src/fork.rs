//! Child process argument vectors
//!
//! A fork binds to ephemeral ports and reaches the control plane through the
//! parent's gRPC address, unless the parent uses a shared store whose URL the
//! child can reach directly.

use warren_common::{GRPC_SCHEME, MEM_SCHEME};

use crate::keys::{
    HTTP_SERVER_NATIVE, KEY_ADVERTISE_ADDRESS, KEY_BIND_ADDRESS, KEY_BROKER, KEY_CONFIG,
    KEY_ENABLE_METRICS, KEY_ENABLE_PPROF, KEY_FORK, KEY_GRPC_PORT, KEY_HTTP_PORT,
    KEY_HTTP_SERVER, KEY_REGISTRY,
};
use crate::runtime::Runtime;

/// String flags forwarded only when explicitly configured
const FORWARDED_STRING_KEYS: [&str; 3] = [KEY_BIND_ADDRESS, KEY_ADVERTISE_ADDRESS, KEY_CONFIG];

/// Boolean flags forwarded only when true
const FORWARDED_BOOL_KEYS: [&str; 2] = [KEY_ENABLE_METRICS, KEY_ENABLE_PPROF];

/// Port value asking the OS for an ephemeral port
const EPHEMERAL_PORT: &str = "0";

fn flag(key: &str) -> String {
    format!("--{}", key)
}

/// In-memory (or unset) stores are only reachable through the parent
fn control_plane_url(configured: String, local: &str) -> String {
    if configured.is_empty() || configured.starts_with(MEM_SCHEME) {
        local.to_string()
    } else {
        configured
    }
}

/// Build `cmd --fork --config ... --registry ... --broker ...` for a child process
///
/// The executable path is not included.
pub fn build_fork_params(runtime: &Runtime, cmd: &str) -> Vec<String> {
    let local = format!("{}{}", GRPC_SCHEME, runtime.grpc_bind_address());
    let registry = control_plane_url(runtime.registry_url(), &local);
    let broker = control_plane_url(runtime.broker_url(), &local);

    let mut params = vec![
        cmd.to_string(),
        flag(KEY_FORK),
        flag(KEY_CONFIG),
        local,
        flag(KEY_REGISTRY),
        registry,
        flag(KEY_BROKER),
        broker,
        flag(KEY_GRPC_PORT),
        EPHEMERAL_PORT.to_string(),
        flag(KEY_HTTP_SERVER),
        HTTP_SERVER_NATIVE.to_string(),
        flag(KEY_HTTP_PORT),
        EPHEMERAL_PORT.to_string(),
    ];

    for key in FORWARDED_STRING_KEYS {
        if runtime.is_set(key) {
            let value = runtime.get_string(key);
            if !value.is_empty() {
                params.push(flag(key));
                params.push(value);
            }
        }
    }

    for key in FORWARDED_BOOL_KEYS {
        if runtime.get_bool(key) {
            params.push(flag(key));
        }
    }

    params
}

/// Fork parameters followed by anchored selectors for the given services
pub fn fork_command_args(runtime: &Runtime, cmd: &str, services: &[&str]) -> Vec<String> {
    let mut params = build_fork_params(runtime, cmd);
    params.extend(
        services
            .iter()
            .map(|name| format!("^{}$", regex::escape(name))),
    );
    params
}
