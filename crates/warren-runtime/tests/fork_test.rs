// Integration tests for fork parameters and advertise address resolution

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use warren_runtime::{
    BindAddressResolver, MemoryProvider, Process, Result, Runtime, SourceProvider,
};

struct StaticResolver(IpAddr);

impl BindAddressResolver for StaticResolver {
    fn resolve_bind_address(&self, _bind: Option<IpAddr>) -> Result<IpAddr> {
        Ok(self.0)
    }
}

fn flag_values<'a>(params: &'a [String], flag: &str) -> Vec<&'a str> {
    params
        .windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

#[test]
fn test_mem_registry_scenario() {
    let provider = MemoryProvider::new()
        .with("registry", "mem://local")
        .with("advertise_address", "192.168.10.2")
        .with("grpc_port", "8002");
    let process = Process::new(Runtime::new(Arc::new(provider))).unwrap();

    let params = process.build_fork_params("start");
    assert_eq!(
        flag_values(&params, "--registry"),
        vec!["grpc://192.168.10.2:8002"]
    );
}

#[test]
fn test_resolved_advertise_address_feeds_fork_params() {
    let runtime = Runtime::new(Arc::new(
        MemoryProvider::new()
            .with("bind_address", "0.0.0.0")
            .with("grpc_port", "8002"),
    ));
    let resolver = StaticResolver(IpAddr::V4(Ipv4Addr::new(10, 4, 0, 9)));

    let first = runtime.default_advertise_address_with(&resolver);
    let second = runtime.default_advertise_address_with(&resolver);
    assert_eq!(first, second);

    let params = warren_runtime::build_fork_params(&runtime, "start");
    assert_eq!(flag_values(&params, "--config"), vec!["grpc://10.4.0.9:8002"]);
    // Memoized as a default, so it is not forwarded as an explicit flag
    assert!(flag_values(&params, "--advertise_address").is_empty());
    assert_eq!(flag_values(&params, "--bind_address"), vec!["0.0.0.0"]);
}

#[test]
fn test_empty_advertise_address_does_not_leak_into_fork_urls() {
    let runtime = Runtime::new(Arc::new(
        MemoryProvider::new()
            .with("advertise_address", "")
            .with("grpc_port", "8002"),
    ));
    let resolver = StaticResolver(IpAddr::V4(Ipv4Addr::new(10, 4, 0, 9)));

    assert_eq!(runtime.default_advertise_address_with(&resolver), "10.4.0.9");

    let params = warren_runtime::build_fork_params(&runtime, "start");
    assert_eq!(flag_values(&params, "--config"), vec!["grpc://10.4.0.9:8002"]);
    assert_eq!(flag_values(&params, "--registry"), vec!["grpc://10.4.0.9:8002"]);
    assert_eq!(flag_values(&params, "--broker"), vec!["grpc://10.4.0.9:8002"]);
}

#[test]
fn test_layered_source_feeds_fork_params() {
    let builder = config::Config::builder()
        .set_override("advertise_address", "10.0.0.1")
        .unwrap()
        .set_override("grpc_port", 8002_i64)
        .unwrap()
        .set_override("broker", "nats://10.0.0.3:4222")
        .unwrap()
        .set_override("enable_pprof", true)
        .unwrap();
    let provider = SourceProvider::from_builder(builder).unwrap();
    let process = Process::new(Runtime::new(Arc::new(provider))).unwrap();

    let params = process.fork_command_args("start", &["cache"]);
    assert_eq!(flag_values(&params, "--broker"), vec!["nats://10.0.0.3:4222"]);
    assert_eq!(flag_values(&params, "--registry"), vec!["grpc://10.0.0.1:8002"]);
    assert!(params.contains(&"--enable_pprof".to_string()));
    assert!(!params.contains(&"--enable_metrics".to_string()));
    assert_eq!(params.last().map(String::as_str), Some("^cache$"));
}
