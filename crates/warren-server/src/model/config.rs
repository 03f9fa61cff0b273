//! Configuration management for the Warren host process
//!
//! Sources are layered lowest to highest: configuration file, `WARREN_*`
//! environment variables, then command line flags. Flag names are the
//! well-known runtime keys, so a fork argument vector parses back into the
//! same keys in the child.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use warren_common::{Result, WarrenError};
use warren_runtime::keys::{
    KEY_ADVERTISE_ADDRESS, KEY_ARG_EXCLUDE, KEY_ARG_TAGS, KEY_BIND_ADDRESS, KEY_BROKER,
    KEY_CONFIG, KEY_ENABLE_METRICS, KEY_ENABLE_PPROF, KEY_FORK, KEY_FORK_LEGACY,
    KEY_GRPC_EXTERNAL, KEY_GRPC_PORT, KEY_HTTP_PORT, KEY_HTTP_SERVER, KEY_LOG, KEY_LOG_JSON,
    KEY_LOG_TO_FILE, KEY_REGISTRY,
};
use warren_runtime::{Runtime, ServiceDescriptor, SourceProvider};

/// Configuration file read when `--config-file` is not given
pub const DEFAULT_CONFIG_FILE: &str = "conf/warren.yml";

/// Configuration key holding the service manifest
pub const SERVICES_KEY: &str = "services";

const ENV_PREFIX: &str = "WARREN";

/// Command line arguments for the host process
#[derive(Debug, Parser)]
#[command(name = "warren", version, about = "Multi-service host process")]
pub struct Cli {
    /// Configuration file (yaml, toml or json)
    #[arg(long = "config-file", env = "WARREN_CONFIG_FILE", global = true)]
    pub config_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log which services run here and the arguments a fork would receive
    #[command(args_override_self = true)]
    Plan(StartArgs),
    /// Run the services selected for this process and launch forks
    #[command(args_override_self = true)]
    Start(StartArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Plan(_) => "plan",
            Command::Start(_) => "start",
        }
    }

    pub fn args(&self) -> &StartArgs {
        match self {
            Command::Plan(args) | Command::Start(args) => args,
        }
    }
}

/// Runtime flags shared by all commands
#[derive(Debug, Clone, Default, Args)]
pub struct StartArgs {
    /// Registry URL (scheme://address)
    #[arg(long = "registry")]
    pub registry: Option<String>,
    /// Broker URL (scheme://address)
    #[arg(long = "broker")]
    pub broker: Option<String>,
    /// Config URL (scheme://address) or mode (local, remote, raft)
    #[arg(long = "config")]
    pub config: Option<String>,
    /// Host the servers bind to
    #[arg(long = "bind_address")]
    pub bind_address: Option<String>,
    /// Address advertised to other processes
    #[arg(long = "advertise_address")]
    pub advertise_address: Option<String>,
    #[arg(long = "grpc_port")]
    pub grpc_port: Option<String>,
    /// Optional gRPC port used for external binding
    #[arg(long = "grpc_external")]
    pub grpc_external: Option<String>,
    /// HTTP server kind (caddy, http)
    #[arg(long = "http")]
    pub http: Option<String>,
    #[arg(long = "http_port")]
    pub http_port: Option<String>,
    /// Log level
    #[arg(long = "log")]
    pub log: Option<String>,
    #[arg(long = "log_json")]
    pub log_json: bool,
    #[arg(long = "log_to_file")]
    pub log_to_file: bool,
    /// Started as a fork of another process
    #[arg(long = "fork")]
    pub fork: bool,
    #[arg(long = "is_fork", hide = true)]
    pub is_fork: bool,
    #[arg(long = "enable_metrics")]
    pub enable_metrics: bool,
    #[arg(long = "enable_pprof")]
    pub enable_pprof: bool,
    /// Only run services declaring one of these tags
    #[arg(long = "tags", value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Never run services whose name matches one of these patterns
    #[arg(long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,
    /// Run only services whose name matches one of these patterns
    pub selectors: Vec<String>,
}

impl StartArgs {
    /// Apply flags given on the command line as configuration overrides
    pub fn apply_overrides(
        &self,
        mut builder: ConfigBuilder<DefaultState>,
    ) -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        let strings = [
            (KEY_REGISTRY, &self.registry),
            (KEY_BROKER, &self.broker),
            (KEY_CONFIG, &self.config),
            (KEY_BIND_ADDRESS, &self.bind_address),
            (KEY_ADVERTISE_ADDRESS, &self.advertise_address),
            (KEY_GRPC_PORT, &self.grpc_port),
            (KEY_GRPC_EXTERNAL, &self.grpc_external),
            (KEY_HTTP_SERVER, &self.http),
            (KEY_HTTP_PORT, &self.http_port),
            (KEY_LOG, &self.log),
        ];
        for (key, value) in strings {
            if let Some(v) = value {
                builder = builder.set_override(key, v.as_str())?;
            }
        }

        let flags = [
            (KEY_LOG_JSON, self.log_json),
            (KEY_LOG_TO_FILE, self.log_to_file),
            (KEY_FORK, self.fork),
            (KEY_FORK_LEGACY, self.is_fork),
            (KEY_ENABLE_METRICS, self.enable_metrics),
            (KEY_ENABLE_PPROF, self.enable_pprof),
        ];
        for (key, value) in flags {
            if value {
                builder = builder.set_override(key, true)?;
            }
        }

        if !self.tags.is_empty() {
            builder = builder.set_override(KEY_ARG_TAGS, self.tags.clone())?;
        }
        if !self.exclude.is_empty() {
            builder = builder.set_override(KEY_ARG_EXCLUDE, self.exclude.clone())?;
        }

        Ok(builder)
    }
}

/// Loaded configuration: the runtime facade plus the service manifest
#[derive(Debug, Clone)]
pub struct Configuration {
    runtime: Runtime,
    services: Vec<ServiceDescriptor>,
}

impl Configuration {
    /// Layer file, environment and flags, then bind the result to a [`Runtime`]
    ///
    /// An explicitly named configuration file must exist; the default one is optional.
    pub fn load(args: &StartArgs, config_file: Option<&str>) -> Result<Self> {
        let builder = Config::builder()
            .add_source(
                File::with_name(config_file.unwrap_or(DEFAULT_CONFIG_FILE))
                    .required(config_file.is_some()),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key(KEY_ARG_TAGS)
                    .with_list_parse_key(KEY_ARG_EXCLUDE)
                    .try_parsing(true),
            );
        let builder = args
            .apply_overrides(builder)
            .map_err(|e| WarrenError::ConfigError(e.to_string()))?;

        let provider = SourceProvider::from_builder(builder)?;
        let services = read_services(provider.config())?;

        Ok(Self {
            runtime: Runtime::new(Arc::new(provider)),
            services,
        })
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }
}

fn read_services(config: &Config) -> Result<Vec<ServiceDescriptor>> {
    match config.get::<Vec<ServiceDescriptor>>(SERVICES_KEY) {
        Ok(services) => Ok(services),
        Err(ConfigError::NotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(WarrenError::ConfigError(format!(
            "invalid '{}' section: {}",
            SERVICES_KEY, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_start_flags() {
        let cli = parse(&[
            "warren",
            "start",
            "--registry",
            "mem://",
            "--tags",
            "storage,cache",
            "--enable_metrics",
            "^data-",
        ]);
        assert_eq!(cli.command.name(), "start");
        let args = cli.command.args();
        assert_eq!(args.registry.as_deref(), Some("mem://"));
        assert_eq!(args.tags, vec!["storage", "cache"]);
        assert!(args.enable_metrics);
        assert!(!args.enable_pprof);
        assert_eq!(args.selectors, vec!["^data-"]);
    }

    #[test]
    fn test_repeated_flag_last_wins() {
        let cli = parse(&[
            "warren",
            "start",
            "--config",
            "grpc://10.0.0.1:8002",
            "--config",
            "remote",
        ]);
        assert_eq!(cli.command.args().config.as_deref(), Some("remote"));
    }

    #[test]
    fn test_fork_vector_parses_back() {
        let runtime = Runtime::new(Arc::new(
            warren_runtime::MemoryProvider::new()
                .with("advertise_address", "10.0.0.1")
                .with("grpc_port", "8002")
                .with("enable_pprof", true),
        ));
        let mut argv = vec!["warren".to_string()];
        argv.extend(warren_runtime::fork_command_args(&runtime, "start", &["cache"]));

        let cli = Cli::try_parse_from(argv).unwrap();
        let args = cli.command.args();
        assert!(args.fork);
        assert!(args.enable_pprof);
        assert_eq!(args.grpc_port.as_deref(), Some("0"));
        assert_eq!(args.http.as_deref(), Some("http"));
        assert_eq!(args.registry.as_deref(), Some("grpc://10.0.0.1:8002"));
        assert_eq!(args.selectors, vec!["^cache$"]);
    }

    #[test]
    fn test_load_layers_file_and_flags() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(
            file,
            "registry: etcd://10.0.0.2:2379\n\
             grpc_port: 8002\n\
             exclude:\n  - \"^test-\"\n\
             services:\n  - name: data-a\n    tags: [storage]\n  - name: cache-a\n    fork: true\n"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = StartArgs {
            grpc_port: Some("9000".to_string()),
            enable_metrics: true,
            ..Default::default()
        };
        let configuration = Configuration::load(&args, Some(&path)).unwrap();
        let runtime = configuration.runtime();

        assert_eq!(runtime.registry_url(), "etcd://10.0.0.2:2379");
        assert_eq!(runtime.get_string("grpc_port"), "9000");
        assert!(runtime.metrics_enabled());
        assert_eq!(runtime.get_string_slice("exclude"), vec!["^test-"]);
        assert!(!runtime.is_set("broker"));

        let services = configuration.services();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].tags, vec!["storage"]);
        assert!(services[1].fork);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Configuration::load(&StartArgs::default(), Some("/nonexistent/warren.yml"));
        assert!(matches!(result, Err(WarrenError::ConfigError(_))));
    }
}
