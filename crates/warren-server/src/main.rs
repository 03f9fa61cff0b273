//! Main entry point for the Warren host process.
//!
//! Resolves which services run in this process and, for `start`, launches a
//! fork for every fork-designated service the selectors left out.

use clap::Parser;
use tracing::info;
use warren_runtime::Process;
use warren_server::model::{Cli, Command, Configuration};
use warren_server::startup::{self, ChildLauncher, LoggingConfig};

/// Sub-command forks are started with
const FORK_COMMAND: &str = "start";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let args = cli.command.args();

    let configuration = Configuration::load(args, cli.config_file.as_deref())?;
    let runtime = configuration.runtime().clone();
    let _logging_guard = startup::init_logging(&LoggingConfig::from_runtime(&runtime))?;

    let advertise_address = runtime.default_advertise_address();
    info!(
        advertise = %advertise_address,
        grpc = %runtime.grpc_bind_address(),
        http = %runtime.http_bind_address(),
        registry = %runtime.registry_url(),
        broker = %runtime.broker_url(),
        config = %runtime.config_url(),
        fork = runtime.is_fork(),
        "Runtime configured"
    );

    let process = Process::with_args(runtime.clone(), args.selectors.clone())?;
    let tags: Vec<String> = process
        .process_start_tags()
        .iter()
        .map(|t| t.to_string())
        .collect();
    info!(tags = ?tags, "Process start tags");

    let plan = process.plan(configuration.services());
    for service in &plan.local {
        info!(service = %service.name, "Service runs in this process");
    }

    match &cli.command {
        Command::Plan(_) => {
            info!(
                args = ?process.build_fork_params(FORK_COMMAND),
                "Fork parameters"
            );
            for service in &plan.forks {
                info!(
                    service = %service.name,
                    args = ?process.fork_command_args(FORK_COMMAND, &[service.name.as_str()]),
                    "Service would run in a fork"
                );
            }
            Ok(())
        }
        Command::Start(_) => {
            let launcher = ChildLauncher::current()?;
            if runtime.is_fork() {
                info!("Running as a fork, not launching further forks");
            } else {
                for service in &plan.forks {
                    let params =
                        process.fork_command_args(FORK_COMMAND, &[service.name.as_str()]);
                    launcher.launch(&service.name, params)?;
                }
            }

            startup::wait_for_shutdown_signal().await;
            launcher.stop_all().await;
            info!("Shutdown complete");
            Ok(())
        }
    }
}
