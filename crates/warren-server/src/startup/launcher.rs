//! Child process launcher using tokio::process::Command.
//!
//! Children are killed when their handle is dropped, so forks never outlive
//! the parent.

use std::path::PathBuf;
use std::time::Duration;

use dashmap::DashMap;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use warren_common::{Result, WarrenError};

/// How long a child gets to exit after being killed
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ChildLauncher {
    executable: PathBuf,
    /// Running children keyed by the service they host
    children: DashMap<String, Child>,
}

impl ChildLauncher {
    pub fn new(executable: PathBuf) -> Self {
        Self {
            executable,
            children: DashMap::new(),
        }
    }

    /// Launcher re-executing the current binary
    pub fn current() -> Result<Self> {
        let executable = std::env::current_exe()
            .map_err(|e| WarrenError::SpawnError(format!("cannot locate executable: {}", e)))?;
        Ok(Self::new(executable))
    }

    /// Spawn a child hosting `service` with the given argument vector
    pub fn launch(&self, service: &str, args: Vec<String>) -> Result<u32> {
        debug!(
            service = %service,
            executable = %self.executable.display(),
            args = ?args,
            "Launching fork"
        );

        let child = Command::new(&self.executable)
            .args(&args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WarrenError::SpawnError(format!("failed to spawn {}: {}", service, e)))?;

        let pid = child.id().ok_or_else(|| {
            WarrenError::SpawnError(format!("spawned {} but no PID available", service))
        })?;

        if let Some(mut previous) = self.children.insert(service.to_string(), child) {
            warn!(service = %service, "Replacing an already running fork");
            let _ = previous.start_kill();
        }

        info!(service = %service, pid = pid, "Fork launched");
        Ok(pid)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Kill every child and wait for it to exit
    pub async fn stop_all(&self) {
        let services: Vec<String> = self.children.iter().map(|e| e.key().clone()).collect();
        for service in services {
            let Some((_, mut child)) = self.children.remove(&service) else {
                continue;
            };

            if let Err(e) = child.start_kill() {
                warn!(service = %service, error = %e, "Failed to send kill signal");
            }

            match tokio::time::timeout(STOP_TIMEOUT, child.wait()).await {
                Ok(Ok(status)) => debug!(service = %service, status = ?status, "Fork exited"),
                Ok(Err(e)) => warn!(service = %service, error = %e, "Failed to wait for fork"),
                Err(_) => warn!(service = %service, "Fork did not exit in time"),
            }
        }
    }
}
