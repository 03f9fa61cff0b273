//! Per-process topology state
//!
//! [`Process`] captures the argument vector once at startup and derives the
//! process start tags and the compiled service selector from it.

use tracing::debug;
use warren_common::Result;

use crate::fork::{build_fork_params, fork_command_args};
use crate::runtime::Runtime;
use crate::selection::{Selection, ServiceSelector};
use crate::service::ServiceDescriptor;
use crate::tags::{ProcessStartTag, build_process_start_tags};

/// Services hosted by this process and those to launch in forks
#[derive(Debug, Default)]
pub struct ServicePlan<'a> {
    pub local: Vec<&'a ServiceDescriptor>,
    /// Fork-designated services left out only by the selectors. Services
    /// rejected by tag or exclusion never appear here.
    pub forks: Vec<&'a ServiceDescriptor>,
}

#[derive(Debug, Clone)]
pub struct Process {
    runtime: Runtime,
    args: Vec<String>,
    tags: Vec<ProcessStartTag>,
    selector: ServiceSelector,
}

impl Process {
    /// Process without positional selectors
    pub fn new(runtime: Runtime) -> Result<Self> {
        Self::with_args(runtime, Vec::new())
    }

    pub fn with_args(runtime: Runtime, args: Vec<String>) -> Result<Self> {
        let selector = ServiceSelector::from_runtime(&runtime, &args)?;
        let tags = build_process_start_tags(&runtime, &args);
        debug!(tags = ?tags, "Built process start tags");
        Ok(Self {
            runtime,
            args,
            tags,
            selector,
        })
    }

    /// Capture a new argument vector, rebuilding tags and selector
    ///
    /// On error the previous state is kept.
    pub fn set_args(&mut self, args: Vec<String>) -> Result<()> {
        *self = Self::with_args(self.runtime.clone(), args)?;
        Ok(())
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn process_start_tags(&self) -> &[ProcessStartTag] {
        &self.tags
    }

    pub fn selector(&self) -> &ServiceSelector {
        &self.selector
    }

    pub fn is_required(&self, name: &str, tags: &[&str]) -> bool {
        self.selector.is_required(name, tags)
    }

    /// Split services into those hosted here and those to fork
    pub fn plan<'a>(&self, services: &'a [ServiceDescriptor]) -> ServicePlan<'a> {
        let mut plan = ServicePlan::default();
        for service in services {
            match self.selector.evaluate_service(service) {
                Selection::Required => plan.local.push(service),
                selection if service.fork && selection.is_forkable() => plan.forks.push(service),
                selection => {
                    debug!(service = %service.name, selection = ?selection, "Service skipped");
                }
            }
        }
        plan
    }

    pub fn build_fork_params(&self, cmd: &str) -> Vec<String> {
        build_fork_params(&self.runtime, cmd)
    }

    pub fn fork_command_args(&self, cmd: &str, services: &[&str]) -> Vec<String> {
        fork_command_args(&self.runtime, cmd, services)
    }
}
