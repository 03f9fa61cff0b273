//! Warren Runtime - Process topology resolution
//!
//! A single Warren executable hosts many named services. At startup this
//! crate decides which of them the current process activates and derives the
//! addresses and argument vectors used to bootstrap child processes for the
//! rest:
//! - Configuration facade over a pluggable provider
//! - Control-plane URLs and bind/advertise addresses
//! - Process start tags
//! - Service selection (tags, exclusions, selectors)
//! - Fork parameters

pub mod address;
pub mod fork;
pub mod keys;
pub mod process;
pub mod provider;
pub mod runtime;
pub mod selection;
pub mod service;
pub mod source;
pub mod tags;

// Re-export commonly used types
pub use address::{BindAddressResolver, InterfaceResolver};
pub use fork::{build_fork_params, fork_command_args};
pub use process::{Process, ServicePlan};
pub use provider::{ConfigProvider, ConfigValue, EmptyProvider, MemoryProvider};
pub use runtime::Runtime;
pub use selection::{Selection, ServiceSelector};
pub use service::ServiceDescriptor;
pub use source::SourceProvider;
pub use tags::{ProcessStartTag, build_process_start_tags};

pub use warren_common::{Result, WarrenError};
