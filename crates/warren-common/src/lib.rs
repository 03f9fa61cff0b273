//! Warren Common - Shared types and utilities
//!
//! This crate provides the foundational pieces used across all Warren components:
//! - Error types
//! - Host/port helpers
//! - Local interface discovery

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{PatternKind, Result, WarrenError};
pub use utils::{join_host_port, local_ip};

/// Scheme used by control-plane services that live inside a single process
pub const MEM_SCHEME: &str = "mem://";

/// Scheme used to reach a control plane exposed over gRPC
pub const GRPC_SCHEME: &str = "grpc://";
