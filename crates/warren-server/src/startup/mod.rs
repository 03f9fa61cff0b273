//! Application startup utilities module.

mod launcher;
mod logging;
mod shutdown;

pub use launcher::ChildLauncher;
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
pub use shutdown::wait_for_shutdown_signal;
