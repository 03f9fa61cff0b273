//! Configuration and command line model

pub mod config;

pub use config::{Cli, Command, Configuration, StartArgs};
