//! Warren host process
//!
//! Loads layered configuration, initializes logging, decides which services
//! run in this process and launches forks for the rest.

pub mod model;
pub mod startup;
