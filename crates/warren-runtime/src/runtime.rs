//! Configuration facade
//!
//! [`Runtime`] is the context object handed to every topology component. It
//! delegates to the currently bound [`ConfigProvider`] and adds no caching.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::keys::{
    KEY_ENABLE_METRICS, KEY_ENABLE_PPROF, KEY_FORK, KEY_FORK_LEGACY, KEY_HTTP_SERVER, KEY_LOG,
    KEY_LOG_JSON, KEY_LOG_TO_FILE,
};
use crate::provider::{ConfigProvider, ConfigValue, EmptyProvider};

/// Shared handle on the process configuration
///
/// Clones share the same binding: replacing the provider through one clone
/// is observed by all of them. Replacement is expected to happen during
/// startup, before selection queries run.
#[derive(Clone)]
pub struct Runtime {
    provider: Arc<RwLock<Arc<dyn ConfigProvider>>>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Arc::new(EmptyProvider))
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self {
            provider: Arc::new(RwLock::new(provider)),
        }
    }

    /// Replace the bound provider (last writer wins)
    pub fn set_provider(&self, provider: Arc<dyn ConfigProvider>) {
        *self.provider.write() = provider;
    }

    /// The currently bound provider
    pub fn provider(&self) -> Arc<dyn ConfigProvider> {
        self.provider.read().clone()
    }

    pub fn lookup_bool(&self, key: &str) -> Option<bool> {
        self.provider.read().lookup_bool(key)
    }

    pub fn lookup_string(&self, key: &str) -> Option<String> {
        self.provider.read().lookup_string(key)
    }

    pub fn lookup_string_slice(&self, key: &str) -> Option<Vec<String>> {
        self.provider.read().lookup_string_slice(key)
    }

    /// Read a boolean, `false` when missing
    pub fn get_bool(&self, key: &str) -> bool {
        self.lookup_bool(key).unwrap_or_default()
    }

    /// Read a string, empty when missing
    pub fn get_string(&self, key: &str) -> String {
        self.lookup_string(key).unwrap_or_default()
    }

    /// Read a list, empty when missing
    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        self.lookup_string_slice(key).unwrap_or_default()
    }

    /// Whether the key was explicitly configured
    pub fn is_set(&self, key: &str) -> bool {
        self.provider.read().is_set(key)
    }

    pub fn set_default(&self, key: &str, value: impl Into<ConfigValue>) {
        self.provider.read().set_default(key, value.into());
    }

    // ========================================================================
    // Well-known flags
    // ========================================================================

    /// One of [`crate::keys::HTTP_SERVER_CADDY`] or [`crate::keys::HTTP_SERVER_NATIVE`]
    pub fn http_server_type(&self) -> String {
        self.get_string(KEY_HTTP_SERVER)
    }

    pub fn log_level(&self) -> String {
        self.get_string(KEY_LOG)
    }

    pub fn log_json(&self) -> bool {
        self.get_bool(KEY_LOG_JSON)
    }

    pub fn log_to_file(&self) -> bool {
        self.get_bool(KEY_LOG_TO_FILE)
    }

    /// Whether this process was started as a fork of another process
    pub fn is_fork(&self) -> bool {
        self.get_bool(KEY_FORK) || self.get_bool(KEY_FORK_LEGACY)
    }

    pub fn metrics_enabled(&self) -> bool {
        self.get_bool(KEY_ENABLE_METRICS)
    }

    pub fn pprof_enabled(&self) -> bool {
        self.get_bool(KEY_ENABLE_PPROF)
    }
}
