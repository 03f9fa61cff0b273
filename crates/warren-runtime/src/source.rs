//! Provider backed by the `config` crate
//!
//! Configuration files, environment variables and command line overrides are
//! layered by a [`config::ConfigBuilder`]; the built [`Config`] is immutable,
//! so defaults registered at runtime live in a separate overlay.

use std::collections::HashMap;

use config::{Config, ConfigBuilder, Value, ValueKind, builder::DefaultState};
use parking_lot::RwLock;
use warren_common::{Result, WarrenError};

use crate::provider::{ConfigProvider, ConfigValue, layered};

/// [`ConfigProvider`] over a built [`Config`]
#[derive(Debug)]
pub struct SourceProvider {
    config: Config,
    defaults: RwLock<HashMap<String, ConfigValue>>,
}

impl SourceProvider {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            defaults: RwLock::new(HashMap::new()),
        }
    }

    /// Build the layered sources and wrap the result
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .build()
            .map_err(|e| WarrenError::ConfigError(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Access the underlying configuration, e.g. to deserialize extra sections
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn configured(&self, key: &str) -> Option<Value> {
        self.config
            .get::<Value>(key)
            .ok()
            .filter(|v| !matches!(v.kind, ValueKind::Nil))
    }
}

fn to_config_value(value: &Value) -> Option<ConfigValue> {
    match &value.kind {
        ValueKind::Nil | ValueKind::Table(_) => None,
        ValueKind::Boolean(b) => Some(ConfigValue::Bool(*b)),
        ValueKind::Array(items) => Some(ConfigValue::List(
            items.iter().map(|item| item.to_string()).collect(),
        )),
        _ => Some(ConfigValue::String(value.to_string())),
    }
}

impl ConfigProvider for SourceProvider {
    fn lookup(&self, key: &str) -> Option<ConfigValue> {
        let explicit = self.configured(key).and_then(|value| to_config_value(&value));
        layered(explicit, || self.defaults.read().get(key).cloned())
    }

    fn is_set(&self, key: &str) -> bool {
        self.configured(key).is_some()
    }

    fn set_default(&self, key: &str, value: ConfigValue) {
        self.defaults.write().insert(key.to_string(), value);
    }
}
