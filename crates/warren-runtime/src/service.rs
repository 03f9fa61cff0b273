//! Service descriptors supplied by the hosting application

use serde::{Deserialize, Serialize};

/// A named service and the capability tags it declares
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Host this service in a dedicated child process when it does not run locally
    #[serde(default)]
    pub fork: bool,
}

impl ServiceDescriptor {
    pub fn new(name: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            fork: false,
        }
    }

    pub fn forked(mut self) -> Self {
        self.fork = true;
        self
    }

    pub fn tag_refs(&self) -> Vec<&str> {
        self.tags.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let service: ServiceDescriptor = serde_json::from_str(r#"{"name":"data-a"}"#).unwrap();
        assert_eq!(service, ServiceDescriptor::new("data-a", &[]));
        assert!(!service.fork);
    }

    #[test]
    fn test_deserialize_full() {
        let service: ServiceDescriptor =
            serde_json::from_str(r#"{"name":"data-a","tags":["storage"],"fork":true}"#).unwrap();
        assert_eq!(service, ServiceDescriptor::new("data-a", &["storage"]).forked());
        assert_eq!(service.tag_refs(), vec!["storage"]);
    }
}
