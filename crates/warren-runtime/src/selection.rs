//! Service selection
//!
//! Decides whether a service runs in the current process. Rules apply in a
//! fixed order and the first decisive one wins:
//!
//! 1. Tag allow-list: when tags are configured, the service must declare at
//!    least one of them (exact match).
//! 2. Exclusions: a service whose name matches any exclusion pattern is rejected.
//! 3. Selectors: with no selectors everything left runs; otherwise the name
//!    must match at least one selector.
//!
//! Patterns are unanchored regular expressions compiled once, when the
//! selector is built. A malformed pattern fails construction.
//!
//! Only a service that passed rules 1 and 2 but matched no selector may be
//! hosted by a fork; the other rejections mean the service never runs.

use regex::Regex;
use tracing::trace;
use warren_common::{PatternKind, Result, WarrenError};

use crate::keys::{KEY_ARG_EXCLUDE, KEY_ARG_TAGS};
use crate::runtime::Runtime;
use crate::service::ServiceDescriptor;

/// Outcome of evaluating a service against the selection rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Runs in this process
    Required,
    /// The tag allow-list is configured and the service declares none of its tags
    RejectedByTag,
    /// The name matches an exclusion pattern
    Excluded,
    /// Selectors are given and none matches the name
    NotSelected,
}

impl Selection {
    pub fn is_required(self) -> bool {
        self == Selection::Required
    }

    /// May run elsewhere, e.g. in a fork
    pub fn is_forkable(self) -> bool {
        self == Selection::NotSelected
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServiceSelector {
    tags: Vec<String>,
    exclusions: Vec<Regex>,
    selectors: Vec<Regex>,
}

fn compile(kind: PatternKind, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| WarrenError::InvalidPattern {
                kind,
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

impl ServiceSelector {
    pub fn new(tags: Vec<String>, exclusions: &[String], selectors: &[String]) -> Result<Self> {
        Ok(Self {
            tags,
            exclusions: compile(PatternKind::Exclusion, exclusions)?,
            selectors: compile(PatternKind::Selector, selectors)?,
        })
    }

    /// Read tags and exclusions from configuration; `args` are the selectors
    pub fn from_runtime(runtime: &Runtime, args: &[String]) -> Result<Self> {
        Self::new(
            runtime.get_string_slice(KEY_ARG_TAGS),
            &runtime.get_string_slice(KEY_ARG_EXCLUDE),
            args,
        )
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn evaluate(&self, name: &str, service_tags: &[&str]) -> Selection {
        if !self.tags.is_empty() && !self.tags.iter().any(|t| service_tags.contains(&t.as_str()))
        {
            trace!(service = name, "Service rejected: no matching tag");
            return Selection::RejectedByTag;
        }

        if let Some(re) = self.exclusions.iter().find(|re| re.is_match(name)) {
            trace!(service = name, pattern = re.as_str(), "Service rejected: excluded");
            return Selection::Excluded;
        }

        if self.selectors.is_empty() || self.selectors.iter().any(|re| re.is_match(name)) {
            return Selection::Required;
        }

        trace!(service = name, "Service rejected: no selector matches");
        Selection::NotSelected
    }

    pub fn evaluate_service(&self, service: &ServiceDescriptor) -> Selection {
        self.evaluate(&service.name, &service.tag_refs())
    }

    pub fn is_required(&self, name: &str, service_tags: &[&str]) -> bool {
        self.evaluate(name, service_tags).is_required()
    }

    pub fn is_required_service(&self, service: &ServiceDescriptor) -> bool {
        self.evaluate_service(service).is_required()
    }
}
