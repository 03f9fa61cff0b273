//! Process start tags
//!
//! A flat description of the selection criteria a process was started with,
//! for diagnostics. Tags carry the same three inputs the selection engine
//! evaluates: allow-list tags, positional selectors and exclusions.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use warren_common::WarrenError;

use crate::keys::{KEY_ARG_EXCLUDE, KEY_ARG_TAGS};
use crate::runtime::Runtime;

const TAG_PREFIX: &str = "t:";
const SELECTOR_PREFIX: &str = "s:";
const EXCLUSION_PREFIX: &str = "x:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProcessStartTag {
    /// Explicit inclusion tag (`t:`)
    Tag(String),
    /// Positional selector pattern (`s:`)
    Selector(String),
    /// Exclusion pattern (`x:`)
    Exclusion(String),
}

impl ProcessStartTag {
    pub fn prefix(&self) -> &'static str {
        match self {
            ProcessStartTag::Tag(_) => TAG_PREFIX,
            ProcessStartTag::Selector(_) => SELECTOR_PREFIX,
            ProcessStartTag::Exclusion(_) => EXCLUSION_PREFIX,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ProcessStartTag::Tag(v) | ProcessStartTag::Selector(v) | ProcessStartTag::Exclusion(v) => {
                v
            }
        }
    }
}

impl Display for ProcessStartTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix(), self.value())
    }
}

impl FromStr for ProcessStartTag {
    type Err = WarrenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(v) = s.strip_prefix(TAG_PREFIX) {
            Ok(ProcessStartTag::Tag(v.to_string()))
        } else if let Some(v) = s.strip_prefix(SELECTOR_PREFIX) {
            Ok(ProcessStartTag::Selector(v.to_string()))
        } else if let Some(v) = s.strip_prefix(EXCLUSION_PREFIX) {
            Ok(ProcessStartTag::Exclusion(v.to_string()))
        } else {
            Err(WarrenError::IllegalArgument(format!(
                "unknown process start tag '{}'",
                s
            )))
        }
    }
}

/// Build the tag list: configured tags, then arguments, then exclusions
pub fn build_process_start_tags(runtime: &Runtime, args: &[String]) -> Vec<ProcessStartTag> {
    let tags = runtime.get_string_slice(KEY_ARG_TAGS);
    let exclusions = runtime.get_string_slice(KEY_ARG_EXCLUDE);

    let mut out = Vec::with_capacity(tags.len() + args.len() + exclusions.len());
    out.extend(tags.into_iter().map(ProcessStartTag::Tag));
    out.extend(args.iter().cloned().map(ProcessStartTag::Selector));
    out.extend(exclusions.into_iter().map(ProcessStartTag::Exclusion));
    out
}
