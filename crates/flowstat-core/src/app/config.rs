//! ReporterConfig - tunables for the status reporter.
//!
//! # Sources
//! - `Default` for library callers
//! - JSON file and command-line flags in the CLI (flags win)

use serde::{Deserialize, Serialize};

/// Default bulletin timestamp layout, e.g. `Mon May 23 16:00:45 UTC 2016`.
pub const DEFAULT_BULLETIN_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// What to do with a query item whose target kind is not recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKindPolicy {
    /// Drop the item: no block, no separator.
    #[default]
    Skip,

    /// Emit a diagnostic block so every item sent gets a block back.
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    pub unknown_kinds: UnknownKindPolicy,

    /// `chrono` strftime layout used for bulletin timestamps.
    pub bulletin_timestamp_format: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            unknown_kinds: UnknownKindPolicy::Skip,
            bulletin_timestamp_format: DEFAULT_BULLETIN_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl ReporterConfig {
    pub fn with_unknown_kinds(mut self, policy: UnknownKindPolicy) -> Self {
        self.unknown_kinds = policy;
        self
    }

    pub fn with_bulletin_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.bulletin_timestamp_format = format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lenient() {
        let c = ReporterConfig::default();
        assert_eq!(c.unknown_kinds, UnknownKindPolicy::Skip);
        assert_eq!(c.bulletin_timestamp_format, DEFAULT_BULLETIN_TIMESTAMP_FORMAT);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: ReporterConfig = serde_json::from_str(r#"{ "unknown_kinds": "report" }"#).unwrap();
        assert_eq!(c.unknown_kinds, UnknownKindPolicy::Report);
        assert_eq!(c.bulletin_timestamp_format, DEFAULT_BULLETIN_TIMESTAMP_FORMAT);
    }
}
