//! Errors - failures raised while evaluating a status query.
//!
//! None of these ever escape the report assembler: each one is turned into an
//! inline fragment for the query item that produced it.

use thiserror::Error;

use super::query::TargetKind;

/// Failure reported by a `StatusProvider` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("status provider unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// A query item is missing a required section (selector or facet list).
    #[error("malformed status request '{item}': {reason}")]
    MalformedQuery { item: String, reason: String },

    #[error("unknown target kind '{0}'")]
    UnknownTargetKind(String),

    /// A specific id was requested but the provider has no such record.
    #[error("no {kind} with key {id}")]
    NotFound { kind: TargetKind, id: String },

    #[error("'{facet}' is not a valid request for {}", .kind.plural())]
    UnsupportedFacet { kind: TargetKind, facet: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_converts_transparently() {
        let err: StatusError = ProviderError::Other("boom".to_string()).into();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn not_found_names_kind_and_id() {
        let err = StatusError::NotFound {
            kind: TargetKind::Connection,
            id: "C9".to_string(),
        };
        assert_eq!(err.to_string(), "no connection with key C9");
    }

    #[test]
    fn unsupported_facet_uses_plural_kind() {
        let err = StatusError::UnsupportedFacet {
            kind: TargetKind::ReportingTask,
            facet: "stats".to_string(),
        };
        assert_eq!(err.to_string(), "'stats' is not a valid request for reporting tasks");
    }
}
