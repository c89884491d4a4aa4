//! Error types for the `scholar-engine` crate.
//!
//! Query paths never fail: unknown ids resolve to `false`, `0.0` or empty
//! results. Errors here cover engine construction, event routing and
//! snapshot encoding.

use scholar_catalog::CatalogError;
use scholar_types::ContextId;

/// Errors raised by the progression engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Research content or a reference into it failed validation.
    #[error("invalid research content: {0}")]
    Catalog(#[from] CatalogError),

    /// A completion event was applied to a context it does not belong to.
    #[error("event for context {found} applied to context {expected}")]
    ContextMismatch {
        /// The context the event was applied to.
        expected: ContextId,
        /// The context named by the event.
        found: ContextId,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot serialization failed: {source}")]
    Snapshot {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_keep_their_diagnostic() {
        let err = EngineError::from(CatalogError::UnknownPaperReference {
            referrer: String::from("starting papers"),
            missing: scholar_types::PaperId::from("zz"),
        });
        assert_eq!(
            err.to_string(),
            "invalid research content: starting papers references unknown paper `zz`"
        );
    }
}
