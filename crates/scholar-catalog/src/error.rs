//! Error types for the `scholar-catalog` crate.
//!
//! Every variant except [`CatalogError::PaperNotFound`] and
//! [`CatalogError::UnknownSetReference`] is a load-time failure: content
//! that produces one must never reach a running simulation.

use scholar_types::{GrantKind, PaperId, SetId, TechnologyId};

/// Errors raised while loading, validating or querying research content.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The prerequisite graph contains a cycle.
    ///
    /// The cycle is listed in prerequisite order and closes on its first
    /// element: every paper is a prerequisite of the one after it.
    #[error("cyclic prerequisite dependency: {}", render_cycle(.cycle))]
    CyclicDependency {
        /// Papers forming the cycle.
        cycle: Vec<PaperId>,
    },

    /// A record references a paper that is not in the catalog.
    #[error("{referrer} references unknown paper `{missing}`")]
    UnknownPaperReference {
        /// Human-readable description of the referring record.
        referrer: String,
        /// The unresolved paper id.
        missing: PaperId,
    },

    /// A lookup referenced a research set that is not in the registry.
    #[error("unknown research set `{0}`")]
    UnknownSetReference(SetId),

    /// An unlock rule is malformed.
    #[error("invalid unlock rule for technology `{technology}` in set `{set}`: {reason}")]
    InvalidUnlockRule {
        /// The set owning the rule.
        set: SetId,
        /// The technology the rule unlocks.
        technology: TechnologyId,
        /// What is wrong with the rule.
        reason: String,
    },

    /// A paper id was looked up but does not exist.
    #[error("paper not found: `{0}`")]
    PaperNotFound(PaperId),

    /// Two papers share one id.
    #[error("duplicate paper id: `{0}`")]
    DuplicatePaper(PaperId),

    /// Two research sets share one id.
    #[error("duplicate research set id: `{0}`")]
    DuplicateSet(SetId),

    /// A research set lists the same paper twice.
    #[error("research set `{set}` lists paper `{paper}` more than once")]
    DuplicateSetMember {
        /// The offending set.
        set: SetId,
        /// The repeated paper.
        paper: PaperId,
    },

    /// A grant names a kind but no entity id.
    #[error("{owner} has a {kind} grant without an id")]
    MalformedGrant {
        /// Human-readable description of the record holding the grant.
        owner: String,
        /// The grant kind that was declared.
        kind: GrantKind,
    },

    /// A content file could not be read.
    #[error("failed to read content file {path}: {source}")]
    Io {
        /// The file that failed.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A content file is not valid JSON for its schema.
    #[error("failed to parse {what}: {source}")]
    Json {
        /// Which document failed (`papers`, `research sets`).
        what: &'static str,
        /// The underlying parse error.
        source: serde_json::Error,
    },
}

/// Render a cycle as `a -> b -> a`.
fn render_cycle(cycle: &[PaperId]) -> String {
    cycle
        .iter()
        .map(PaperId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_diagnostic_lists_every_paper() {
        let err = CatalogError::CyclicDependency {
            cycle: vec![
                PaperId::from("a"),
                PaperId::from("b"),
                PaperId::from("a"),
            ],
        };
        assert_eq!(err.to_string(), "cyclic prerequisite dependency: a -> b -> a");
    }

    #[test]
    fn invalid_rule_names_set_and_technology() {
        let err = CatalogError::InvalidUnlockRule {
            set: SetId::from("metallurgy"),
            technology: TechnologyId::from("forge"),
            reason: String::from("papersRequired is 0"),
        };
        let msg = err.to_string();
        assert!(msg.contains("metallurgy"));
        assert!(msg.contains("forge"));
    }
}
