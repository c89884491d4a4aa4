//! Serializable context state for external save systems.
//!
//! A snapshot carries the completion log plus the unlocked and granted
//! technology sets. Tallies and the frontier are not stored; restoring
//! rebuilds them from the log against whatever content is loaded, which
//! is what lets a save survive a content patch.

use std::collections::BTreeSet;

use scholar_types::{ContextId, PaperId, TechnologyId};
use serde::{Deserialize, Serialize};

use crate::context::ResearchContext;
use crate::error::EngineError;
use crate::gate::ResearcherProfile;

/// Persisted state of one [`ResearchContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// The context's identifier.
    pub context_id: ContextId,
    /// The researcher profile, if the host attached one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ResearcherProfile>,
    /// Completed papers in completion order.
    pub completed_papers: Vec<PaperId>,
    /// Technologies recorded as unlocked.
    #[serde(default)]
    pub unlocked_technologies: BTreeSet<TechnologyId>,
    /// Technologies whose grants were already emitted.
    #[serde(default)]
    pub granted_technologies: BTreeSet<TechnologyId>,
}

impl ContextSnapshot {
    /// Capture the persistent state of `context`.
    pub fn capture(context: &ResearchContext) -> Self {
        Self {
            context_id: context.id(),
            profile: context.profile().cloned(),
            completed_papers: context.completion_log().to_vec(),
            unlocked_technologies: context.unlocked().clone(),
            granted_technologies: context.granted_technologies().clone(),
        }
    }

    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Snapshot`] if serialization fails.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Snapshot`] if the JSON does not describe a
    /// snapshot.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use scholar_types::AgeRank;

    use super::*;

    #[test]
    fn capture_keeps_completion_order() {
        let mut context = ResearchContext::empty(ContextId::new());
        context.record_paper(&PaperId::from("wheel"));
        context.record_paper(&PaperId::from("axle"));
        context.mark_unlocked(&TechnologyId::from("cart"));
        context.mark_granted(&TechnologyId::from("cart"));
        context.set_profile(Some(ResearcherProfile::new(AgeRank::Adult)));

        let snapshot = ContextSnapshot::capture(&context);
        assert_eq!(
            snapshot.completed_papers,
            vec![PaperId::from("wheel"), PaperId::from("axle")]
        );
        assert!(snapshot.granted_technologies.contains("cart"));
        assert_eq!(snapshot.profile.map(|p| p.age), Some(AgeRank::Adult));
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let json = r#"{
            "context_id": "0191e0b4-8f3a-7c1e-9d2b-5a6f7e8d9c0b",
            "completed_papers": ["fire"]
        }"#;
        let snapshot = ContextSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.completed_papers, vec![PaperId::from("fire")]);
        assert!(snapshot.unlocked_technologies.is_empty());
        assert!(snapshot.profile.is_none());
    }

    #[test]
    fn garbage_is_a_snapshot_error() {
        let err = ContextSnapshot::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, EngineError::Snapshot { .. }));
    }
}
