//! Research content records: papers, sets, unlock rules and grants.
//!
//! These are the immutable records handed to the engine at load time. The
//! serialized field names follow the authored content (`camelCase`) so the
//! game UI reads the same shapes the content tools write.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AgeRank, GrantKind};
use crate::ids::{PaperId, SetId, TechnologyId};

// ---------------------------------------------------------------------------
// GrantRef
// ---------------------------------------------------------------------------

/// A declarative reference to a game entity made available by research.
///
/// The engine never instantiates the entity; the host simulation does that
/// when it receives an unlock event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GrantRef {
    /// What kind of entity is granted.
    #[serde(rename = "type")]
    pub kind: GrantKind,
    /// Identifier of the granted entity within its kind.
    pub id: String,
}

impl GrantRef {
    /// Create a grant reference.
    pub fn new(kind: GrantKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl core::fmt::Display for GrantRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// ---------------------------------------------------------------------------
// Paper
// ---------------------------------------------------------------------------

/// A unit of research.
///
/// Papers form a directed acyclic graph through `prerequisite_papers`.
/// Only the prerequisites and the age/skill minimums take part in
/// evaluation; `field`, `complexity` and `payload` are passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Paper {
    /// Stable identifier.
    pub id: PaperId,
    /// Topical classification tag.
    #[serde(default)]
    pub field: String,
    /// Papers that must be completed before this one is researchable.
    #[serde(default)]
    pub prerequisite_papers: Vec<PaperId>,
    /// Ordinal difficulty, used for pacing by the host.
    #[serde(default)]
    pub complexity: u8,
    /// Youngest life stage allowed to research this paper.
    #[serde(default)]
    pub minimum_age: Option<AgeRank>,
    /// Minimum skill levels, keyed by skill name.
    #[serde(default)]
    pub minimum_skills: BTreeMap<String, u32>,
    /// Grants appended to technologies that list this paper as mandatory.
    #[serde(default)]
    pub contributes_to: Vec<GrantRef>,
    /// Opaque descriptive content (title, narrative text).
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Paper {
    /// Create a paper with no gating, contributions or payload.
    pub fn new(id: impl Into<PaperId>, prerequisites: &[&str]) -> Self {
        Self {
            id: id.into(),
            field: String::new(),
            prerequisite_papers: prerequisites.iter().map(|p| PaperId::from(*p)).collect(),
            complexity: 0,
            minimum_age: None,
            minimum_skills: BTreeMap::new(),
            contributes_to: Vec::new(),
            payload: serde_json::Value::Null,
        }
    }

    /// Whether the paper carries any age or skill requirement.
    pub fn is_gated(&self) -> bool {
        self.minimum_age.is_some() || !self.minimum_skills.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Research sets and unlock rules
// ---------------------------------------------------------------------------

/// An N-of-M (plus mandatory papers) rule unlocking one technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UnlockRule {
    /// The technology this rule unlocks.
    pub technology_id: TechnologyId,
    /// How many of the owning set's papers must be completed.
    pub papers_required: u32,
    /// Papers that must be completed regardless of the count.
    #[serde(default)]
    pub mandatory_papers: Vec<PaperId>,
    /// Entities made available when the technology unlocks.
    #[serde(default)]
    pub grants: Vec<GrantRef>,
}

/// A named group of papers sharing one or more unlock rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ResearchSet {
    /// Stable identifier.
    pub id: SetId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Flavor description.
    #[serde(default)]
    pub description: String,
    /// Topical classification tag.
    #[serde(default)]
    pub field: String,
    /// Exactly the papers that count toward this set's thresholds.
    pub all_papers: Vec<PaperId>,
    /// Technology unlock rules owned by this set.
    #[serde(default)]
    pub unlocks: Vec<UnlockRule>,
}

impl ResearchSet {
    /// Number of papers in the set (M), saturating at `u32::MAX`.
    pub fn size(&self) -> u32 {
        u32::try_from(self.all_papers.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn grant_ref_uses_type_tag() {
        let grant = GrantRef::new(GrantKind::Building, "forge");
        let json = serde_json::to_value(&grant).unwrap();
        assert_eq!(json["type"], "building");
        assert_eq!(json["id"], "forge");
    }

    #[test]
    fn paper_defaults_fill_optional_fields() {
        let paper: Paper = serde_json::from_str(r#"{ "id": "smelting" }"#).unwrap();
        assert!(paper.prerequisite_papers.is_empty());
        assert!(!paper.is_gated());
        assert!(paper.payload.is_null());
    }

    #[test]
    fn research_set_reads_camel_case() {
        let json = r#"{
            "id": "metallurgy",
            "allPapers": ["smelting", "casting"],
            "unlocks": [{ "technologyId": "forge", "papersRequired": 1 }]
        }"#;
        let set: ResearchSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.size(), 2);
        assert_eq!(set.unlocks[0].technology_id.as_str(), "forge");
        assert!(set.unlocks[0].mandatory_papers.is_empty());
    }

    #[test]
    fn gated_paper_is_detected() {
        let mut paper = Paper::new("alchemy", &[]);
        paper.minimum_age = Some(AgeRank::Adult);
        assert!(paper.is_gated());
    }
}
