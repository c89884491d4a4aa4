//! Enumeration types for research content.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Age gating
// ---------------------------------------------------------------------------

/// Life stage of a researcher, used as an ordinal gate on papers.
///
/// Variants are declared youngest first so the derived ordering matches
/// the comparison "is at least this old".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AgeRank {
    /// Youngest researchers; only introductory papers.
    Child,
    /// Adolescent researchers.
    Teen,
    /// Fully grown researchers.
    Adult,
    /// Senior researchers.
    Elder,
}

// ---------------------------------------------------------------------------
// Grants
// ---------------------------------------------------------------------------

/// The kind of game entity a grant makes available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum GrantKind {
    /// A constructible building.
    Building,
    /// A researcher or unit ability.
    Ability,
    /// A craftable or usable item.
    Item,
    /// A castable spell.
    Spell,
    /// A plantable crop.
    Crop,
}

impl GrantKind {
    /// Every grant kind, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Building,
        Self::Ability,
        Self::Item,
        Self::Spell,
        Self::Crop,
    ];

    /// The lowercase tag used in authored content (`"building"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Ability => "ability",
            Self::Item => "item",
            Self::Spell => "spell",
            Self::Crop => "crop",
        }
    }

    /// The kind-specific id field used by authored content
    /// (`{ "type": "building", "buildingId": "forge" }`).
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::Building => "buildingId",
            Self::Ability => "abilityId",
            Self::Item => "itemId",
            Self::Spell => "spellId",
            Self::Crop => "cropId",
        }
    }
}

impl core::fmt::Display for GrantKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn age_ranks_are_ordered_youngest_first() {
        assert!(AgeRank::Child < AgeRank::Teen);
        assert!(AgeRank::Teen < AgeRank::Adult);
        assert!(AgeRank::Adult < AgeRank::Elder);
    }

    #[test]
    fn grant_kind_tags_serialize_lowercase() {
        for kind in GrantKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn id_fields_follow_authoring_convention() {
        assert_eq!(GrantKind::Crop.id_field(), "cropId");
        assert_eq!(GrantKind::Spell.id_field(), "spellId");
    }
}
