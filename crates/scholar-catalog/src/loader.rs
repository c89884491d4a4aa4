//! JSON content loading.
//!
//! Content is authored as two JSON documents: an array of papers and an
//! array of research sets. The loader accepts the shapes the content tools
//! emit and normalizes them into the canonical records:
//!
//! - `setId` / `paperId` are accepted in place of `id`.
//! - Grants may be canonical (`{ "type": "building", "id": "forge" }`) or
//!   authored (`{ "type": "building", "buildingId": "forge" }`).
//! - Paper fields the engine does not know (title, text, ...) are gathered
//!   into the opaque `payload` unless an explicit `payload` is present.
//!
//! Loading is all-or-nothing: the parsed records go straight into
//! [`ResearchContent::new`], so any failure leaves nothing behind.

use std::collections::BTreeMap;
use std::path::Path;

use scholar_types::{
    AgeRank, GrantKind, GrantRef, Paper, PaperId, ResearchSet, SetId, TechnologyId, UnlockRule,
};
use serde::Deserialize;

use crate::content::ResearchContent;
use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Authored record shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrantRecord {
    #[serde(rename = "type")]
    kind: GrantKind,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    building_id: Option<String>,
    #[serde(default)]
    ability_id: Option<String>,
    #[serde(default)]
    item_id: Option<String>,
    #[serde(default)]
    spell_id: Option<String>,
    #[serde(default)]
    crop_id: Option<String>,
}

impl GrantRecord {
    fn into_grant(self, owner: impl FnOnce() -> String) -> Result<GrantRef, CatalogError> {
        let specific = match self.kind {
            GrantKind::Building => self.building_id,
            GrantKind::Ability => self.ability_id,
            GrantKind::Item => self.item_id,
            GrantKind::Spell => self.spell_id,
            GrantKind::Crop => self.crop_id,
        };
        match self.id.or(specific) {
            Some(id) if !id.is_empty() => Ok(GrantRef::new(self.kind, id)),
            _ => Err(CatalogError::MalformedGrant {
                owner: owner(),
                kind: self.kind,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaperRecord {
    #[serde(alias = "paperId")]
    id: PaperId,
    #[serde(default)]
    field: String,
    #[serde(default, alias = "prerequisites")]
    prerequisite_papers: Vec<PaperId>,
    #[serde(default)]
    complexity: u8,
    #[serde(default)]
    minimum_age: Option<AgeRank>,
    #[serde(default)]
    minimum_skills: BTreeMap<String, u32>,
    #[serde(default)]
    contributes_to: Vec<GrantRecord>,
    #[serde(default)]
    payload: Option<serde_json::Value>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl PaperRecord {
    fn into_paper(self) -> Result<Paper, CatalogError> {
        let id = self.id;
        let contributes_to = self
            .contributes_to
            .into_iter()
            .map(|grant| grant.into_grant(|| format!("paper `{id}`")))
            .collect::<Result<Vec<_>, _>>()?;
        let payload = match self.payload {
            Some(payload) => payload,
            None if self.extra.is_empty() => serde_json::Value::Null,
            None => serde_json::Value::Object(self.extra),
        };
        Ok(Paper {
            id,
            field: self.field,
            prerequisite_papers: self.prerequisite_papers,
            complexity: self.complexity,
            minimum_age: self.minimum_age,
            minimum_skills: self.minimum_skills,
            contributes_to,
            payload,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleRecord {
    technology_id: TechnologyId,
    papers_required: u32,
    #[serde(default)]
    mandatory_papers: Vec<PaperId>,
    #[serde(default)]
    grants: Vec<GrantRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetRecord {
    #[serde(alias = "setId")]
    id: SetId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    field: String,
    all_papers: Vec<PaperId>,
    #[serde(default)]
    unlocks: Vec<RuleRecord>,
}

impl SetRecord {
    fn into_set(self) -> Result<ResearchSet, CatalogError> {
        let set_id = self.id;
        let mut unlocks = Vec::with_capacity(self.unlocks.len());
        for rule in self.unlocks {
            let technology = rule.technology_id;
            let grants = rule
                .grants
                .into_iter()
                .map(|grant| {
                    grant.into_grant(|| {
                        format!("unlock rule for `{technology}` in research set `{set_id}`")
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            unlocks.push(UnlockRule {
                technology_id: technology,
                papers_required: rule.papers_required,
                mandatory_papers: rule.mandatory_papers,
                grants,
            });
        }
        Ok(ResearchSet {
            id: set_id,
            name: self.name,
            description: self.description,
            field: self.field,
            all_papers: self.all_papers,
            unlocks,
        })
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a JSON array of papers.
///
/// # Errors
///
/// Returns [`CatalogError::Json`] for malformed JSON or
/// [`CatalogError::MalformedGrant`] for a grant without an id.
pub fn parse_papers(json: &str) -> Result<Vec<Paper>, CatalogError> {
    let records: Vec<PaperRecord> =
        serde_json::from_str(json).map_err(|source| CatalogError::Json {
            what: "papers",
            source,
        })?;
    records.into_iter().map(PaperRecord::into_paper).collect()
}

/// Parse a JSON array of research sets.
///
/// # Errors
///
/// Returns [`CatalogError::Json`] for malformed JSON or
/// [`CatalogError::MalformedGrant`] for a grant without an id.
pub fn parse_sets(json: &str) -> Result<Vec<ResearchSet>, CatalogError> {
    let records: Vec<SetRecord> =
        serde_json::from_str(json).map_err(|source| CatalogError::Json {
            what: "research sets",
            source,
        })?;
    records.into_iter().map(SetRecord::into_set).collect()
}

/// Parse and validate both content documents.
///
/// # Errors
///
/// Returns any parse or validation [`CatalogError`].
pub fn parse_content(papers_json: &str, sets_json: &str) -> Result<ResearchContent, CatalogError> {
    let papers = parse_papers(papers_json)?;
    let sets = parse_sets(sets_json)?;
    ResearchContent::new(papers, sets)
}

/// Read, parse and validate both content documents from disk.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if a file cannot be read, or any parse or
/// validation [`CatalogError`].
pub fn load_content_from_files(
    papers_path: &Path,
    sets_path: &Path,
) -> Result<ResearchContent, CatalogError> {
    let papers_json = read_file(papers_path)?;
    let sets_json = read_file(sets_path)?;
    parse_content(&papers_json, &sets_json)
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const PAPERS: &str = r#"[
        { "paperId": "smelting", "field": "metallurgy", "title": "On Smelting", "complexity": 2 },
        { "id": "casting", "prerequisitePapers": ["smelting"], "minimumAge": "adult",
          "minimumSkills": { "crafting": 3 },
          "contributesTo": [{ "type": "item", "itemId": "bronze_ingot" }] }
    ]"#;

    const SETS: &str = r#"[
        {
            "setId": "metallurgy_basics",
            "name": "Metallurgy Basics",
            "field": "metallurgy",
            "allPapers": ["smelting", "casting"],
            "unlocks": [
                {
                    "technologyId": "forge",
                    "papersRequired": 1,
                    "mandatoryPapers": ["smelting"],
                    "grants": [
                        { "type": "building", "buildingId": "forge" },
                        { "type": "ability", "id": "smithing" }
                    ]
                }
            ]
        }
    ]"#;

    #[test]
    fn authored_shapes_are_normalized() {
        let content = parse_content(PAPERS, SETS).unwrap();
        let set = content.registry().set("metallurgy_basics").unwrap();
        assert_eq!(set.name, "Metallurgy Basics");
        let grants = &set.unlocks[0].grants;
        assert_eq!(grants[0], GrantRef::new(GrantKind::Building, "forge"));
        assert_eq!(grants[1], GrantRef::new(GrantKind::Ability, "smithing"));

        let casting = content.catalog().get("casting").unwrap();
        assert_eq!(casting.minimum_age, Some(AgeRank::Adult));
        assert_eq!(casting.minimum_skills.get("crafting"), Some(&3));
        assert_eq!(casting.contributes_to[0].id, "bronze_ingot");
    }

    #[test]
    fn unknown_paper_fields_become_payload() {
        let papers = parse_papers(PAPERS).unwrap();
        assert_eq!(papers[0].payload["title"], "On Smelting");
        assert!(papers[1].payload.is_null());
    }

    #[test]
    fn explicit_payload_wins() {
        let papers =
            parse_papers(r#"[{ "id": "a", "title": "ignored", "payload": { "text": "kept" } }]"#)
                .unwrap();
        assert_eq!(papers[0].payload["text"], "kept");
        assert!(papers[0].payload.get("title").is_none());
    }

    #[test]
    fn grant_without_id_is_malformed() {
        let sets = r#"[{ "id": "s", "allPapers": ["a"], "unlocks": [
            { "technologyId": "t", "papersRequired": 1, "grants": [{ "type": "spell" }] }
        ] }]"#;
        let err = parse_sets(sets).unwrap_err();
        match err {
            CatalogError::MalformedGrant { owner, kind } => {
                assert_eq!(kind, GrantKind::Spell);
                assert!(owner.contains("`t`"));
            }
            other => panic!("expected malformed grant, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_names_the_document() {
        let err = parse_sets("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse research sets"));
    }

    #[test]
    fn files_are_loaded_from_disk() {
        let dir = std::env::temp_dir().join(format!("scholar-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let papers_path = dir.join("papers.json");
        let sets_path = dir.join("research-sets.json");
        std::fs::write(&papers_path, PAPERS).unwrap();
        std::fs::write(&sets_path, SETS).unwrap();

        let content = load_content_from_files(&papers_path, &sets_path).unwrap();
        assert_eq!(content.catalog().len(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let missing = std::env::temp_dir().join("scholar-definitely-missing.json");
        let err = load_content_from_files(&missing, &missing).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
