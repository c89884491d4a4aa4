//! The research set registry and its unlock-rule indices.
//!
//! Sets are stored in authored order and every unlock rule gets a stable
//! slot number (set order, then rule order within the set). Runtime state
//! keeps one counter per set and one per rule slot, so these indices are
//! what make completion updates constant-time per affected set or rule:
//!
//! - technology id to the rule slots that unlock it (a technology may be
//!   reachable through several independent sets),
//! - paper id to the sets whose `all_papers` contain it,
//! - paper id to the rule slots that list it as mandatory.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use scholar_types::{PaperId, ResearchSet, SetId, TechnologyId, UnlockRule};

use crate::catalog::PaperCatalog;
use crate::error::CatalogError;

/// Position of one unlock rule inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleSlot {
    /// Index of the owning set in [`ResearchRegistry::sets`].
    pub set: usize,
    /// Index of the rule in that set's `unlocks`.
    pub rule: usize,
}

/// The validated, immutable collection of research sets.
#[derive(Debug, Clone)]
pub struct ResearchRegistry {
    sets: Vec<ResearchSet>,
    set_index: BTreeMap<SetId, usize>,
    slots: Vec<RuleSlot>,
    set_slots: Vec<Range<usize>>,
    by_technology: BTreeMap<TechnologyId, Vec<usize>>,
    sets_by_paper: BTreeMap<PaperId, Vec<usize>>,
    mandatory_by_paper: BTreeMap<PaperId, Vec<usize>>,
}

impl ResearchRegistry {
    /// Build a registry and cross-check it against the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; see [`Self::validate`].
    pub fn new(sets: Vec<ResearchSet>, catalog: &PaperCatalog) -> Result<Self, CatalogError> {
        let mut set_index = BTreeMap::new();
        for (index, set) in sets.iter().enumerate() {
            if set_index.insert(set.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateSet(set.id.clone()));
            }
        }

        let mut registry = Self {
            sets,
            set_index,
            slots: Vec::new(),
            set_slots: Vec::new(),
            by_technology: BTreeMap::new(),
            sets_by_paper: BTreeMap::new(),
            mandatory_by_paper: BTreeMap::new(),
        };
        registry.validate(catalog)?;
        registry.build_indices();
        Ok(registry)
    }

    /// Cross-check every set against the catalog.
    ///
    /// - every `all_papers` and `mandatory_papers` id exists in the catalog,
    /// - no set lists a paper twice,
    /// - `1 <= papers_required <= |all_papers|`,
    /// - every mandatory paper is a member of the rule's own set, once.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownPaperReference`],
    /// [`CatalogError::DuplicateSetMember`] or
    /// [`CatalogError::InvalidUnlockRule`] naming the offending record.
    pub fn validate(&self, catalog: &PaperCatalog) -> Result<(), CatalogError> {
        for set in &self.sets {
            let mut members: BTreeSet<&str> = BTreeSet::new();
            for paper in &set.all_papers {
                if !catalog.contains(paper.as_str()) {
                    return Err(CatalogError::UnknownPaperReference {
                        referrer: format!("research set `{}`", set.id),
                        missing: paper.clone(),
                    });
                }
                if !members.insert(paper.as_str()) {
                    return Err(CatalogError::DuplicateSetMember {
                        set: set.id.clone(),
                        paper: paper.clone(),
                    });
                }
            }

            for rule in &set.unlocks {
                validate_rule(set, rule, &members, catalog)?;
            }
        }
        Ok(())
    }

    fn build_indices(&mut self) {
        for (set_pos, set) in self.sets.iter().enumerate() {
            for paper in &set.all_papers {
                self.sets_by_paper
                    .entry(paper.clone())
                    .or_default()
                    .push(set_pos);
            }
            let first_slot = self.slots.len();
            for (rule_pos, rule) in set.unlocks.iter().enumerate() {
                let slot = self.slots.len();
                self.slots.push(RuleSlot {
                    set: set_pos,
                    rule: rule_pos,
                });
                self.by_technology
                    .entry(rule.technology_id.clone())
                    .or_default()
                    .push(slot);
                for paper in &rule.mandatory_papers {
                    self.mandatory_by_paper
                        .entry(paper.clone())
                        .or_default()
                        .push(slot);
                }
            }
            self.set_slots.push(first_slot..self.slots.len());
        }
    }

    /// All sets in authored order.
    pub fn sets(&self) -> &[ResearchSet] {
        &self.sets
    }

    /// Look up a set by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSetReference`] if the id is unknown.
    pub fn set(&self, id: &str) -> Result<&ResearchSet, CatalogError> {
        self.set_index(id)
            .and_then(|index| self.sets.get(index))
            .ok_or_else(|| CatalogError::UnknownSetReference(SetId::from(id)))
    }

    /// Position of a set in [`Self::sets`].
    pub fn set_index(&self, id: &str) -> Option<usize> {
        self.set_index.get(id).copied()
    }

    /// Number of unlock rules across all sets.
    pub fn rule_count(&self) -> usize {
        self.slots.len()
    }

    /// Resolve a rule slot number to its set and rule.
    pub fn rule_at(&self, slot: usize) -> Option<(&ResearchSet, &UnlockRule)> {
        let RuleSlot { set, rule } = *self.slots.get(slot)?;
        let owner = self.sets.get(set)?;
        owner.unlocks.get(rule).map(|found| (owner, found))
    }

    /// The slot record for a rule slot number.
    pub fn slot(&self, slot: usize) -> Option<RuleSlot> {
        self.slots.get(slot).copied()
    }

    /// Slot numbers of the rules owned by the set at `set`.
    ///
    /// Rules of one set occupy a contiguous run of slots. Out-of-range
    /// indices yield an empty range.
    pub fn rule_slots_of_set(&self, set: usize) -> Range<usize> {
        self.set_slots.get(set).cloned().unwrap_or(0..0)
    }

    /// Every rule, across all sets, that unlocks `technology`.
    pub fn rules_for_technology(&self, technology: &str) -> Vec<(&ResearchSet, &UnlockRule)> {
        self.rule_slots_for_technology(technology)
            .iter()
            .filter_map(|&slot| self.rule_at(slot))
            .collect()
    }

    /// Slot numbers of every rule that unlocks `technology`, in slot order.
    pub fn rule_slots_for_technology(&self, technology: &str) -> &[usize] {
        self.by_technology.get(technology).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices of the sets whose `all_papers` contain `paper`.
    pub fn sets_containing(&self, paper: &str) -> &[usize] {
        self.sets_by_paper.get(paper).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Slot numbers of the rules that list `paper` as mandatory.
    pub fn rules_mandating(&self, paper: &str) -> &[usize] {
        self.mandatory_by_paper.get(paper).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any rule unlocks `technology`.
    pub fn contains_technology(&self, technology: &str) -> bool {
        self.by_technology.contains_key(technology)
    }

    /// Every technology id reachable through at least one rule, in id order.
    pub fn technologies(&self) -> impl Iterator<Item = &TechnologyId> {
        self.by_technology.keys()
    }
}

/// Check one rule against its owning set.
fn validate_rule(
    set: &ResearchSet,
    rule: &UnlockRule,
    members: &BTreeSet<&str>,
    catalog: &PaperCatalog,
) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidUnlockRule {
        set: set.id.clone(),
        technology: rule.technology_id.clone(),
        reason,
    };

    let size = set.size();
    if rule.papers_required == 0 || rule.papers_required > size {
        return Err(invalid(format!(
            "papersRequired is {} but must be between 1 and {size}",
            rule.papers_required
        )));
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for paper in &rule.mandatory_papers {
        if !catalog.contains(paper.as_str()) {
            return Err(CatalogError::UnknownPaperReference {
                referrer: format!(
                    "unlock rule for `{}` in research set `{}`",
                    rule.technology_id, set.id
                ),
                missing: paper.clone(),
            });
        }
        if !members.contains(paper.as_str()) {
            return Err(invalid(format!(
                "mandatory paper `{paper}` is not a member of the set"
            )));
        }
        if !seen.insert(paper.as_str()) {
            return Err(invalid(format!("mandatory paper `{paper}` is listed twice")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use scholar_types::Paper;

    use super::*;

    fn catalog(ids: &[&str]) -> PaperCatalog {
        PaperCatalog::new(ids.iter().map(|id| Paper::new(*id, &[])).collect()).unwrap()
    }

    fn rule(tech: &str, required: u32, mandatory: &[&str]) -> UnlockRule {
        UnlockRule {
            technology_id: TechnologyId::from(tech),
            papers_required: required,
            mandatory_papers: mandatory.iter().map(|p| PaperId::from(*p)).collect(),
            grants: Vec::new(),
        }
    }

    fn set(id: &str, papers: &[&str], unlocks: Vec<UnlockRule>) -> ResearchSet {
        ResearchSet {
            id: SetId::from(id),
            name: String::new(),
            description: String::new(),
            field: String::new(),
            all_papers: papers.iter().map(|p| PaperId::from(*p)).collect(),
            unlocks,
        }
    }

    #[test]
    fn technology_reachable_from_two_sets() {
        let cat = catalog(&["a", "b", "c", "d"]);
        let registry = ResearchRegistry::new(
            vec![
                set("construction", &["a", "b"], vec![rule("forge", 2, &[])]),
                set("engineering", &["c", "d"], vec![rule("forge", 1, &["d"])]),
            ],
            &cat,
        )
        .unwrap();

        let rules = registry.rules_for_technology("forge");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].0.id.as_str(), "construction");
        assert_eq!(rules[1].0.id.as_str(), "engineering");
        assert!(registry.rules_for_technology("loom").is_empty());
    }

    #[test]
    fn paper_indices_cover_every_membership() {
        let cat = catalog(&["a", "b", "c"]);
        let registry = ResearchRegistry::new(
            vec![
                set("s1", &["a", "b"], vec![rule("t1", 1, &["a"])]),
                set("s2", &["a", "c"], vec![rule("t2", 2, &["a"]), rule("t3", 1, &[])]),
            ],
            &cat,
        )
        .unwrap();

        assert_eq!(registry.sets_containing("a"), &[0, 1]);
        assert_eq!(registry.sets_containing("c"), &[1]);
        assert_eq!(registry.rules_mandating("a"), &[0, 1]);
        assert!(registry.rules_mandating("b").is_empty());
        assert_eq!(registry.rule_count(), 3);
        assert_eq!(registry.slot(2), Some(RuleSlot { set: 1, rule: 1 }));
        assert_eq!(registry.rule_slots_of_set(0), 0..1);
        assert_eq!(registry.rule_slots_of_set(1), 1..3);
        assert!(registry.rule_slots_of_set(9).is_empty());
    }

    #[test]
    fn zero_threshold_is_invalid() {
        let cat = catalog(&["a"]);
        let err = ResearchRegistry::new(vec![set("s", &["a"], vec![rule("t", 0, &[])])], &cat)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUnlockRule { .. }));
    }

    #[test]
    fn threshold_above_set_size_is_invalid() {
        let cat = catalog(&["a", "b"]);
        let err = ResearchRegistry::new(vec![set("s", &["a", "b"], vec![rule("t", 3, &[])])], &cat)
            .unwrap_err();
        match err {
            CatalogError::InvalidUnlockRule { set, technology, reason } => {
                assert_eq!(set.as_str(), "s");
                assert_eq!(technology.as_str(), "t");
                assert!(reason.contains("between 1 and 2"));
            }
            other => panic!("expected invalid rule, got {other:?}"),
        }
    }

    #[test]
    fn mandatory_outside_set_is_invalid() {
        let cat = catalog(&["a", "b"]);
        let err = ResearchRegistry::new(vec![set("s", &["a"], vec![rule("t", 1, &["b"])])], &cat)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUnlockRule { .. }));
    }

    #[test]
    fn unknown_mandatory_paper_is_unknown_reference() {
        let cat = catalog(&["a"]);
        let err = ResearchRegistry::new(vec![set("s", &["a"], vec![rule("t", 1, &["ghost"])])], &cat)
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPaperReference { .. }));
    }

    #[test]
    fn unknown_member_paper_is_unknown_reference() {
        let cat = catalog(&["a"]);
        let err = ResearchRegistry::new(vec![set("s", &["a", "ghost"], vec![])], &cat).unwrap_err();
        match err {
            CatalogError::UnknownPaperReference { referrer, missing } => {
                assert_eq!(referrer, "research set `s`");
                assert_eq!(missing.as_str(), "ghost");
            }
            other => panic!("expected unknown reference, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_member_is_rejected() {
        let cat = catalog(&["a"]);
        let err = ResearchRegistry::new(vec![set("s", &["a", "a"], vec![])], &cat).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSetMember { .. }));
    }

    #[test]
    fn duplicate_set_id_is_rejected() {
        let cat = catalog(&["a"]);
        let err = ResearchRegistry::new(
            vec![set("s", &["a"], vec![]), set("s", &["a"], vec![])],
            &cat,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSet(_)));
    }

    #[test]
    fn unknown_set_lookup_fails() {
        let cat = catalog(&["a"]);
        let registry = ResearchRegistry::new(vec![set("s", &["a"], vec![])], &cat).unwrap();
        assert!(registry.set("s").is_ok());
        assert!(matches!(
            registry.set("nope"),
            Err(CatalogError::UnknownSetReference(_))
        ));
    }
}
