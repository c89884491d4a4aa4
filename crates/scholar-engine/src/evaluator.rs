//! Technology satisfaction and progress.
//!
//! A rule is satisfied when its set's completed-paper tally reaches
//! `papers_required` and every one of its mandatory papers is present. A
//! technology is unlocked when any rule naming it is satisfied, or when
//! the context already recorded it as unlocked. Both tallies live on the
//! context and are bumped once per completion, so no query intersects
//! paper sets.

use std::collections::BTreeSet;

use scholar_catalog::ResearchRegistry;
use scholar_types::{PaperId, TechnologyId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ResearchContext;

/// Completed-paper count for one research set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProgress {
    /// Papers of the set the context has completed.
    pub completed: u32,
    /// Papers in the set.
    pub total: u32,
}

impl SetProgress {
    /// `completed / total`, or `0.0` for an empty set.
    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.completed.min(self.total)) / f64::from(self.total)
    }
}

/// Evaluates unlock rules against context tallies.
#[derive(Debug, Clone, Copy)]
pub struct UnlockEvaluator<'a> {
    registry: &'a ResearchRegistry,
}

impl<'a> UnlockEvaluator<'a> {
    /// An evaluator over `registry`.
    pub const fn new(registry: &'a ResearchRegistry) -> Self {
        Self { registry }
    }

    /// Bump the tallies touched by `paper`.
    ///
    /// Must run exactly once per newly completed paper.
    pub(crate) fn count_completion(&self, context: &mut ResearchContext, paper: &str) {
        for &set in self.registry.sets_containing(paper) {
            context.bump_set(set);
        }
        for &slot in self.registry.rules_mandating(paper) {
            context.bump_mandatory(slot);
        }
    }

    /// Count `paper` and return the technologies it newly unlocked, in
    /// rule slot order.
    ///
    /// Only rules of sets containing `paper` can change state, since a
    /// mandatory paper is always a member of its rule's set.
    pub(crate) fn record_completion(
        &self,
        context: &mut ResearchContext,
        paper: &str,
    ) -> Vec<TechnologyId> {
        self.count_completion(context, paper);
        let registry = self.registry;
        let slots = registry
            .sets_containing(paper)
            .iter()
            .flat_map(|&set| registry.rule_slots_of_set(set));
        self.unlock_satisfied(context, slots)
    }

    /// Record every satisfied rule's technology as unlocked and return the
    /// ones that were not unlocked before, in rule slot order.
    pub(crate) fn refresh(&self, context: &mut ResearchContext) -> Vec<TechnologyId> {
        self.unlock_satisfied(context, 0..self.registry.rule_count())
    }

    fn unlock_satisfied(
        &self,
        context: &mut ResearchContext,
        slots: impl Iterator<Item = usize>,
    ) -> Vec<TechnologyId> {
        let mut newly_unlocked = Vec::new();
        for slot in slots {
            if !self.rule_satisfied(slot, context) {
                continue;
            }
            let Some((_, rule)) = self.registry.rule_at(slot) else {
                continue;
            };
            if context.mark_unlocked(&rule.technology_id) {
                newly_unlocked.push(rule.technology_id.clone());
            }
        }
        newly_unlocked
    }

    /// Whether the rule at `slot` is satisfied by `context`.
    pub fn rule_satisfied(&self, slot: usize, context: &ResearchContext) -> bool {
        let (Some(position), Some((_, rule))) =
            (self.registry.slot(slot), self.registry.rule_at(slot))
        else {
            return false;
        };
        let mandatory = u32::try_from(rule.mandatory_papers.len()).unwrap_or(u32::MAX);
        context.set_tally(position.set) >= rule.papers_required
            && context.mandatory_tally(slot) >= mandatory
    }

    /// Whether `technology` is unlocked for `context`.
    ///
    /// True if any rule naming it is satisfied. A technology the context
    /// already recorded stays unlocked even if no rule is satisfied any
    /// more. Unknown ids are never unlocked.
    pub fn is_technology_unlocked(&self, technology: &str, context: &ResearchContext) -> bool {
        if context.is_unlocked(technology) {
            return true;
        }
        let slots = self.registry.rule_slots_for_technology(technology);
        if slots.is_empty() {
            debug!(technology, "Unlock query for unknown technology");
            return false;
        }
        slots
            .iter()
            .any(|&slot| self.rule_satisfied(slot, context))
    }

    /// Raw count progress toward `technology`, in `[0, 1]`.
    ///
    /// The best `min(count, required) / required` across the technology's
    /// rules. Mandatory papers are ignored here, so a rule blocked only on
    /// a mandatory paper reports `1.0`. Unknown ids report `0.0`.
    pub fn technology_progress(&self, technology: &str, context: &ResearchContext) -> f64 {
        let slots = self.registry.rule_slots_for_technology(technology);
        if slots.is_empty() {
            debug!(technology, "Progress query for unknown technology");
            return 0.0;
        }
        slots
            .iter()
            .filter_map(|&slot| {
                let position = self.registry.slot(slot)?;
                let (_, rule) = self.registry.rule_at(slot)?;
                let required = rule.papers_required.max(1);
                let counted = context.set_tally(position.set).min(required);
                Some(f64::from(counted) / f64::from(required))
            })
            .fold(0.0_f64, f64::max)
            .clamp(0.0, 1.0)
    }

    /// Every unlocked technology, deduplicated, in id order.
    pub fn unlocked_technologies(&self, context: &ResearchContext) -> Vec<TechnologyId> {
        let mut unlocked: BTreeSet<&TechnologyId> = context.unlocked().iter().collect();
        unlocked.extend(
            self.registry
                .technologies()
                .filter(|technology| self.is_technology_unlocked(technology.as_str(), context)),
        );
        unlocked.into_iter().cloned().collect()
    }

    /// Mandatory papers still missing across the rules of `technology`,
    /// deduplicated, in rule slot order.
    ///
    /// Empty for unknown or already unlocked technologies.
    pub fn missing_mandatory_papers(
        &self,
        technology: &str,
        context: &ResearchContext,
    ) -> Vec<PaperId> {
        if self.is_technology_unlocked(technology, context) {
            return Vec::new();
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut missing = Vec::new();
        for (_, rule) in self.registry.rules_for_technology(technology) {
            for paper in &rule.mandatory_papers {
                if !context.has_completed(paper.as_str()) && seen.insert(paper.as_str()) {
                    missing.push(paper.clone());
                }
            }
        }
        missing
    }

    /// How many papers of set `set` the context has completed.
    ///
    /// `None` for unknown set ids.
    pub fn set_progress(&self, set: &str, context: &ResearchContext) -> Option<SetProgress> {
        let Some(index) = self.registry.set_index(set) else {
            debug!(set, "Progress query for unknown research set");
            return None;
        };
        let total = self.registry.sets().get(index)?.size();
        Some(SetProgress {
            completed: context.set_tally(index),
            total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use scholar_catalog::ResearchContent;
    use scholar_types::{ContextId, Paper, PaperId, ResearchSet, SetId, UnlockRule};

    use super::*;

    fn rule(tech: &str, required: u32, mandatory: &[&str]) -> UnlockRule {
        UnlockRule {
            technology_id: TechnologyId::from(tech),
            papers_required: required,
            mandatory_papers: mandatory.iter().map(|id| PaperId::from(*id)).collect(),
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

    fn content(sets: Vec<ResearchSet>) -> ResearchContent {
        let papers = ["a", "b", "c", "d", "e", "f", "g"]
            .into_iter()
            .map(|id| Paper::new(id, &[]))
            .collect();
        ResearchContent::new(papers, sets).unwrap()
    }

    fn complete(
        evaluator: &UnlockEvaluator<'_>,
        context: &mut ResearchContext,
        paper: &str,
    ) -> Vec<TechnologyId> {
        context.record_paper(&PaperId::from(paper));
        evaluator.record_completion(context, paper)
    }

    #[test]
    fn threshold_and_mandatory_both_gate() {
        let content = content(vec![set(
            "s",
            &["a", "b", "c", "d"],
            vec![rule("forge", 2, &["a"])],
        )]);
        let evaluator = UnlockEvaluator::new(content.registry());
        let mut context = ResearchContext::new(ContextId::new(), &content);

        assert!(complete(&evaluator, &mut context, "b").is_empty());
        assert!(complete(&evaluator, &mut context, "c").is_empty());
        assert!(!evaluator.is_technology_unlocked("forge", &context));
        assert_eq!(evaluator.technology_progress("forge", &context), 1.0);
        assert_eq!(
            evaluator.missing_mandatory_papers("forge", &context),
            vec![PaperId::from("a")]
        );

        let unlocked = complete(&evaluator, &mut context, "a");
        assert_eq!(unlocked, vec![TechnologyId::from("forge")]);
        assert!(evaluator.is_technology_unlocked("forge", &context));
        assert!(evaluator.missing_mandatory_papers("forge", &context).is_empty());
    }

    #[test]
    fn best_rule_wins_progress() {
        let content = content(vec![
            set("slow", &["a", "b", "c", "d"], vec![rule("loom", 4, &[])]),
            set("fast", &["e", "f"], vec![rule("loom", 2, &[])]),
        ]);
        let evaluator = UnlockEvaluator::new(content.registry());
        let mut context = ResearchContext::new(ContextId::new(), &content);

        complete(&evaluator, &mut context, "a");
        assert_eq!(evaluator.technology_progress("loom", &context), 0.25);
        complete(&evaluator, &mut context, "e");
        assert_eq!(evaluator.technology_progress("loom", &context), 0.5);
        assert_eq!(evaluator.technology_progress("teleporter", &context), 0.0);
    }

    #[test]
    fn one_completion_can_unlock_several_technologies_in_slot_order() {
        let content = content(vec![
            set("s1", &["a", "b"], vec![rule("wheel", 1, &[]), rule("axle", 1, &["a"])]),
            set("s2", &["a"], vec![rule("cart", 1, &[]), rule("wheel", 1, &[])]),
        ]);
        let evaluator = UnlockEvaluator::new(content.registry());
        let mut context = ResearchContext::new(ContextId::new(), &content);

        let unlocked = complete(&evaluator, &mut context, "a");
        assert_eq!(
            unlocked,
            vec![
                TechnologyId::from("wheel"),
                TechnologyId::from("axle"),
                TechnologyId::from("cart"),
            ]
        );
        assert_eq!(
            evaluator.unlocked_technologies(&context),
            vec![
                TechnologyId::from("axle"),
                TechnologyId::from("cart"),
                TechnologyId::from("wheel"),
            ]
        );
    }

    #[test]
    fn set_progress_tracks_membership() {
        let content = content(vec![
            set("s1", &["a", "b", "c"], Vec::new()),
            set("s2", &["a", "g"], Vec::new()),
        ]);
        let evaluator = UnlockEvaluator::new(content.registry());
        let mut context = ResearchContext::new(ContextId::new(), &content);
        complete(&evaluator, &mut context, "a");
        complete(&evaluator, &mut context, "b");

        let s1 = evaluator.set_progress("s1", &context).unwrap();
        assert_eq!(s1, SetProgress { completed: 2, total: 3 });
        let s2 = evaluator.set_progress("s2", &context).unwrap();
        assert_eq!(s2.ratio(), 0.5);
        assert!(evaluator.set_progress("nope", &context).is_none());
    }

    #[test]
    fn refresh_finds_rules_satisfied_without_a_completion() {
        let content = content(vec![set("s", &["a", "b"], vec![rule("kiln", 1, &[])])]);
        let evaluator = UnlockEvaluator::new(content.registry());
        let mut context = ResearchContext::new(ContextId::new(), &content);

        context.record_paper(&PaperId::from("a"));
        evaluator.count_completion(&mut context, "a");
        assert!(!context.is_unlocked("kiln"));

        assert_eq!(evaluator.refresh(&mut context), vec![TechnologyId::from("kiln")]);
        assert!(evaluator.refresh(&mut context).is_empty());
    }
}
