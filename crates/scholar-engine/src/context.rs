//! Per-researcher progression state.
//!
//! A [`ResearchContext`] is everything one researcher (player, faction,
//! colony) has done: completed papers in completion order, the monotonic
//! unlocked and granted technology sets, and the incremental indices that
//! keep queries cheap:
//!
//! - one completed-paper tally per research set,
//! - one present-mandatory-paper tally per unlock rule slot,
//! - the frontier of uncompleted papers whose prerequisites are all met.
//!
//! Contexts share nothing with each other. Mutation goes through
//! [`ProgressionEngine`](crate::ProgressionEngine), which applies one
//! completion at a time.

use std::collections::BTreeSet;

use scholar_catalog::ResearchContent;
use scholar_types::{ContextId, PaperId, TechnologyId};

use crate::gate::ResearcherProfile;

/// One researcher's progression state.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchContext {
    id: ContextId,
    profile: Option<ResearcherProfile>,
    completed: BTreeSet<PaperId>,
    completion_log: Vec<PaperId>,
    unlocked: BTreeSet<TechnologyId>,
    granted: BTreeSet<TechnologyId>,
    set_tallies: Vec<u32>,
    mandatory_tallies: Vec<u32>,
    frontier: BTreeSet<PaperId>,
}

impl ResearchContext {
    /// A context with counters sized for `content` and nothing completed.
    ///
    /// The frontier starts empty; the availability resolver seeds it.
    pub(crate) fn new(id: ContextId, content: &ResearchContent) -> Self {
        let registry = content.registry();
        Self {
            id,
            profile: None,
            completed: BTreeSet::new(),
            completion_log: Vec::new(),
            unlocked: BTreeSet::new(),
            granted: BTreeSet::new(),
            set_tallies: vec![0; registry.sets().len()],
            mandatory_tallies: vec![0; registry.rule_count()],
            frontier: BTreeSet::new(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn empty(id: ContextId) -> Self {
        Self {
            id,
            profile: None,
            completed: BTreeSet::new(),
            completion_log: Vec::new(),
            unlocked: BTreeSet::new(),
            granted: BTreeSet::new(),
            set_tallies: Vec::new(),
            mandatory_tallies: Vec::new(),
            frontier: BTreeSet::new(),
        }
    }

    /// The context's identifier.
    pub const fn id(&self) -> ContextId {
        self.id
    }

    /// The researcher profile consulted by [`ProfileGate`](crate::ProfileGate).
    pub const fn profile(&self) -> Option<&ResearcherProfile> {
        self.profile.as_ref()
    }

    /// Attach or clear the researcher profile.
    pub fn set_profile(&mut self, profile: Option<ResearcherProfile>) {
        self.profile = profile;
    }

    /// Every completed paper.
    pub const fn completed_papers(&self) -> &BTreeSet<PaperId> {
        &self.completed
    }

    /// Whether `paper` has been completed.
    pub fn has_completed(&self, paper: &str) -> bool {
        self.completed.contains(paper)
    }

    /// Completed papers in the order they were completed.
    pub fn completion_log(&self) -> &[PaperId] {
        &self.completion_log
    }

    /// Technologies recorded as unlocked. Never shrinks.
    pub const fn unlocked(&self) -> &BTreeSet<TechnologyId> {
        &self.unlocked
    }

    /// Whether `technology` is recorded as unlocked.
    pub fn is_unlocked(&self, technology: &str) -> bool {
        self.unlocked.contains(technology)
    }

    /// Technologies whose grants have been emitted. Never shrinks.
    pub const fn granted_technologies(&self) -> &BTreeSet<TechnologyId> {
        &self.granted
    }

    /// Uncompleted papers whose prerequisites are all completed, before
    /// any gate is applied.
    pub const fn frontier(&self) -> &BTreeSet<PaperId> {
        &self.frontier
    }

    /// Completed papers counted toward the set at `set`.
    pub fn set_tally(&self, set: usize) -> u32 {
        self.set_tallies.get(set).copied().unwrap_or(0)
    }

    /// Mandatory papers present for the rule at `slot`.
    pub fn mandatory_tally(&self, slot: usize) -> u32 {
        self.mandatory_tallies.get(slot).copied().unwrap_or(0)
    }

    /// Record `paper` as completed. Returns `false` if it already was.
    pub(crate) fn record_paper(&mut self, paper: &PaperId) -> bool {
        if !self.completed.insert(paper.clone()) {
            return false;
        }
        self.completion_log.push(paper.clone());
        true
    }

    pub(crate) fn bump_set(&mut self, set: usize) {
        if let Some(tally) = self.set_tallies.get_mut(set) {
            *tally = tally.saturating_add(1);
        }
    }

    pub(crate) fn bump_mandatory(&mut self, slot: usize) {
        if let Some(tally) = self.mandatory_tallies.get_mut(slot) {
            *tally = tally.saturating_add(1);
        }
    }

    /// Returns `true` if `technology` was not unlocked before.
    pub(crate) fn mark_unlocked(&mut self, technology: &TechnologyId) -> bool {
        if self.unlocked.contains(technology) {
            return false;
        }
        self.unlocked.insert(technology.clone())
    }

    /// Returns `true` if `technology` was not granted before.
    pub(crate) fn mark_granted(&mut self, technology: &TechnologyId) -> bool {
        if self.granted.contains(technology) {
            return false;
        }
        self.granted.insert(technology.clone())
    }

    pub(crate) const fn frontier_mut(&mut self) -> &mut BTreeSet<PaperId> {
        &mut self.frontier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_recorded_once_in_order() {
        let mut context = ResearchContext::empty(ContextId::new());
        assert!(context.record_paper(&PaperId::from("b")));
        assert!(context.record_paper(&PaperId::from("a")));
        assert!(!context.record_paper(&PaperId::from("b")));

        assert_eq!(
            context.completion_log(),
            &[PaperId::from("b"), PaperId::from("a")]
        );
        assert!(context.has_completed("a"));
        assert!(!context.has_completed("c"));
    }

    #[test]
    fn tallies_outside_the_arena_read_as_zero() {
        let mut context = ResearchContext::empty(ContextId::new());
        context.bump_set(3);
        context.bump_mandatory(7);
        assert_eq!(context.set_tally(3), 0);
        assert_eq!(context.mandatory_tally(7), 0);
    }

    #[test]
    fn technology_marks_are_idempotent() {
        let mut context = ResearchContext::empty(ContextId::new());
        let forge = TechnologyId::from("forge");
        assert!(context.mark_unlocked(&forge));
        assert!(!context.mark_unlocked(&forge));
        assert!(context.mark_granted(&forge));
        assert!(!context.mark_granted(&forge));
        assert!(context.is_unlocked("forge"));
    }
}
