//! Which papers a context can research next.
//!
//! A paper is available when it is not completed, every prerequisite is
//! completed, and the host's [`ResearchGate`] admits the context. The
//! first two conditions are kept in the context's frontier. A completion
//! only re-checks the direct dependents of the completed paper, found
//! through the catalog's reverse index, so the update cost follows local
//! fan-out rather than catalog size. The gate is applied at query time.

use scholar_catalog::PaperCatalog;
use scholar_types::Paper;
use tracing::debug;

use crate::context::ResearchContext;
use crate::gate::ResearchGate;

/// Maintains and queries availability frontiers against one catalog.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver<'a> {
    catalog: &'a PaperCatalog,
}

impl<'a> AvailabilityResolver<'a> {
    /// A resolver over `catalog`.
    pub const fn new(catalog: &'a PaperCatalog) -> Self {
        Self { catalog }
    }

    /// Recompute the frontier of `context` from scratch.
    ///
    /// Used when a context is created or restored; completions use
    /// [`Self::advance`].
    pub(crate) fn rebuild_frontier(&self, context: &mut ResearchContext) {
        let frontier: Vec<_> = self
            .catalog
            .iter()
            .filter(|paper| !context.has_completed(paper.id.as_str()))
            .filter(|paper| self.prerequisites_met(paper, context))
            .map(|paper| paper.id.clone())
            .collect();
        let slot = context.frontier_mut();
        slot.clear();
        slot.extend(frontier);
    }

    /// Update the frontier after `completed` was recorded.
    pub(crate) fn advance(&self, context: &mut ResearchContext, completed: &str) {
        context.frontier_mut().remove(completed);
        for dependent in self.catalog.dependents_of(completed) {
            if context.has_completed(dependent.as_str()) {
                continue;
            }
            let ready = self
                .catalog
                .lookup(dependent.as_str())
                .is_some_and(|paper| self.prerequisites_met(paper, context));
            if ready {
                context.frontier_mut().insert(dependent.clone());
            }
        }
    }

    fn prerequisites_met(&self, paper: &Paper, context: &ResearchContext) -> bool {
        paper
            .prerequisite_papers
            .iter()
            .all(|prereq| context.has_completed(prereq.as_str()))
    }

    /// Whether `paper` is currently researchable by `context`.
    ///
    /// Unknown paper ids are never available.
    pub fn is_available<G>(&self, paper: &str, context: &ResearchContext, gate: &G) -> bool
    where
        G: ResearchGate + ?Sized,
    {
        if !context.frontier().contains(paper) {
            return false;
        }
        match self.catalog.lookup(paper) {
            Some(found) => gate.admits(context, found),
            None => {
                debug!(paper, "Availability query for unknown paper");
                false
            }
        }
    }

    /// Papers currently researchable by `context`, in id order.
    ///
    /// The sequence is produced lazily from the frontier and is not
    /// cached; call again for a fresh pass.
    pub fn available_papers<'c, G>(
        &self,
        context: &'c ResearchContext,
        gate: &'c G,
    ) -> impl Iterator<Item = &'a Paper> + use<'a, 'c, G>
    where
        G: ResearchGate + ?Sized,
    {
        let catalog = self.catalog;
        context
            .frontier()
            .iter()
            .filter_map(move |id| catalog.lookup(id.as_str()))
            .filter(move |paper| gate.admits(context, paper))
    }
}
