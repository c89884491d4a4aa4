//! Turning newly unlocked technologies into unlock events.
//!
//! Each technology is granted at most once per context. The grant list of
//! a technology is the union of the `grants` of every rule that names it,
//! followed by the `contributes_to` references of the mandatory papers
//! those rules list. Duplicates keep their first position.

use std::collections::BTreeSet;

use scholar_catalog::ResearchContent;
use scholar_types::{GrantRef, TechnologyId, UnlockEvent};
use tracing::info;

use crate::context::ResearchContext;

/// Resolves technologies to grant lists and emits unlock events.
#[derive(Debug, Clone, Copy)]
pub struct GrantResolver<'a> {
    content: &'a ResearchContent,
}

impl<'a> GrantResolver<'a> {
    /// A resolver over `content`.
    pub const fn new(content: &'a ResearchContent) -> Self {
        Self { content }
    }

    /// The deduplicated grant list for `technology`.
    ///
    /// Empty for unknown technologies.
    pub fn grants_for(&self, technology: &str) -> Vec<GrantRef> {
        let rules = self.content.registry().rules_for_technology(technology);
        let mut seen: BTreeSet<&GrantRef> = BTreeSet::new();
        let mut grants = Vec::new();

        for (_, rule) in &rules {
            for grant in &rule.grants {
                if seen.insert(grant) {
                    grants.push(grant.clone());
                }
            }
        }

        let catalog = self.content.catalog();
        for (_, rule) in &rules {
            for paper in rule
                .mandatory_papers
                .iter()
                .filter_map(|id| catalog.lookup(id.as_str()))
            {
                for grant in &paper.contributes_to {
                    if seen.insert(grant) {
                        grants.push(grant.clone());
                    }
                }
            }
        }
        grants
    }

    /// Emit one event per technology in `technologies` that has not been
    /// granted to `context` yet, and record it as granted.
    pub(crate) fn resolve(
        &self,
        context: &mut ResearchContext,
        technologies: &[TechnologyId],
    ) -> Vec<UnlockEvent> {
        let mut events = Vec::new();
        for technology in technologies {
            if !context.mark_granted(technology) {
                continue;
            }
            let grants = self.grants_for(technology.as_str());
            info!(
                context_id = %context.id(),
                technology = %technology,
                grants = grants.len(),
                "Technology unlocked"
            );
            events.push(UnlockEvent {
                context_id: context.id(),
                technology_id: technology.clone(),
                grants,
            });
        }
        events
    }
}
