//! The progression engine facade.
//!
//! [`ProgressionEngine`] holds the shared, validated content and applies
//! completions to contexts. Each completion runs the same pipeline:
//!
//! 1. record the paper in the context's completion log,
//! 2. advance the availability frontier through the reverse index,
//! 3. bump the set and mandatory tallies and collect rules that became
//!    satisfied,
//! 4. emit one [`UnlockEvent`] per technology not granted before.
//!
//! Queries never mutate and are safe to call every frame.

use std::sync::Arc;

use scholar_catalog::ResearchContent;
use scholar_types::{
    ContextId, GrantRef, Paper, PaperCompleted, PaperId, TechnologyId, UnlockEvent,
};
use tracing::{debug, info, warn};

use crate::availability::AvailabilityResolver;
use crate::config::EngineConfig;
use crate::context::ResearchContext;
use crate::error::EngineError;
use crate::evaluator::{SetProgress, UnlockEvaluator};
use crate::gate::ResearchGate;
use crate::grants::GrantResolver;
use crate::snapshot::ContextSnapshot;

/// What happened to a completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The paper was recorded. `unlocks` holds the technologies it newly
    /// unlocked, possibly none.
    Applied {
        /// Unlock events produced by this completion.
        unlocks: Vec<UnlockEvent>,
    },
    /// The paper was already completed; nothing changed.
    AlreadyCompleted,
    /// The paper is not in the catalog; nothing changed.
    UnknownPaper,
    /// Strict availability is on and the paper's prerequisites are not
    /// all completed; nothing changed.
    NotAvailable,
}

impl CompletionOutcome {
    /// Whether the completion changed the context.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Unlock events produced by the completion.
    pub fn unlocks(&self) -> &[UnlockEvent] {
        match self {
            Self::Applied { unlocks } => unlocks,
            Self::AlreadyCompleted | Self::UnknownPaper | Self::NotAvailable => &[],
        }
    }

    /// Consume the outcome, keeping only its unlock events.
    pub fn into_unlocks(self) -> Vec<UnlockEvent> {
        match self {
            Self::Applied { unlocks } => unlocks,
            Self::AlreadyCompleted | Self::UnknownPaper | Self::NotAvailable => Vec::new(),
        }
    }
}

/// Applies completions and answers progression queries.
///
/// Cloning is cheap; clones share the same content.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    content: Arc<ResearchContent>,
    config: EngineConfig,
}

impl ProgressionEngine {
    /// Create an engine over validated content.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Catalog`] if a configured starting paper is
    /// not in the catalog.
    pub fn new(content: Arc<ResearchContent>, config: EngineConfig) -> Result<Self, EngineError> {
        content.resolve_papers("starting papers", &config.starting_papers)?;
        Ok(Self { content, config })
    }

    /// The shared content.
    pub fn content(&self) -> &ResearchContent {
        &self.content
    }

    /// The engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn availability(&self) -> AvailabilityResolver<'_> {
        AvailabilityResolver::new(self.content.catalog())
    }

    fn evaluator(&self) -> UnlockEvaluator<'_> {
        UnlockEvaluator::new(self.content.registry())
    }

    fn grants(&self) -> GrantResolver<'_> {
        GrantResolver::new(&self.content)
    }

    // -----------------------------------------------------------------------
    // Context lifecycle
    // -----------------------------------------------------------------------

    /// Create a context and apply the configured starting papers.
    ///
    /// Returns the context and the unlock events its starting papers
    /// produced.
    pub fn new_context(&self, id: ContextId) -> (ResearchContext, Vec<UnlockEvent>) {
        let mut context = ResearchContext::new(id, &self.content);
        self.availability().rebuild_frontier(&mut context);

        let mut unlocks = Vec::new();
        for paper in &self.config.starting_papers {
            unlocks.extend(self.record(&mut context, paper.as_str()).into_unlocks());
        }
        debug!(
            context_id = %id,
            starting_papers = self.config.starting_papers.len(),
            "Research context created"
        );
        (context, unlocks)
    }

    /// Rebuild a context from a snapshot against the loaded content.
    ///
    /// Papers the content no longer knows are dropped with a warning.
    /// Technologies recorded as unlocked stay unlocked and granted ones are
    /// never granted again. Rules that are satisfied but whose technology
    /// was never granted are picked up by [`Self::reconcile`] or by the
    /// next applied completion, whichever comes first.
    pub fn restore(&self, snapshot: &ContextSnapshot) -> ResearchContext {
        let mut context = ResearchContext::new(snapshot.context_id, &self.content);
        context.set_profile(snapshot.profile.clone());

        let evaluator = self.evaluator();
        let mut dropped: usize = 0;
        for paper in &snapshot.completed_papers {
            if !self.content.catalog().contains(paper.as_str()) {
                warn!(
                    context_id = %snapshot.context_id,
                    paper = %paper,
                    "Snapshot references unknown paper, dropping it"
                );
                dropped = dropped.saturating_add(1);
                continue;
            }
            if context.record_paper(paper) {
                evaluator.count_completion(&mut context, paper.as_str());
            }
        }

        for technology in &snapshot.unlocked_technologies {
            context.mark_unlocked(technology);
        }
        for technology in &snapshot.granted_technologies {
            context.mark_unlocked(technology);
            context.mark_granted(technology);
        }
        evaluator.refresh(&mut context);
        self.availability().rebuild_frontier(&mut context);

        info!(
            context_id = %snapshot.context_id,
            papers = context.completion_log().len(),
            dropped,
            unlocked = context.unlocked().len(),
            "Research context restored"
        );
        context
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    /// Apply a trusted completion.
    ///
    /// With `strict_availability` on, papers whose prerequisites are not
    /// all completed are refused with [`CompletionOutcome::NotAvailable`].
    pub fn complete_paper(&self, context: &mut ResearchContext, paper: &str) -> CompletionOutcome {
        if self.config.strict_availability
            && self.content.catalog().contains(paper)
            && !context.has_completed(paper)
            && !context.frontier().contains(paper)
        {
            debug!(context_id = %context.id(), paper, "Refusing unavailable paper");
            return CompletionOutcome::NotAvailable;
        }
        self.record(context, paper)
    }

    /// Apply a completion regardless of availability.
    ///
    /// The debug and cheat path. Always logged.
    pub fn force_complete_paper(
        &self,
        context: &mut ResearchContext,
        paper: &str,
    ) -> CompletionOutcome {
        info!(context_id = %context.id(), paper, "Force-completing paper");
        self.record(context, paper)
    }

    /// Apply a boundary completion event to its context.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ContextMismatch`] if the event names a
    /// different context.
    pub fn apply(
        &self,
        context: &mut ResearchContext,
        event: &PaperCompleted,
    ) -> Result<CompletionOutcome, EngineError> {
        if event.context_id != context.id() {
            return Err(EngineError::ContextMismatch {
                expected: context.id(),
                found: event.context_id,
            });
        }
        Ok(self.complete_paper(context, event.paper_id.as_str()))
    }

    fn record(&self, context: &mut ResearchContext, paper: &str) -> CompletionOutcome {
        let Some(found) = self.content.catalog().lookup(paper) else {
            warn!(context_id = %context.id(), paper, "Completion for unknown paper ignored");
            return CompletionOutcome::UnknownPaper;
        };
        if !context.record_paper(&found.id) {
            debug!(context_id = %context.id(), paper, "Paper already completed");
            return CompletionOutcome::AlreadyCompleted;
        }

        self.availability().advance(context, paper);
        let mut unlocked = self.evaluator().record_completion(context, paper);
        // Unlocked but never granted, e.g. satisfied at restore time.
        let pending: Vec<TechnologyId> = context
            .unlocked()
            .difference(context.granted_technologies())
            .filter(|technology| !unlocked.contains(technology))
            .cloned()
            .collect();
        unlocked.extend(pending);
        let unlocks = self.grants().resolve(context, &unlocked);
        debug!(
            context_id = %context.id(),
            paper,
            unlocks = unlocks.len(),
            "Paper completed"
        );
        CompletionOutcome::Applied { unlocks }
    }

    /// Emit unlock events for every unlocked technology not granted yet.
    ///
    /// Normally a no-op. After a restore against patched content it
    /// delivers technologies the patch made reachable.
    pub fn reconcile(&self, context: &mut ResearchContext) -> Vec<UnlockEvent> {
        self.evaluator().refresh(context);
        let pending: Vec<TechnologyId> = context
            .unlocked()
            .difference(context.granted_technologies())
            .cloned()
            .collect();
        self.grants().resolve(context, &pending)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether `paper` is researchable by `context` right now.
    pub fn is_available<G>(&self, paper: &str, context: &ResearchContext, gate: &G) -> bool
    where
        G: ResearchGate + ?Sized,
    {
        self.availability().is_available(paper, context, gate)
    }

    /// Papers researchable by `context` right now, in id order.
    pub fn available_papers<'a, G>(
        &'a self,
        context: &'a ResearchContext,
        gate: &'a G,
    ) -> impl Iterator<Item = &'a Paper> + use<'a, G>
    where
        G: ResearchGate + ?Sized,
    {
        self.availability().available_papers(context, gate)
    }

    /// Whether `technology` is unlocked for `context`.
    pub fn is_technology_unlocked(&self, technology: &str, context: &ResearchContext) -> bool {
        self.evaluator().is_technology_unlocked(technology, context)
    }

    /// Raw count progress toward `technology`, in `[0, 1]`.
    pub fn technology_progress(&self, technology: &str, context: &ResearchContext) -> f64 {
        self.evaluator().technology_progress(technology, context)
    }

    /// Every unlocked technology, deduplicated, in id order.
    pub fn unlocked_technologies(&self, context: &ResearchContext) -> Vec<TechnologyId> {
        self.evaluator().unlocked_technologies(context)
    }

    /// Mandatory papers still blocking `technology`.
    pub fn missing_mandatory_papers(
        &self,
        technology: &str,
        context: &ResearchContext,
    ) -> Vec<PaperId> {
        self.evaluator().missing_mandatory_papers(technology, context)
    }

    /// Completed-paper count for one research set.
    pub fn set_progress(&self, set: &str, context: &ResearchContext) -> Option<SetProgress> {
        self.evaluator().set_progress(set, context)
    }

    /// The grants `technology` delivers when it unlocks.
    pub fn grants_for(&self, technology: &str) -> Vec<GrantRef> {
        self.grants().grants_for(technology)
    }
}
