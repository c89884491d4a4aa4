//! Many contexts behind one engine.
//!
//! A [`Campaign`] routes boundary completion events to the right context,
//! creating contexts the first time an event names them. Replaying the same
//! ordered event log into two fresh campaigns yields identical state and
//! identical unlock event sequences.

use std::collections::BTreeMap;

use scholar_types::{ContextId, PaperCompleted, UnlockEvent};
use tracing::{debug, info};

use crate::context::ResearchContext;
use crate::engine::ProgressionEngine;
use crate::snapshot::ContextSnapshot;

/// A set of independent contexts sharing one engine.
#[derive(Debug, Clone)]
pub struct Campaign {
    engine: ProgressionEngine,
    contexts: BTreeMap<ContextId, ResearchContext>,
}

impl Campaign {
    /// An empty campaign.
    pub const fn new(engine: ProgressionEngine) -> Self {
        Self {
            engine,
            contexts: BTreeMap::new(),
        }
    }

    /// The engine driving every context.
    pub const fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    /// Look up a context.
    pub fn context(&self, id: ContextId) -> Option<&ResearchContext> {
        self.contexts.get(&id)
    }

    /// Look up a context for mutation, e.g. to attach a profile.
    pub fn context_mut(&mut self, id: ContextId) -> Option<&mut ResearchContext> {
        self.contexts.get_mut(&id)
    }

    /// Every context, in id order.
    pub fn contexts(&self) -> impl Iterator<Item = &ResearchContext> {
        self.contexts.values()
    }

    /// Number of contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether the campaign has no contexts.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Create context `id` if it does not exist yet.
    ///
    /// Returns the unlock events of its starting papers, or nothing if the
    /// context already existed.
    pub fn open_context(&mut self, id: ContextId) -> Vec<UnlockEvent> {
        if self.contexts.contains_key(&id) {
            return Vec::new();
        }
        let (context, unlocks) = self.engine.new_context(id);
        self.contexts.insert(id, context);
        unlocks
    }

    /// Apply one completion event, creating its context on first use.
    ///
    /// Returns every unlock event the event caused, including those of a
    /// newly created context's starting papers.
    pub fn apply(&mut self, event: &PaperCompleted) -> Vec<UnlockEvent> {
        let mut unlocks = self.open_context(event.context_id);
        let Some(context) = self.contexts.get_mut(&event.context_id) else {
            return unlocks;
        };
        let outcome = self.engine.complete_paper(context, event.paper_id.as_str());
        if !outcome.is_applied() {
            debug!(
                context_id = %event.context_id,
                paper = %event.paper_id,
                outcome = ?outcome,
                "Completion event not applied"
            );
        }
        unlocks.extend(outcome.into_unlocks());
        unlocks
    }

    /// Apply an ordered event log.
    pub fn replay<'e, I>(&mut self, events: I) -> Vec<UnlockEvent>
    where
        I: IntoIterator<Item = &'e PaperCompleted>,
    {
        let mut unlocks = Vec::new();
        let mut applied: usize = 0;
        for event in events {
            unlocks.extend(self.apply(event));
            applied = applied.saturating_add(1);
        }
        info!(
            events = applied,
            contexts = self.contexts.len(),
            unlocks = unlocks.len(),
            "Event log replayed"
        );
        unlocks
    }

    /// Replace or insert a context from a snapshot.
    pub fn restore(&mut self, snapshot: &ContextSnapshot) {
        let context = self.engine.restore(snapshot);
        self.contexts.insert(snapshot.context_id, context);
    }

    /// Reconcile every context; see [`ProgressionEngine::reconcile`].
    pub fn reconcile_all(&mut self) -> Vec<UnlockEvent> {
        let engine = &self.engine;
        self.contexts
            .values_mut()
            .flat_map(|context| engine.reconcile(context))
            .collect()
    }

    /// Snapshots of every context, in id order.
    pub fn snapshots(&self) -> Vec<ContextSnapshot> {
        self.contexts.values().map(ContextSnapshot::capture).collect()
    }
}
