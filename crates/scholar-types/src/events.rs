//! Boundary events exchanged with the host simulation.
//!
//! [`PaperCompleted`] flows in; [`UnlockEvent`] flows out, once per
//! technology per context.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{ContextId, PaperId, TechnologyId};
use crate::structs::GrantRef;

/// A paper has been completed by a context.
///
/// The host decides when this happens (time, cost, player action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PaperCompleted {
    /// The researching context.
    pub context_id: ContextId,
    /// The completed paper.
    pub paper_id: PaperId,
}

impl PaperCompleted {
    /// Create a completion event.
    pub fn new(context_id: ContextId, paper_id: impl Into<PaperId>) -> Self {
        Self {
            context_id,
            paper_id: paper_id.into(),
        }
    }
}

/// A technology became unlocked for a context and its grants are due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UnlockEvent {
    /// The context that unlocked the technology.
    pub context_id: ContextId,
    /// The unlocked technology.
    pub technology_id: TechnologyId,
    /// Entities the host should make available, deduplicated.
    pub grants: Vec<GrantRef>,
}
