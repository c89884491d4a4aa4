//! Research progression for the Scholar engine.
//!
//! Given validated [`ResearchContent`](scholar_catalog::ResearchContent),
//! this crate tracks what each researcher has completed, which papers they
//! can research next, which technologies their papers unlock and which
//! grants those technologies deliver, exactly once per researcher.
//!
//! Everything is synchronous and bounded by content size. Contexts share
//! no mutable state, so different contexts can be driven from different
//! threads; completions for one context must be applied one at a time.
//!
//! # Modules
//!
//! - [`context`] -- Per-researcher state and incremental tallies
//! - [`availability`] -- Frontier maintenance and availability queries
//! - [`evaluator`] -- Rule satisfaction, progress and set progress
//! - [`grants`] -- Grant lists and once-only unlock events
//! - [`gate`] -- The skill/age predicate and built-in gates
//! - [`engine`] -- The [`ProgressionEngine`] facade
//! - [`campaign`] -- Multi-context event routing and replay
//! - [`snapshot`] -- Persistence snapshots
//! - [`config`] -- `scholar-config.yaml` loading
//! - [`error`] -- [`EngineError`]

pub mod availability;
pub mod campaign;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod gate;
pub mod grants;
pub mod snapshot;

pub use availability::AvailabilityResolver;
pub use campaign::Campaign;
pub use config::{ConfigError, EngineConfig, ScholarConfig};
pub use context::ResearchContext;
pub use engine::{CompletionOutcome, ProgressionEngine};
pub use error::EngineError;
pub use evaluator::{SetProgress, UnlockEvaluator};
pub use gate::{OpenGate, ProfileGate, ResearchGate, ResearcherProfile};
pub use grants::GrantResolver;
pub use snapshot::ContextSnapshot;
