//! Research content for the Scholar progression engine.
//!
//! Owns the static side of research: the paper catalog with its
//! prerequisite graph, the research set registry with its unlock rules,
//! and the JSON loader that builds both from authored content. Everything
//! here is validated once at load time and is immutable afterwards.
//!
//! # Modules
//!
//! - [`catalog`] -- Paper lookup, prerequisite validation and the reverse
//!   dependency index
//! - [`registry`] -- Research sets, unlock rules and per-paper rule indices
//! - [`content`] -- The validated catalog + registry bundle
//! - [`loader`] -- JSON parsing and file loading
//! - [`error`] -- [`CatalogError`]

pub mod catalog;
pub mod content;
pub mod error;
pub mod loader;
pub mod registry;

pub use catalog::PaperCatalog;
pub use content::ResearchContent;
pub use error::CatalogError;
pub use loader::{load_content_from_files, parse_content, parse_papers, parse_sets};
pub use registry::{ResearchRegistry, RuleSlot};
