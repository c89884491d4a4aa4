//! The validated content bundle shared by every context.

use scholar_types::{Paper, PaperId, ResearchSet};
use tracing::info;

use crate::catalog::PaperCatalog;
use crate::error::CatalogError;
use crate::registry::ResearchRegistry;

/// A paper catalog and research set registry validated against each other.
///
/// Construction is all-or-nothing: a `ResearchContent` only exists if every
/// paper and set passed validation. It is immutable afterwards and is meant
/// to be wrapped in an `Arc` and shared by all contexts.
#[derive(Debug, Clone)]
pub struct ResearchContent {
    catalog: PaperCatalog,
    registry: ResearchRegistry,
}

impl ResearchContent {
    /// Validate papers and sets and bundle them.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found, naming the offending record.
    pub fn new(papers: Vec<Paper>, sets: Vec<ResearchSet>) -> Result<Self, CatalogError> {
        let catalog = PaperCatalog::new(papers)?;
        let registry = ResearchRegistry::new(sets, &catalog)?;
        info!(
            papers = catalog.len(),
            sets = registry.sets().len(),
            rules = registry.rule_count(),
            "Research content validated"
        );
        Ok(Self { catalog, registry })
    }

    /// The paper catalog.
    pub const fn catalog(&self) -> &PaperCatalog {
        &self.catalog
    }

    /// The research set registry.
    pub const fn registry(&self) -> &ResearchRegistry {
        &self.registry
    }

    /// Check that every id in `papers` exists in the catalog.
    ///
    /// Used for references that live outside the content files, such as
    /// configured starting papers.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownPaperReference`] for the first id
    /// that does not resolve.
    pub fn resolve_papers(&self, referrer: &str, papers: &[PaperId]) -> Result<(), CatalogError> {
        match papers.iter().find(|id| !self.catalog.contains(id.as_str())) {
            Some(missing) => Err(CatalogError::UnknownPaperReference {
                referrer: String::from(referrer),
                missing: missing.clone(),
            }),
            None => Ok(()),
        }
    }
}
