//! The paper catalog: the immutable prerequisite graph.
//!
//! The catalog is a directed acyclic graph where each [`Paper`] lists zero
//! or more prerequisite ids. It is validated exactly once, when it is
//! built, and is read-only afterwards so it can be shared across every
//! context and thread without synchronization.
//!
//! # Validation
//!
//! - Paper ids are unique.
//! - Every prerequisite resolves to a paper in the catalog.
//! - The graph is acyclic. Cycles are found with Kahn's algorithm and the
//!   offending cycle is reported in full.
//!
//! Besides the papers themselves the catalog keeps a reverse-dependency
//! index (paper to the papers that list it as a prerequisite) so the
//! research frontier can be advanced by looking only at direct dependents.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use scholar_types::{Paper, PaperId};

use crate::error::CatalogError;

/// The validated, immutable collection of research papers.
#[derive(Debug, Clone)]
pub struct PaperCatalog {
    papers: BTreeMap<PaperId, Paper>,
    dependents: BTreeMap<PaperId, Vec<PaperId>>,
    topological_order: Vec<PaperId>,
}

impl PaperCatalog {
    /// Build and validate a catalog from a list of papers.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePaper`],
    /// [`CatalogError::UnknownPaperReference`] or
    /// [`CatalogError::CyclicDependency`] if the papers do not form a valid
    /// graph.
    pub fn new(papers: Vec<Paper>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for paper in papers {
            if map.contains_key(&paper.id) {
                return Err(CatalogError::DuplicatePaper(paper.id));
            }
            map.insert(paper.id.clone(), paper);
        }

        let mut dependents: BTreeMap<PaperId, Vec<PaperId>> = BTreeMap::new();
        for paper in map.values() {
            for prereq in &paper.prerequisite_papers {
                let list = dependents.entry(prereq.clone()).or_default();
                // Papers are visited one at a time, so a repeated
                // prerequisite can only duplicate the last entry.
                if list.last() != Some(&paper.id) {
                    list.push(paper.id.clone());
                }
            }
        }

        let mut catalog = Self {
            papers: map,
            dependents,
            topological_order: Vec::new(),
        };
        catalog.topological_order = catalog.validate()?;
        Ok(catalog)
    }

    /// Validate the prerequisite graph and return a topological ordering
    /// (every paper appears after all of its prerequisites).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownPaperReference`] for a dangling
    /// prerequisite, or [`CatalogError::CyclicDependency`] listing a cycle.
    pub fn validate(&self) -> Result<Vec<PaperId>, CatalogError> {
        for paper in self.papers.values() {
            for prereq in &paper.prerequisite_papers {
                if !self.papers.contains_key(prereq) {
                    return Err(CatalogError::UnknownPaperReference {
                        referrer: format!("paper `{}`", paper.id),
                        missing: prereq.clone(),
                    });
                }
            }
        }

        // Kahn's algorithm. Edges run prerequisite -> dependent. Repeated
        // prerequisites on one paper count once, matching the dependents
        // index.
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
        for paper in self.papers.values() {
            let distinct: BTreeSet<&str> =
                paper.prerequisite_papers.iter().map(PaperId::as_str).collect();
            in_degree.insert(paper.id.as_str(), distinct.len());
        }

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut order: Vec<PaperId> = Vec::with_capacity(self.papers.len());
        while let Some(node) = queue.pop_front() {
            order.push(PaperId::from(node));
            for dependent in self.dependents_of(node) {
                if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        queue.push_back(dependent.as_str());
                    }
                }
            }
        }

        if order.len() != self.papers.len() {
            let remaining: BTreeSet<&str> = in_degree
                .iter()
                .filter(|&(_, &degree)| degree > 0)
                .map(|(&id, _)| id)
                .collect();
            return Err(CatalogError::CyclicDependency {
                cycle: self.find_cycle(&remaining),
            });
        }

        Ok(order)
    }

    /// Walk prerequisite edges among the papers Kahn's algorithm could not
    /// order until a paper repeats, and return that loop.
    ///
    /// Every paper left over still has an unordered prerequisite, so the
    /// walk always continues until it closes a cycle.
    fn find_cycle(&self, remaining: &BTreeSet<&str>) -> Vec<PaperId> {
        let Some(&start) = remaining.iter().next() else {
            return Vec::new();
        };

        let mut path: Vec<&str> = Vec::new();
        let mut position: BTreeMap<&str, usize> = BTreeMap::new();
        let mut current = start;

        loop {
            if let Some(&at) = position.get(current) {
                // The loop was walked dependent -> prerequisite. Keep its
                // first paper in front and reverse the rest so each paper
                // is a prerequisite of the next, then close it.
                let mut nodes = path.iter().skip(at);
                let mut cycle: Vec<PaperId> = Vec::new();
                if let Some(head) = nodes.next() {
                    cycle.push(PaperId::from(*head));
                    cycle.extend(nodes.rev().map(|id| PaperId::from(*id)));
                    cycle.push(PaperId::from(*head));
                }
                return cycle;
            }
            position.insert(current, path.len());
            path.push(current);

            let next = self.papers.get(current).and_then(|paper| {
                paper
                    .prerequisite_papers
                    .iter()
                    .map(PaperId::as_str)
                    .find(|prereq| remaining.contains(prereq))
            });
            match next {
                Some(prereq) => current = prereq,
                None => return path.iter().map(|id| PaperId::from(*id)).collect(),
            }
        }
    }

    /// Look up a paper by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::PaperNotFound`] if the id is unknown.
    pub fn get(&self, id: &str) -> Result<&Paper, CatalogError> {
        self.papers
            .get(id)
            .ok_or_else(|| CatalogError::PaperNotFound(PaperId::from(id)))
    }

    /// Look up a paper by id, returning `None` if it is unknown.
    pub fn lookup(&self, id: &str) -> Option<&Paper> {
        self.papers.get(id)
    }

    /// Check whether the catalog contains a paper.
    pub fn contains(&self, id: &str) -> bool {
        self.papers.contains_key(id)
    }

    /// Number of papers in the catalog.
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Iterate over all papers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Paper> {
        self.papers.values()
    }

    /// Papers that list `id` as a prerequisite (direct dependents only).
    pub fn dependents_of(&self, id: &str) -> &[PaperId] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Papers with no prerequisites.
    pub fn roots(&self) -> impl Iterator<Item = &Paper> {
        self.papers
            .values()
            .filter(|paper| paper.prerequisite_papers.is_empty())
    }

    /// All papers ordered so that prerequisites come first.
    pub fn topological_order(&self) -> &[PaperId] {
        &self.topological_order
    }
}
