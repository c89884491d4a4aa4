//! The skill and age predicate consulted by availability queries.
//!
//! Whether a researcher is old or skilled enough for a paper is the host
//! simulation's business. The engine only asks through [`ResearchGate`].
//! Two gates ship with the crate: [`OpenGate`] for hosts without gating
//! and [`ProfileGate`] for hosts that attach a [`ResearcherProfile`] to
//! each context.

use std::collections::BTreeMap;

use scholar_types::{AgeRank, Paper};
use serde::{Deserialize, Serialize};

use crate::context::ResearchContext;

/// Decides whether a context may research a paper whose prerequisites are
/// already met.
///
/// Implemented for every `Fn(&ResearchContext, &Paper) -> bool`, so hosts
/// can pass a closure.
pub trait ResearchGate {
    /// Whether `context` meets the paper's age and skill conditions.
    fn admits(&self, context: &ResearchContext, paper: &Paper) -> bool;
}

impl<F> ResearchGate for F
where
    F: Fn(&ResearchContext, &Paper) -> bool,
{
    fn admits(&self, context: &ResearchContext, paper: &Paper) -> bool {
        self(context, paper)
    }
}

/// Admits every paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenGate;

impl ResearchGate for OpenGate {
    fn admits(&self, _context: &ResearchContext, _paper: &Paper) -> bool {
        true
    }
}

/// A researcher's attributes as seen by [`ProfileGate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearcherProfile {
    /// Current age rank.
    pub age: AgeRank,
    /// Skill levels by skill name. Missing skills count as zero.
    #[serde(default)]
    pub skills: BTreeMap<String, u32>,
}

impl ResearcherProfile {
    /// A profile with no skills.
    pub const fn new(age: AgeRank) -> Self {
        Self {
            age,
            skills: BTreeMap::new(),
        }
    }

    /// Builder-style skill assignment.
    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>, level: u32) -> Self {
        self.skills.insert(skill.into(), level);
        self
    }

    /// Level of `skill`, zero when untrained.
    pub fn skill(&self, skill: &str) -> u32 {
        self.skills.get(skill).copied().unwrap_or(0)
    }

    /// Whether this profile satisfies the paper's `minimum_age` and every
    /// `minimum_skills` threshold.
    pub fn meets(&self, paper: &Paper) -> bool {
        let old_enough = paper.minimum_age.is_none_or(|minimum| self.age >= minimum);
        old_enough
            && paper
                .minimum_skills
                .iter()
                .all(|(skill, &threshold)| self.skill(skill) >= threshold)
    }
}

/// Checks papers against the profile attached to the context.
///
/// Contexts without a profile are admitted only to papers that declare no
/// age or skill conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileGate;

impl ResearchGate for ProfileGate {
    fn admits(&self, context: &ResearchContext, paper: &Paper) -> bool {
        if !paper.is_gated() {
            return true;
        }
        context.profile().is_some_and(|profile| profile.meets(paper))
    }
}
