//! Shared type definitions for the Scholar research progression engine.
//!
//! This crate is the single source of truth for the content records and
//! boundary events used across the workspace. Types flow downstream to
//! `TypeScript` via `ts-rs` for the research screens of the game UI.
//!
//! # Modules
//!
//! - [`ids`] -- Content keys ([`PaperId`], [`SetId`], [`TechnologyId`]) and
//!   the UUID-backed [`ContextId`]
//! - [`enums`] -- Age ranks and grant kinds
//! - [`structs`] -- Papers, research sets, unlock rules and grants
//! - [`events`] -- Completion input and unlock output events

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AgeRank, GrantKind};
pub use events::{PaperCompleted, UnlockEvent};
pub use ids::{ContextId, PaperId, SetId, TechnologyId};
pub use structs::{GrantRef, Paper, ResearchSet, UnlockRule};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings to `bindings/` relative to the crate
        // root when `export_all` runs.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::ContextId::export_all();
        let _ = crate::ids::PaperId::export_all();
        let _ = crate::ids::SetId::export_all();
        let _ = crate::ids::TechnologyId::export_all();

        // Enums
        let _ = crate::enums::AgeRank::export_all();
        let _ = crate::enums::GrantKind::export_all();

        // Structs
        let _ = crate::structs::GrantRef::export_all();
        let _ = crate::structs::Paper::export_all();
        let _ = crate::structs::UnlockRule::export_all();
        let _ = crate::structs::ResearchSet::export_all();

        // Events
        let _ = crate::events::PaperCompleted::export_all();
        let _ = crate::events::UnlockEvent::export_all();
    }
}
