//! Shared type definitions for the Gridcraft simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Gridcraft workspace. Types that cross the planner boundary flow to
//! `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe index wrappers for agents and resource nodes
//! - [`enums`] -- Resources, tools, directions, rejection reasons
//! - [`structs`] -- Positions, prerequisites, snapshots, recommendations
//! - [`actions`] -- Action request/result types for planner-core communication

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, ActionRequest, ActionResult, RejectionDetails};
pub use enums::{Direction, ParseError, RecommendationStatus, RejectionReason, Resource, Tool};
pub use ids::{AgentId, NodeId};
pub use structs::{
    AgentSnapshot, GridPos, NodeRecord, Prerequisite, ToolRecipe, ToolRecommendation,
    WorldSnapshot,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for planner-facing types.

    #[test]
    fn export_bindings() {
        // Files are written to the `bindings/` directory relative to the
        // crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::AgentId::export_all();
        let _ = crate::ids::NodeId::export_all();

        // Enums
        let _ = crate::enums::Resource::export_all();
        let _ = crate::enums::Tool::export_all();
        let _ = crate::enums::Direction::export_all();
        let _ = crate::enums::RejectionReason::export_all();
        let _ = crate::enums::RecommendationStatus::export_all();

        // Structs
        let _ = crate::structs::GridPos::export_all();
        let _ = crate::structs::Prerequisite::export_all();
        let _ = crate::structs::ToolRecipe::export_all();
        let _ = crate::structs::NodeRecord::export_all();
        let _ = crate::structs::AgentSnapshot::export_all();
        let _ = crate::structs::WorldSnapshot::export_all();
        let _ = crate::structs::ToolRecommendation::export_all();

        // Actions
        let _ = crate::actions::Action::export_all();
        let _ = crate::actions::ActionRequest::export_all();
        let _ = crate::actions::RejectionDetails::export_all();
        let _ = crate::actions::ActionResult::export_all();
    }
}
