//! Collection and crafting rules for the Gridcraft simulation.
//!
//! # Modules
//!
//! - [`rules`] -- The static prerequisite and collection-requirement tables
//!   and their validation.
//! - [`collection`] -- The collection gate: tool checks and pool deposits.
//! - [`crafting`] -- The crafting resolver: atomic builds and the
//!   next-tool recommendation.
//! - [`error`] -- [`AgentError`] and its mapping onto rejection reasons.

pub mod collection;
pub mod crafting;
pub mod error;
pub mod rules;

pub use collection::{CollectReceipt, can_collect, collect, collectible_resources};
pub use crafting::{BuildReceipt, build, can_build, check_build, recommend_next};
pub use error::AgentError;
pub use rules::{TERMINAL_RESOURCE, TOOL_PRIORITY, ToolRule, validate_prerequisite_graph};
