//! Error types for the `gridcraft-core` crate.
//!
//! Gameplay rejections never surface here: the executor turns them into
//! unsuccessful [`ActionResult`](gridcraft_types::ActionResult) values.
//! [`CoreError`] is reserved for contract violations and setup failures.

use gridcraft_agents::AgentError;
use gridcraft_world::WorldError;

use crate::config::ConfigError;

/// Errors returned by the executor and the shared world.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A world-level contract violation (unknown agent, out-of-bounds
    /// target, failed reset).
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// A rule-table or non-gameplay agent error.
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// Configuration could not be loaded or validated.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
