//! Action request and result types for planner-to-core communication.
//!
//! A planner submits one [`ActionRequest`] per agent per step and receives
//! an [`ActionResult`] describing what the core did with it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Direction, RejectionReason, Resource, Tool};
use crate::ids::AgentId;
use crate::structs::GridPos;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A primitive per-agent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Action {
    /// Step one cell; clamped at the grid edge.
    Move {
        /// Direction of travel.
        direction: Direction,
    },
    /// Harvest the node of `resource` at the agent's cell.
    Collect {
        /// Resource kind to harvest.
        resource: Resource,
    },
    /// Build `tool` from the shared pool.
    Craft {
        /// Tool to build.
        tool: Tool,
    },
    /// Do nothing this step.
    Wait,
}

impl Action {
    /// Short lowercase name of the action kind, used in logs.
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Collect { .. } => "collect",
            Self::Craft { .. } => "craft",
            Self::Wait => "wait",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Move { direction } => write!(f, "move {direction}"),
            Self::Collect { resource } => write!(f, "collect {resource}"),
            Self::Craft { tool } => write!(f, "craft {tool}"),
            Self::Wait => f.write_str("wait"),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionRequest
// ---------------------------------------------------------------------------

/// One action submitted on behalf of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRequest {
    /// The acting agent.
    pub agent_id: AgentId,
    /// What the agent attempts.
    pub action: Action,
}

impl ActionRequest {
    /// Create a request.
    pub const fn new(agent_id: AgentId, action: Action) -> Self {
        Self { agent_id, action }
    }
}

// ---------------------------------------------------------------------------
// ActionResult
// ---------------------------------------------------------------------------

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RejectionDetails {
    /// The rejection reason code.
    pub reason: RejectionReason,
    /// Which requirement failed, e.g. `"missing tool iron_pickaxe"`.
    pub detail: String,
}

/// The outcome of applying one [`ActionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionResult {
    /// World step counter after the action was applied.
    pub step: u64,
    /// The agent who acted.
    pub agent: AgentId,
    /// The action that was attempted.
    pub action: Action,
    /// Whether the action took effect.
    pub success: bool,
    /// Reward earned by this action.
    pub reward: u32,
    /// Whether the episode has ended.
    pub terminal: bool,
    /// The agent's position after the action.
    pub position: GridPos,
    /// A move pushed against the grid edge.
    pub clamped: bool,
    /// Shared pool after the action.
    pub pool: BTreeMap<Resource, u32>,
    /// Failure details (present only if `success` is false).
    pub rejection: Option<RejectionDetails>,
    /// Human-readable summary for logs and planners.
    pub message: String,
}
