//! Core data structs for the Gridcraft simulation.
//!
//! Positions, node records, prerequisite entries, and the read-only
//! snapshot types handed to external planners.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Direction, RecommendationStatus, Resource, Tool};
use crate::ids::{AgentId, NodeId};

// ---------------------------------------------------------------------------
// GridPos
// ---------------------------------------------------------------------------

/// An integer cell coordinate. `x` is the column, `y` the row.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct GridPos {
    /// Column, `0..width`.
    pub x: u32,
    /// Row, `0..height`.
    pub y: u32,
}

impl GridPos {
    /// Create a position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance to `other`.
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Whether this position lies inside a `width` x `height` grid.
    pub const fn in_bounds(self, width: u32, height: u32) -> bool {
        self.x < width && self.y < height
    }

    /// Apply one step in `direction`, clamping each coordinate into
    /// `[0, bound)`.
    ///
    /// Returns the resulting position and whether the step was clamped
    /// (i.e. the agent pushed against the edge and stayed put on that axis).
    /// A zero-sized bound leaves the coordinate unchanged.
    pub fn step_clamped(self, direction: Direction, width: u32, height: u32) -> (Self, bool) {
        let (dx, dy) = direction.delta();
        let (x, x_clamped) = clamp_axis(self.x, dx, width);
        let (y, y_clamped) = clamp_axis(self.y, dy, height);
        (Self { x, y }, x_clamped || y_clamped)
    }

    /// The position one step away in `direction`, or `None` if it would
    /// leave the grid.
    pub fn neighbor(self, direction: Direction, width: u32, height: u32) -> Option<Self> {
        let (next, clamped) = self.step_clamped(direction, width, height);
        if clamped { None } else { Some(next) }
    }
}

impl core::fmt::Display for GridPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn clamp_axis(value: u32, delta: i64, bound: u32) -> (u32, bool) {
    if bound == 0 {
        return (value, delta != 0);
    }
    let max = i64::from(bound.saturating_sub(1));
    let wanted = i64::from(value).saturating_add(delta);
    let clamped = wanted.clamp(0, max);
    let result = u32::try_from(clamped).unwrap_or(value);
    (result, clamped != wanted)
}

// ---------------------------------------------------------------------------
// Prerequisites
// ---------------------------------------------------------------------------

/// One entry in a tool's prerequisite map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Prerequisite {
    /// Another tool that must already be built. Never consumed.
    Tool {
        /// The gating tool.
        tool: Tool,
    },
    /// A resource amount withdrawn from the shared pool on build.
    Resource {
        /// The consumed resource.
        resource: Resource,
        /// Units consumed.
        amount: u32,
    },
}

/// A tool together with its prerequisite entries, as shown to planners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ToolRecipe {
    /// The tool produced.
    pub tool: Tool,
    /// Everything the build requires.
    pub prerequisites: Vec<Prerequisite>,
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A resource node and its collection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NodeRecord {
    /// Placement-order identifier.
    pub id: NodeId,
    /// Resource kind held by the node.
    pub resource: Resource,
    /// Fixed cell.
    pub position: GridPos,
    /// Set once, never cleared.
    pub collected: bool,
}

/// Per-agent state visible to planners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentSnapshot {
    /// The agent.
    pub id: AgentId,
    /// Current cell.
    pub position: GridPos,
    /// Units this agent has collected this episode, per resource.
    pub collected: BTreeMap<Resource, u32>,
}

/// Full read-only view of the world after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Number of actions applied since the last reset.
    pub step: u64,
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// Every agent, ordered by id.
    pub agents: Vec<AgentSnapshot>,
    /// Uncollected nodes, in placement order.
    pub nodes: Vec<NodeRecord>,
    /// Shared pool counts for every resource kind.
    pub pool: BTreeMap<Resource, u32>,
    /// Built flag for every tool.
    pub tools_built: BTreeMap<Tool, bool>,
    /// Whether the terminal resource has been collected.
    pub terminated: bool,
}

/// What to build next and what is still missing for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ToolRecommendation {
    /// First unbuilt tool in priority order, `None` when all are built.
    pub next_tool: Option<Tool>,
    /// Resource shortfall (`required - available`), zero entries omitted.
    pub missing: BTreeMap<Resource, u32>,
    /// Prerequisite tools not yet built.
    pub missing_tools: Vec<Tool>,
    /// Ready, not ready, or done.
    pub status: RecommendationStatus,
}
