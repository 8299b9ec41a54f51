//! The read-only aggregate handed to external planners.
//!
//! A [`PlannerView`] bundles everything a planner needs to choose the next
//! round of actions: the integer map, each agent's cell and what lies
//! under it, the shared pool, tool flags, what is collectible now, the
//! next-tool recommendation, the prerequisite table, and the nearest node
//! each agent could harvest.

use std::collections::BTreeMap;

use gridcraft_agents::{collection, crafting, rules};
use gridcraft_types::{
    AgentId, GridPos, NodeRecord, Resource, Tool, ToolRecipe, ToolRecommendation,
};
use gridcraft_world::WorldState;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The closest node an agent could collect with the current tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NearestNode {
    /// Resource held by the node.
    pub resource: Resource,
    /// Node cell.
    pub position: GridPos,
    /// Manhattan distance from the agent.
    pub distance: u32,
}

/// One agent as seen by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentView {
    /// The agent.
    pub id: AgentId,
    /// Current cell.
    pub position: GridPos,
    /// Uncollected resources on the agent's cell.
    pub resource_here: Vec<Resource>,
    /// Closest collectible node, if any remain.
    pub nearest_collectible: Option<NearestNode>,
}

/// Everything a planner sees for one decision round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlannerView {
    /// World step counter.
    pub step: u64,
    /// Integer grid projection indexed `[y][x]`.
    pub map: Vec<Vec<i32>>,
    /// Agents ordered by id.
    pub agents: Vec<AgentView>,
    /// Shared pool counts.
    pub shared_resource_pool: BTreeMap<Resource, u32>,
    /// Built flag per tool.
    pub tools_built: BTreeMap<Tool, bool>,
    /// Resources the built tools allow collecting.
    pub collectible_resources: Vec<Resource>,
    /// Next tool to build.
    pub tool_recommendation: ToolRecommendation,
    /// Prerequisites of every tool.
    pub tool_prerequisites: Vec<ToolRecipe>,
    /// Nodes still on the map.
    pub uncollected_nodes: Vec<NodeRecord>,
    /// Whether the episode has ended.
    pub terminated: bool,
}

/// Build the planner view of `world`.
pub fn planner_view(world: &WorldState) -> PlannerView {
    let collectible = collection::collectible_resources(world);
    let uncollected = world.uncollected_nodes();

    let agents = world
        .agents()
        .into_iter()
        .map(|agent| {
            let resource_here = uncollected
                .iter()
                .filter(|n| n.position == agent.position)
                .map(|n| n.resource)
                .collect();
            let nearest_collectible = uncollected
                .iter()
                .filter(|n| collectible.contains(&n.resource))
                .map(|n| NearestNode {
                    resource: n.resource,
                    position: n.position,
                    distance: agent.position.manhattan(n.position),
                })
                .min_by_key(|n| (n.distance, n.position));
            AgentView {
                id: agent.id,
                position: agent.position,
                resource_here,
                nearest_collectible,
            }
        })
        .collect();

    PlannerView {
        step: world.step(),
        map: world.grid_projection(),
        agents,
        shared_resource_pool: world.pool_snapshot(),
        tools_built: world.tools_built(),
        collectible_resources: collectible,
        tool_recommendation: crafting::recommend_next(world),
        tool_prerequisites: rules::recipes(),
        uncollected_nodes: uncollected,
        terminated: world.is_terminated(),
    }
}
