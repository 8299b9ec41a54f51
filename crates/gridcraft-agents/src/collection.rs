//! The collection gate: harvesting a resource node into the shared pool.
//!
//! A collect succeeds only when an uncollected node of the requested kind
//! sits on the agent's cell and every tool the resource requires has been
//! built. On success the pool gains one unit, the node is flagged, the
//! agent's counter is bumped, and collecting the terminal resource ends the
//! episode in the same step.

use gridcraft_types::{AgentId, GridPos, NodeId, Resource, Tool};
use gridcraft_world::WorldState;
use tracing::info;

use crate::error::AgentError;
use crate::rules::{TERMINAL_RESOURCE, required_tools};

/// What a successful collect did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectReceipt {
    /// The collecting agent.
    pub agent: AgentId,
    /// The harvested resource.
    pub resource: Resource,
    /// The node that was consumed.
    pub node: NodeId,
    /// Where it happened.
    pub position: GridPos,
    /// Pool count of `resource` after the deposit.
    pub pool_count: u32,
    /// Whether this collect ended the episode.
    pub terminal: bool,
}

/// Required tools for `resource` that have not been built yet.
pub fn missing_tools(world: &WorldState, resource: Resource) -> Vec<Tool> {
    required_tools(resource)
        .iter()
        .copied()
        .filter(|&t| !world.is_built(t))
        .collect()
}

/// Whether the built tools allow collecting `resource`.
pub fn can_collect(world: &WorldState, resource: Resource) -> bool {
    required_tools(resource).iter().all(|&t| world.is_built(t))
}

/// Every resource kind the built tools currently allow collecting.
pub fn collectible_resources(world: &WorldState) -> Vec<Resource> {
    Resource::ALL
        .into_iter()
        .filter(|&r| can_collect(world, r))
        .collect()
}

/// Run every collect precondition without mutating.
///
/// Returns the node that a collect would consume.
pub fn check_collect(
    world: &WorldState,
    agent: AgentId,
    resource: Resource,
) -> Result<NodeId, AgentError> {
    let position = world.agent_position(agent)?;
    let node = world
        .node_at(position, resource)
        .ok_or(AgentError::NoResourceHere { resource, position })?;
    if node.collected {
        return Err(AgentError::AlreadyCollected { resource, position });
    }
    if let Some(&tool) = missing_tools(world, resource).first() {
        return Err(AgentError::MissingTool { resource, tool });
    }
    Ok(node.id)
}

/// Harvest the `resource` node under `agent`.
///
/// Rejections leave the world untouched.
pub fn collect(
    world: &mut WorldState,
    agent: AgentId,
    resource: Resource,
) -> Result<CollectReceipt, AgentError> {
    let node = check_collect(world, agent, resource)?;
    let position = world.agent_position(agent)?;

    let pool_count = world.pool_mut().add(resource, 1)?;
    world.mark_collected(node)?;
    world.record_collection(agent, resource)?;

    let terminal = resource == TERMINAL_RESOURCE;
    if terminal {
        world.terminate();
    }

    info!(%agent, %resource, %node, pool = pool_count, terminal, "resource collected");

    Ok(CollectReceipt {
        agent,
        resource,
        node,
        position,
        pool_count,
        terminal,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use gridcraft_types::Direction;
    use gridcraft_world::{WorldLayout, shortest_path};

    use super::*;

    const AGENT: AgentId = AgentId::new(1);

    fn world() -> WorldState {
        WorldState::new(WorldLayout::default(), 99).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Walk `AGENT` onto the first node of `resource`.
    fn walk_to(world: &mut WorldState, resource: Resource) -> GridPos {
        let Some(target) = world.nodes_of(resource).next().map(|n| n.position) else {
            panic!("no {resource} node");
        };
        let start = world.agent_position(AGENT).unwrap_or_default();
        let path: Vec<Direction> = shortest_path(&*world, start, target).unwrap_or_default();
        for direction in path {
            let _ = world.move_agent(AGENT, direction);
        }
        target
    }

    #[test]
    fn wood_needs_no_tool() {
        let mut w = world();
        let pos = walk_to(&mut w, Resource::Wood);
        let receipt = collect(&mut w, AGENT, Resource::Wood);
        assert!(receipt.is_ok());
        let receipt = receipt.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(receipt.position, pos);
        assert_eq!(receipt.pool_count, 1);
        assert!(!receipt.terminal);
        assert_eq!(w.pool().get(Resource::Wood), 1);
        assert_eq!(
            w.collection_counts(AGENT)
                .ok()
                .and_then(|c| c.get(&Resource::Wood).copied()),
            Some(1)
        );
    }

    #[test]
    fn second_collect_on_same_node_is_rejected() {
        let mut w = world();
        let pos = walk_to(&mut w, Resource::Wood);
        assert!(collect(&mut w, AGENT, Resource::Wood).is_ok());
        let again = collect(&mut w, AGENT, Resource::Wood);
        assert_eq!(
            again,
            Err(AgentError::AlreadyCollected {
                resource: Resource::Wood,
                position: pos,
            })
        );
        assert_eq!(w.pool().get(Resource::Wood), 1);
    }

    #[test]
    fn empty_cell_is_no_resource_here() {
        let mut w = world();
        let result = collect(&mut w, AGENT, Resource::Wood);
        assert_eq!(
            result,
            Err(AgentError::NoResourceHere {
                resource: Resource::Wood,
                position: GridPos::new(0, 0),
            })
        );
    }

    #[test]
    fn diamond_without_iron_pickaxe_changes_nothing() {
        let mut w = world();
        walk_to(&mut w, Resource::Diamond);
        let pool_before = w.pool_snapshot();
        let nodes_before = w.nodes().to_vec();

        let result = collect(&mut w, AGENT, Resource::Diamond);
        assert_eq!(
            result,
            Err(AgentError::MissingTool {
                resource: Resource::Diamond,
                tool: Tool::IronPickaxe,
            })
        );
        assert_eq!(
            result.err().and_then(|e| e.rejection_reason()),
            Some(gridcraft_types::RejectionReason::PreconditionNotMet)
        );
        assert_eq!(w.pool_snapshot(), pool_before);
        assert_eq!(w.nodes(), nodes_before.as_slice());
        assert!(!w.is_terminated());
    }

    #[test]
    fn diamond_with_iron_pickaxe_terminates() {
        let mut w = world();
        w.mark_built(Tool::IronPickaxe);
        walk_to(&mut w, Resource::Diamond);
        let receipt = collect(&mut w, AGENT, Resource::Diamond);
        assert!(receipt.is_ok_and(|r| r.terminal));
        assert!(w.is_terminated());
        assert_eq!(w.pool().get(Resource::Diamond), 1);
    }

    #[test]
    fn collectible_resources_track_tools() {
        let mut w = world();
        assert_eq!(collectible_resources(&w), vec![Resource::Wood]);
        w.mark_built(Tool::WoodPickaxe);
        assert_eq!(
            collectible_resources(&w),
            vec![Resource::Wood, Resource::Stone, Resource::Coal]
        );
        assert_eq!(missing_tools(&w, Resource::Iron), vec![Tool::StonePickaxe]);
        assert!(!can_collect(&w, Resource::Diamond));
    }

    #[test]
    fn unknown_agent_is_a_world_error() {
        let mut w = world();
        let result = collect(&mut w, AgentId::new(42), Resource::Wood);
        assert!(matches!(result, Err(AgentError::World(_))));
        assert_eq!(result.err().and_then(|e| e.rejection_reason()), None);
    }
}
