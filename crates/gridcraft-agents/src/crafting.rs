//! The crafting resolver: tool builds against the shared pool.
//!
//! Builds are atomic check-then-commit. A rejected build leaves the pool
//! and every tool flag exactly as they were; a successful build withdraws
//! each resource-valued prerequisite and sets the tool's built flag. Tool
//! prerequisites only gate, they are never consumed.

use std::collections::BTreeMap;

use gridcraft_types::{RecommendationStatus, Resource, Tool, ToolRecommendation};
use gridcraft_world::WorldState;
use tracing::info;

use crate::error::AgentError;
use crate::rules::{TOOL_PRIORITY, rule_for};

/// What a successful build did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReceipt {
    /// The tool built.
    pub tool: Tool,
    /// Resources withdrawn from the pool.
    pub consumed: BTreeMap<Resource, u32>,
    /// Pool counts after the withdrawal.
    pub pool: BTreeMap<Resource, u32>,
}

/// Per-resource shortfall for building `tool`, zero entries omitted.
pub fn shortfall(world: &WorldState, tool: Tool) -> BTreeMap<Resource, u32> {
    rule_for(tool)
        .consumes
        .into_iter()
        .filter_map(|(resource, required)| {
            let lacking = required.saturating_sub(world.pool().get(resource));
            (lacking > 0).then_some((resource, lacking))
        })
        .collect()
}

/// Tool prerequisites of `tool` that have not been built.
pub fn missing_prerequisites(world: &WorldState, tool: Tool) -> Vec<Tool> {
    rule_for(tool)
        .requires
        .into_iter()
        .filter(|&t| !world.is_built(t))
        .collect()
}

/// Whether every prerequisite of `tool` is satisfied right now.
///
/// Does not look at whether `tool` itself is already built; see
/// [`check_build`] for the full gate.
pub fn can_build(world: &WorldState, tool: Tool) -> bool {
    missing_prerequisites(world, tool).is_empty() && shortfall(world, tool).is_empty()
}

/// Run every build precondition without mutating.
pub fn check_build(world: &WorldState, tool: Tool) -> Result<(), AgentError> {
    if world.is_built(tool) {
        return Err(AgentError::AlreadyBuilt(tool));
    }
    if let Some(&required) = missing_prerequisites(world, tool).first() {
        return Err(AgentError::ToolNotBuilt { tool, required });
    }
    let missing = shortfall(world, tool);
    if !missing.is_empty() {
        return Err(AgentError::InsufficientResources { tool, missing });
    }
    Ok(())
}

/// Build `tool`, withdrawing its resource cost from the shared pool.
pub fn build(world: &mut WorldState, tool: Tool) -> Result<BuildReceipt, AgentError> {
    check_build(world, tool)?;
    let consumed = rule_for(tool).consumes;
    world.pool_mut().remove_all(&consumed)?;
    world.mark_built(tool);

    let pool = world.pool_snapshot();
    info!(%tool, ?consumed, "tool built");

    Ok(BuildReceipt {
        tool,
        consumed,
        pool,
    })
}

/// The first unbuilt tool in priority order and what it still lacks.
pub fn recommend_next(world: &WorldState) -> ToolRecommendation {
    let Some(tool) = TOOL_PRIORITY.into_iter().find(|&t| !world.is_built(t)) else {
        return ToolRecommendation {
            next_tool: None,
            missing: BTreeMap::new(),
            missing_tools: Vec::new(),
            status: RecommendationStatus::Done,
        };
    };
    let missing = shortfall(world, tool);
    let missing_tools = missing_prerequisites(world, tool);
    let status = if missing.is_empty() && missing_tools.is_empty() {
        RecommendationStatus::Ready
    } else {
        RecommendationStatus::NotReady
    };
    ToolRecommendation {
        next_tool: Some(tool),
        missing,
        missing_tools,
        status,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
