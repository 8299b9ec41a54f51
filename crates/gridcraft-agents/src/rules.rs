//! The static rule tables shared by collection and crafting.
//!
//! | Tool            | Resources consumed     | Tools required |
//! |-----------------|------------------------|----------------|
//! | `table`         | wood 2                 | --             |
//! | `wood_pickaxe`  | wood 2                 | table          |
//! | `stone_pickaxe` | wood 1, stone 1        | table          |
//! | `furnace`       | stone 4                | table          |
//! | `iron_pickaxe`  | coal 1, wood 1, iron 1 | furnace        |
//!
//! | Resource  | Tools required to collect |
//! |-----------|---------------------------|
//! | `wood`    | --                        |
//! | `stone`   | wood pickaxe              |
//! | `coal`    | wood pickaxe              |
//! | `iron`    | stone pickaxe             |
//! | `diamond` | iron pickaxe              |
//!
//! Collecting [`TERMINAL_RESOURCE`] ends the episode.

use std::collections::{BTreeMap, BTreeSet};

use gridcraft_types::{Prerequisite, Resource, Tool, ToolRecipe};

use crate::error::AgentError;

/// The resource whose collection ends the episode.
pub const TERMINAL_RESOURCE: Resource = Resource::Diamond;

/// Order in which tools are recommended.
pub const TOOL_PRIORITY: [Tool; 5] = Tool::ALL;

// ---------------------------------------------------------------------------
// ToolRule
// ---------------------------------------------------------------------------

/// What building one tool takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRule {
    /// The tool produced.
    pub tool: Tool,
    /// Resources withdrawn from the shared pool (resource -> quantity).
    pub consumes: BTreeMap<Resource, u32>,
    /// Tools that must already be built. Never consumed.
    pub requires: Vec<Tool>,
}

impl ToolRule {
    /// The rule as a flat prerequisite list, tools first.
    pub fn prerequisites(&self) -> Vec<Prerequisite> {
        self.requires
            .iter()
            .map(|&tool| Prerequisite::Tool { tool })
            .chain(
                self.consumes
                    .iter()
                    .map(|(&resource, &amount)| Prerequisite::Resource { resource, amount }),
            )
            .collect()
    }
}

/// Look up the build rule for `tool`.
pub fn rule_for(tool: Tool) -> ToolRule {
    let (consumes, requires) = match tool {
        Tool::Table => (BTreeMap::from([(Resource::Wood, 2)]), vec![]),
        Tool::WoodPickaxe => (BTreeMap::from([(Resource::Wood, 2)]), vec![Tool::Table]),
        Tool::StonePickaxe => (
            BTreeMap::from([(Resource::Wood, 1), (Resource::Stone, 1)]),
            vec![Tool::Table],
        ),
        Tool::Furnace => (BTreeMap::from([(Resource::Stone, 4)]), vec![Tool::Table]),
        Tool::IronPickaxe => (
            BTreeMap::from([(Resource::Coal, 1), (Resource::Wood, 1), (Resource::Iron, 1)]),
            vec![Tool::Furnace],
        ),
    };
    ToolRule {
        tool,
        consumes,
        requires,
    }
}

/// Every tool with its prerequisite list, in priority order.
pub fn recipes() -> Vec<ToolRecipe> {
    TOOL_PRIORITY
        .into_iter()
        .map(|tool| ToolRecipe {
            tool,
            prerequisites: rule_for(tool).prerequisites(),
        })
        .collect()
}

/// Tools that must be built before `resource` can be collected.
pub const fn required_tools(resource: Resource) -> &'static [Tool] {
    match resource {
        Resource::Wood => &[],
        Resource::Stone | Resource::Coal => &[Tool::WoodPickaxe],
        Resource::Iron => &[Tool::StonePickaxe],
        Resource::Diamond => &[Tool::IronPickaxe],
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Verify that the tool-requirement graph is acyclic and that every tool
/// can eventually be built starting from nothing.
///
/// Returns the tools in a valid build order.
pub fn validate_prerequisite_graph() -> Result<Vec<Tool>, AgentError> {
    let order = topological_order()?;

    // Replay progression: a tool becomes buildable once its required tools
    // are built and every consumed resource is collectible.
    let mut built: BTreeSet<Tool> = BTreeSet::new();
    loop {
        let before = built.len();
        for tool in TOOL_PRIORITY {
            if built.contains(&tool) {
                continue;
            }
            let rule = rule_for(tool);
            let tools_ready = rule.requires.iter().all(|t| built.contains(t));
            let resources_ready = rule
                .consumes
                .keys()
                .all(|&r| required_tools(r).iter().all(|t| built.contains(t)));
            if tools_ready && resources_ready {
                built.insert(tool);
            }
        }
        if built.len() == before {
            break;
        }
    }
    if let Some(&tool) = TOOL_PRIORITY.iter().find(|t| !built.contains(t)) {
        return Err(AgentError::UnreachableTool { tool });
    }
    Ok(order)
}

/// Kahn's algorithm over the tool-requires edges.
fn topological_order() -> Result<Vec<Tool>, AgentError> {
    let mut remaining: BTreeMap<Tool, BTreeSet<Tool>> = TOOL_PRIORITY
        .into_iter()
        .map(|tool| (tool, rule_for(tool).requires.into_iter().collect()))
        .collect();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready: Vec<Tool> = remaining
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(&tool, _)| tool)
            .collect();
        if ready.is_empty() {
            let tool = remaining.keys().next().copied().unwrap_or(Tool::Table);
            return Err(AgentError::CyclicPrerequisite { tool });
        }
        for tool in ready {
            remaining.remove(&tool);
            for deps in remaining.values_mut() {
                deps.remove(&tool);
            }
            order.push(tool);
        }
    }
    Ok(order)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
