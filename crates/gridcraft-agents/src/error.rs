//! Error types for the gridcraft-agents crate.
//!
//! Gameplay rejections (missing tools, empty cells, double builds) and
//! world-level contract violations share one enum. Use
//! [`AgentError::rejection_reason`] to tell them apart.

use std::collections::BTreeMap;

use gridcraft_types::{GridPos, RejectionReason, Resource, Tool};
use gridcraft_world::WorldError;

/// Errors that can occur while collecting or building.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// Collecting `resource` requires a tool that has not been built.
    #[error("collecting {resource} requires {tool}")]
    MissingTool {
        /// The resource being collected.
        resource: Resource,
        /// The first unbuilt required tool.
        tool: Tool,
    },

    /// No node of the requested kind sits on the agent's cell.
    #[error("no {resource} at {position}")]
    NoResourceHere {
        /// The requested resource.
        resource: Resource,
        /// The agent's cell.
        position: GridPos,
    },

    /// The matching node on the agent's cell has already been collected.
    #[error("{resource} at {position} has already been collected")]
    AlreadyCollected {
        /// The requested resource.
        resource: Resource,
        /// The agent's cell.
        position: GridPos,
    },

    /// The tool has already been built this episode.
    #[error("{0} has already been built")]
    AlreadyBuilt(Tool),

    /// A tool-valued prerequisite has not been built.
    #[error("building {tool} requires {required}")]
    ToolNotBuilt {
        /// The tool being built.
        tool: Tool,
        /// The unbuilt prerequisite.
        required: Tool,
    },

    /// The shared pool does not cover the tool's resource cost.
    #[error("building {tool} lacks resources: {missing:?}")]
    InsufficientResources {
        /// The tool being built.
        tool: Tool,
        /// Shortfall per resource.
        missing: BTreeMap<Resource, u32>,
    },

    /// The prerequisite table contains a cycle through `tool`.
    #[error("prerequisite cycle through {tool}")]
    CyclicPrerequisite {
        /// A tool on the cycle.
        tool: Tool,
    },

    /// No sequence of collections and builds can ever produce `tool`.
    #[error("{tool} can never be built from the collection rules")]
    UnreachableTool {
        /// The unreachable tool.
        tool: Tool,
    },

    /// A world-level operation failed.
    #[error(transparent)]
    World(#[from] WorldError),
}

impl AgentError {
    /// The rejection code reported to planners, or `None` for contract
    /// violations that are not ordinary gameplay outcomes.
    pub const fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            Self::MissingTool { .. }
            | Self::ToolNotBuilt { .. }
            | Self::InsufficientResources { .. } => Some(RejectionReason::PreconditionNotMet),
            Self::NoResourceHere { .. } => Some(RejectionReason::NoResourceHere),
            Self::AlreadyCollected { .. } => Some(RejectionReason::AlreadyCollected),
            Self::AlreadyBuilt(_) => Some(RejectionReason::AlreadyBuilt),
            Self::CyclicPrerequisite { .. } | Self::UnreachableTool { .. } | Self::World(_) => {
                None
            }
        }
    }
}
