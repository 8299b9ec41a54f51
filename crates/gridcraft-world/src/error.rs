//! Error types for the `gridcraft-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use gridcraft_types::{AgentId, GridPos, NodeId, Resource};

/// Errors that can occur during world operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// Resource nodes could not be placed on the free cells of the grid.
    #[error("cannot place {requested} resource nodes on {free} free cells")]
    Capacity {
        /// Total nodes the layout asks for.
        requested: u64,
        /// Cells not occupied by an agent spawn.
        free: u64,
    },

    /// A coordinate lies outside the grid.
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending position.
        position: GridPos,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// The search frontier was exhausted before reaching the goal.
    #[error("no path from {from} to {to}")]
    NoPath {
        /// Origin cell.
        from: GridPos,
        /// Destination cell.
        to: GridPos,
    },

    /// The agent is not part of this world.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// The node is not part of this world.
    #[error("unknown resource node: {0}")]
    UnknownNode(NodeId),

    /// The world layout is unusable (zero-sized grid, no agents, ...).
    #[error("invalid world layout: {0}")]
    InvalidLayout(String),

    /// The shared pool holds less than a withdrawal asked for.
    #[error("insufficient {resource}: requested {requested}, available {available}")]
    InsufficientResource {
        /// The resource being withdrawn.
        resource: Resource,
        /// Amount requested.
        requested: u32,
        /// Amount in the pool.
        available: u32,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Where the overflow occurred.
        context: String,
    },
}
