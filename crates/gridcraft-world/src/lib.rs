//! Grid, resource nodes, shared pool, and pathfinding for the Gridcraft
//! simulation.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world operations.
//! - [`pool`] -- [`ResourcePool`], the single shared inventory with
//!   checked arithmetic.
//! - [`state`] -- [`WorldState`]: agents, nodes, tool flags, reset and the
//!   integer grid projection.
//! - [`pathfinding`] -- A* over the 4-connected grid.

pub mod error;
pub mod pathfinding;
pub mod pool;
pub mod state;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use pathfinding::{GridMap, OpenGrid, manhattan, path_positions, shortest_path};
pub use pool::ResourcePool;
pub use state::{AGENT_CELL, EMPTY_CELL, MAX_GRID_DIMENSION, WorldLayout, WorldState};
