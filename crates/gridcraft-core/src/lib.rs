//! Action execution, configuration, and planner views for the Gridcraft
//! simulation.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with defaults for the standard world.
//! - [`error`] -- [`CoreError`], wrapping world, agent and config errors.
//! - [`executor`] -- [`ActionExecutor`], the per-step entry point.
//! - [`shared`] -- [`SharedWorld`], the serialization point for concurrent
//!   callers.
//! - [`view`] -- [`PlannerView`], the aggregate handed to planners.

pub mod config;
pub mod error;
pub mod executor;
pub mod shared;
pub mod view;

pub use config::{ConfigError, SimulationConfig};
pub use error::CoreError;
pub use executor::ActionExecutor;
pub use shared::SharedWorld;
pub use view::{AgentView, NearestNode, PlannerView, planner_view};
