//! The per-step entry point.
//!
//! [`ActionExecutor`] receives one [`ActionRequest`] at a time, dispatches
//! it to the world, the collection gate or the crafting resolver, and
//! returns an [`ActionResult`]. Gameplay rejections are ordinary results
//! with `success = false`; only contract violations (unknown agents,
//! out-of-bounds targets) come back as [`CoreError`].
//!
//! Once the terminal resource has been collected every non-`Wait` action
//! is rejected with [`RejectionReason::EpisodeOver`] until the next reset.

use gridcraft_agents::{AgentError, collection, crafting, validate_prerequisite_graph};
use gridcraft_types::{
    Action, ActionRequest, ActionResult, AgentId, Direction, GridPos, RejectionDetails,
    RejectionReason, ToolRecommendation, WorldSnapshot,
};
use gridcraft_world::{WorldError, WorldState, shortest_path};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::CoreError;
use crate::view::{PlannerView, planner_view};

/// What one dispatched action did, before it is wrapped into a result.
struct Outcome {
    reward: u32,
    clamped: bool,
    message: String,
}

/// Contract violations outside, gameplay rejections inside.
type Dispatch = Result<Result<Outcome, RejectionDetails>, CoreError>;

/// Applies agent actions to an owned [`WorldState`].
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    world: WorldState,
    collect_reward: u32,
}

impl ActionExecutor {
    /// Wrap an existing world.
    pub const fn new(world: WorldState, collect_reward: u32) -> Self {
        Self {
            world,
            collect_reward,
        }
    }

    /// Validate the rule tables and build a world from configuration.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, CoreError> {
        validate_prerequisite_graph()?;
        let layout = config.layout()?;
        let world = WorldState::new(layout, config.world.seed)?;
        info!(
            width = config.world.width,
            height = config.world.height,
            agents = config.population.agents,
            seed = config.world.seed,
            "world created"
        );
        Ok(Self::new(world, config.rewards.collect))
    }

    /// The world being driven.
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// Apply one request and advance the step counter.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::World`] if the agent is unknown. Nothing is
    /// mutated in that case.
    pub fn apply(&mut self, request: ActionRequest) -> Result<ActionResult, CoreError> {
        let ActionRequest { agent_id, action } = request;
        self.world.agent_position(agent_id)?;

        let outcome = if self.world.is_terminated() && action != Action::Wait {
            Err(RejectionDetails {
                reason: RejectionReason::EpisodeOver,
                detail: String::from("the episode is over"),
            })
        } else {
            self.dispatch(agent_id, action)?
        };

        let step = self.world.advance_step();
        let position = self.world.agent_position(agent_id)?;
        let terminal = self.world.is_terminated();
        let pool = self.world.pool_snapshot();

        let result = match outcome {
            Ok(Outcome {
                reward,
                clamped,
                message,
            }) => {
                debug!(step, agent = %agent_id, %action, reward, clamped, "action applied");
                ActionResult {
                    step,
                    agent: agent_id,
                    action,
                    success: true,
                    reward,
                    terminal,
                    position,
                    clamped,
                    pool,
                    rejection: None,
                    message,
                }
            }
            Err(rejection) => {
                debug!(
                    step,
                    agent = %agent_id,
                    %action,
                    reason = ?rejection.reason,
                    detail = %rejection.detail,
                    "action rejected"
                );
                let message = format!("{agent_id} could not {action}: {}", rejection.detail);
                ActionResult {
                    step,
                    agent: agent_id,
                    action,
                    success: false,
                    reward: 0,
                    terminal,
                    position,
                    clamped: false,
                    pool,
                    rejection: Some(rejection),
                    message,
                }
            }
        };
        Ok(result)
    }

    /// Route one action to the component that owns it.
    fn dispatch(&mut self, agent: AgentId, action: Action) -> Dispatch {
        match action {
            Action::Move { direction } => {
                let (position, clamped) = self.world.move_agent(agent, direction)?;
                let message = if clamped {
                    format!("{agent} is at the edge and stays at {position}")
                } else {
                    format!("{agent} moved {direction} to {position}")
                };
                Ok(Ok(Outcome {
                    reward: 0,
                    clamped,
                    message,
                }))
            }
            Action::Collect { resource } => {
                match collection::collect(&mut self.world, agent, resource) {
                    Ok(receipt) => {
                        let message = if receipt.terminal {
                            format!("{agent} collected {resource}; the episode is complete")
                        } else {
                            format!(
                                "{agent} collected {resource} (pool: {})",
                                receipt.pool_count
                            )
                        };
                        Ok(Ok(Outcome {
                            reward: self.collect_reward,
                            clamped: false,
                            message,
                        }))
                    }
                    Err(e) => reject(e),
                }
            }
            Action::Craft { tool } => match crafting::build(&mut self.world, tool) {
                Ok(_) => Ok(Ok(Outcome {
                    reward: 0,
                    clamped: false,
                    message: format!("{agent} built {tool}"),
                })),
                Err(e) => reject(e),
            },
            Action::Wait => Ok(Ok(Outcome {
                reward: 0,
                clamped: false,
                message: format!("{agent} waits"),
            })),
        }
    }

    /// Apply `requests` in order.
    ///
    /// Every agent id is checked before the first request is applied, so a
    /// batch naming an unknown agent fails without touching the world.
    pub fn apply_batch(&mut self, requests: &[ActionRequest]) -> Result<Vec<ActionResult>, CoreError> {
        if let Some(unknown) = requests
            .iter()
            .map(|r| r.agent_id)
            .find(|&id| !self.world.has_agent(id))
        {
            return Err(WorldError::UnknownAgent(unknown).into());
        }
        requests.iter().map(|&r| self.apply(r)).collect()
    }

    /// Shortest move sequence from `agent`'s cell to `target`.
    pub fn path(&self, agent: AgentId, target: GridPos) -> Result<Vec<Direction>, CoreError> {
        let start = self.world.agent_position(agent)?;
        Ok(shortest_path(&self.world, start, target)?)
    }

    /// Walk `agent` to `target`, one move per step.
    ///
    /// Stops early if a move is rejected or the episode ends.
    pub fn move_to(&mut self, agent: AgentId, target: GridPos) -> Result<Vec<ActionResult>, CoreError> {
        let moves = self.path(agent, target)?;
        let mut results = Vec::with_capacity(moves.len());
        for direction in moves {
            let result = self.apply(ActionRequest::new(agent, Action::Move { direction }))?;
            let stop = !result.success || result.terminal;
            results.push(result);
            if stop {
                break;
            }
        }
        Ok(results)
    }

    /// Start a new episode.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        self.world.reset()?;
        Ok(())
    }

    /// Read-only world snapshot.
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Next tool to build and what it lacks.
    pub fn recommendation(&self) -> ToolRecommendation {
        crafting::recommend_next(&self.world)
    }

    /// Aggregate view for external planners.
    pub fn view(&self) -> PlannerView {
        planner_view(&self.world)
    }
}

/// Turn a gameplay error into a rejection, or propagate a contract
/// violation.
fn reject(error: AgentError) -> Dispatch {
    match error.rejection_reason() {
        Some(reason) => Ok(Err(RejectionDetails {
            reason,
            detail: error.to_string(),
        })),
        None => Err(error.into()),
    }
}
