//! The line protocol spoken on stdin and stdout.
//!
//! Each input line holds one [`Command`] as an externally tagged JSON object,
//! for example `{"act": {"agent_id": 1, "action": {"kind": "wait"}}}` or
//! `{"view": null}`. Each command yields exactly one [`Response`] line.
//! A line that fails to parse, or a request the executor refuses, yields
//! `{"error": {"message": ...}}` and the loop carries on.

use gridcraft_core::{PlannerView, SharedWorld};
use gridcraft_types::{
    ActionRequest, ActionResult, AgentId, Direction, GridPos, ToolRecommendation, WorldSnapshot,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Target of a `move_to` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTo {
    /// The agent to walk.
    pub agent_id: AgentId,
    /// Destination cell.
    pub target: GridPos,
}

/// One request read from stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Apply a single action.
    Act(ActionRequest),
    /// Apply several actions in order under one lock.
    Batch(Vec<ActionRequest>),
    /// Walk an agent along the shortest path to a cell.
    MoveTo(MoveTo),
    /// Plan a path without moving.
    Path(MoveTo),
    /// Return the planner view.
    View,
    /// Return the raw world snapshot.
    Snapshot,
    /// Return the next-tool recommendation.
    Recommend,
    /// Start a new episode.
    Reset,
}

/// One line written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// Outcome of an `act` command.
    Result(ActionResult),
    /// Outcomes of a `batch` or `move_to` command, in order.
    Results(Vec<ActionResult>),
    /// Planned moves.
    Path(Vec<Direction>),
    /// Planner view.
    View(Box<PlannerView>),
    /// World snapshot.
    Snapshot(Box<WorldSnapshot>),
    /// Next-tool recommendation.
    Recommendation(ToolRecommendation),
    /// A new episode started.
    Reset {
        /// Episode counter after the reset.
        episode: u64,
        /// Base seed the episode layout was derived from.
        seed: u64,
    },
    /// The line could not be served.
    Error {
        /// Human-readable cause.
        message: String,
    },
}

impl From<EngineError> for Response {
    fn from(err: EngineError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }
}

/// Parse one input line.
///
/// # Errors
///
/// Returns [`EngineError::Json`] when the line is not a valid command.
pub fn parse(line: &str) -> Result<Command, EngineError> {
    Ok(serde_json::from_str(line)?)
}

/// Run `command` against `world`.
///
/// # Errors
///
/// Returns [`EngineError::Core`] when the executor rejects the request as a
/// contract violation (unknown agent, out-of-bounds target, failed reset).
pub async fn execute(world: &SharedWorld, command: Command) -> Result<Response, EngineError> {
    let response = match command {
        Command::Act(request) => Response::Result(world.apply(request).await?),
        Command::Batch(requests) => Response::Results(world.apply_batch(&requests).await?),
        Command::MoveTo(MoveTo { agent_id, target }) => {
            Response::Results(world.move_to(agent_id, target).await?)
        }
        Command::Path(MoveTo { agent_id, target }) => {
            Response::Path(world.path(agent_id, target).await?)
        }
        Command::View => Response::View(Box::new(world.view().await)),
        Command::Snapshot => Response::Snapshot(Box::new(world.snapshot().await)),
        Command::Recommend => Response::Recommendation(world.recommendation().await),
        Command::Reset => {
            world.reset().await?;
            let (episode, seed) = world
                .with(|ex| (ex.world().episode(), ex.world().seed()))
                .await;
            Response::Reset { episode, seed }
        }
    };
    Ok(response)
}

/// Serve one raw line, folding every failure into [`Response::Error`].
pub async fn handle_line(world: &SharedWorld, line: &str) -> Response {
    let command = match parse(line) {
        Ok(command) => command,
        Err(err) => {
            warn!(error = %err, "malformed command line");
            return err.into();
        }
    };
    debug!(?command, "command received");
    match execute(world, command).await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "command failed");
            err.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use gridcraft_core::{ActionExecutor, SimulationConfig};
    use gridcraft_types::{Action, RejectionReason, Tool};

    use super::*;

    fn shared() -> SharedWorld {
        let executor = ActionExecutor::from_config(&SimulationConfig::default())
            .unwrap_or_else(|e| panic!("{e}"));
        SharedWorld::new(executor)
    }

    #[test]
    fn parses_tagged_commands() {
        let act = parse(r#"{"act": {"agent_id": 2, "action": {"kind": "move", "direction": "right"}}}"#);
        assert_eq!(
            act.ok(),
            Some(Command::Act(ActionRequest::new(
                AgentId::new(2),
                Action::Move {
                    direction: Direction::Right
                }
            )))
        );
        assert_eq!(parse(r#"{"view": null}"#).ok(), Some(Command::View));
        assert_eq!(parse(r#""reset""#).ok(), Some(Command::Reset));
        let mv = parse(r#"{"move_to": {"agent_id": 1, "target": {"x": 3, "y": 4}}}"#);
        assert_eq!(
            mv.ok(),
            Some(Command::MoveTo(MoveTo {
                agent_id: AgentId::new(1),
                target: GridPos::new(3, 4),
            }))
        );
    }

    #[tokio::test]
    async fn malformed_line_is_an_error_response() {
        let world = shared();
        let response = handle_line(&world, "{not json").await;
        assert!(matches!(response, Response::Error { .. }));
        // The world is untouched and still serves requests.
        let view = handle_line(&world, r#"{"view": null}"#).await;
        let Response::View(view) = view else {
            panic!("expected a view, got {view:?}");
        };
        assert_eq!(view.step, 0);
    }

    #[tokio::test]
    async fn unknown_agent_is_an_error_response() {
        let world = shared();
        let response = handle_line(
            &world,
            r#"{"act": {"agent_id": 99, "action": {"kind": "wait"}}}"#,
        )
        .await;
        assert!(matches!(response, Response::Error { .. }));
    }

    #[tokio::test]
    async fn rejection_is_a_result_not_an_error() {
        let world = shared();
        let response = handle_line(
            &world,
            r#"{"act": {"agent_id": 1, "action": {"kind": "craft", "tool": "table"}}}"#,
        )
        .await;
        let Response::Result(result) = response else {
            panic!("expected a result, got {response:?}");
        };
        assert!(!result.success);
        assert_eq!(
            result.rejection.map(|r| r.reason),
            Some(RejectionReason::PreconditionNotMet)
        );
        assert!(!world.snapshot().await.tools_built.get(&Tool::Table).copied().unwrap_or(false));
    }

    #[tokio::test]
    async fn move_to_walks_the_path() {
        let world = shared();
        let response = handle_line(
            &world,
            r#"{"move_to": {"agent_id": 1, "target": {"x": 3, "y": 4}}}"#,
        )
        .await;
        let Response::Results(results) = response else {
            panic!("expected results, got {response:?}");
        };
        assert_eq!(results.len(), 7);
        assert_eq!(results.last().map(|r| r.position), Some(GridPos::new(3, 4)));
    }

    #[tokio::test]
    async fn reset_reports_the_new_episode() {
        let world = shared();
        let before = world.with(|ex| ex.world().episode()).await;
        let response = handle_line(&world, r#"{"reset": null}"#).await;
        assert_eq!(
            response,
            Response::Reset {
                episode: before.saturating_add(1),
                seed: SimulationConfig::default().world.seed,
            }
        );
    }

    #[tokio::test]
    async fn batch_naming_unknown_agent_is_rejected_whole() {
        let world = shared();
        let response = handle_line(
            &world,
            r#"{"batch": [
                {"agent_id": 1, "action": {"kind": "move", "direction": "right"}},
                {"agent_id": 99, "action": {"kind": "wait"}}
            ]}"#,
        )
        .await;
        assert!(matches!(response, Response::Error { .. }));
        let snapshot = world.snapshot().await;
        assert_eq!(snapshot.step, 0);
        assert_eq!(
            snapshot.agents.first().map(|a| a.position),
            Some(GridPos::new(0, 0))
        );
    }

    #[tokio::test]
    async fn planner_style_agent_names_are_accepted() {
        let world = shared();
        let response = handle_line(
            &world,
            r#"{"act": {"agent_id": "agent_2", "action": {"kind": "move", "direction": "down"}}}"#,
        )
        .await;
        let Response::Result(result) = response else {
            panic!("expected a result, got {response:?}");
        };
        assert_eq!(result.agent, AgentId::new(2));
        assert_eq!(result.position, GridPos::new(0, 1));
    }

    #[test]
    fn error_response_shape() {
        let json = serde_json::to_value(Response::Error {
            message: "boom".to_owned(),
        })
        .ok();
        assert_eq!(json, Some(serde_json::json!({"error": {"message": "boom"}})));
    }
}
