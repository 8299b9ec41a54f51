//! Shared access to one executor from concurrent callers.
//!
//! [`SharedWorld`] wraps an [`ActionExecutor`] in an
//! `Arc<tokio::sync::Mutex<_>>`. Each call holds the lock for its whole
//! check-then-act sequence, so two builds cannot both pass the balance
//! check against the same pool and two collects cannot take the same node.

use std::sync::Arc;

use gridcraft_types::{
    Action, ActionRequest, ActionResult, AgentId, Direction, GridPos, Resource, Tool,
    ToolRecommendation, WorldSnapshot,
};
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::executor::ActionExecutor;
use crate::view::PlannerView;

/// A cloneable handle to one serialized executor.
#[derive(Debug, Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<ActionExecutor>>,
}

impl SharedWorld {
    /// Take ownership of `executor`.
    pub fn new(executor: ActionExecutor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(executor)),
        }
    }

    /// Apply one request.
    pub async fn apply(&self, request: ActionRequest) -> Result<ActionResult, CoreError> {
        self.inner.lock().await.apply(request)
    }

    /// Apply several requests under a single lock.
    pub async fn apply_batch(
        &self,
        requests: &[ActionRequest],
    ) -> Result<Vec<ActionResult>, CoreError> {
        self.inner.lock().await.apply_batch(requests)
    }

    /// Build `tool` on behalf of `agent`.
    pub async fn build(&self, agent: AgentId, tool: Tool) -> Result<ActionResult, CoreError> {
        self.apply(ActionRequest::new(agent, Action::Craft { tool }))
            .await
    }

    /// Collect `resource` on behalf of `agent`.
    pub async fn collect(
        &self,
        agent: AgentId,
        resource: Resource,
    ) -> Result<ActionResult, CoreError> {
        self.apply(ActionRequest::new(agent, Action::Collect { resource }))
            .await
    }

    /// Plan and walk `agent` to `target` without interleaving other callers.
    pub async fn move_to(
        &self,
        agent: AgentId,
        target: GridPos,
    ) -> Result<Vec<ActionResult>, CoreError> {
        self.inner.lock().await.move_to(agent, target)
    }

    /// Shortest move sequence from `agent`'s cell to `target`.
    pub async fn path(&self, agent: AgentId, target: GridPos) -> Result<Vec<Direction>, CoreError> {
        self.inner.lock().await.path(agent, target)
    }

    /// Start a new episode.
    pub async fn reset(&self) -> Result<(), CoreError> {
        self.inner.lock().await.reset()
    }

    /// Read-only world snapshot.
    pub async fn snapshot(&self) -> WorldSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Next tool to build and what it lacks.
    pub async fn recommendation(&self) -> ToolRecommendation {
        self.inner.lock().await.recommendation()
    }

    /// Aggregate view for external planners.
    pub async fn view(&self) -> PlannerView {
        self.inner.lock().await.view()
    }

    /// Run `f` with exclusive access to the executor.
    pub async fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ActionExecutor) -> R,
    {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
