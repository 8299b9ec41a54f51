//! The canonical world state.
//!
//! [`WorldState`] owns agent positions, resource nodes, the shared pool,
//! tool-built flags, the terminal flag and the step counter. It is created
//! and re-randomised by [`WorldState::reset`]; every other mutation goes
//! through the low-level mutators at the bottom of the impl, which the
//! collection gate, crafting resolver and executor call after their own
//! precondition checks.
//!
//! # Node placement
//!
//! Nodes are placed by rejection sampling: draw a random in-bounds cell,
//! accept it if no agent spawns there and no node was placed there before,
//! retry otherwise. Each node gets at most `max_placement_attempts` draws;
//! after that the node goes on a cell chosen uniformly among those still
//! free. A layout asking for more nodes than free cells is refused up
//! front. The RNG is seeded from `(seed, episode)`, so the same seed always
//! produces the same sequence of layouts.

use std::collections::{BTreeMap, BTreeSet};

use gridcraft_types::{
    AgentId, AgentSnapshot, Direction, GridPos, NodeId, NodeRecord, Resource, Tool, WorldSnapshot,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::WorldError;
use crate::pathfinding::GridMap;
use crate::pool::ResourcePool;

/// Grid projection code for an empty cell.
pub const EMPTY_CELL: i32 = 0;

/// Grid projection code for a cell holding at least one agent.
pub const AGENT_CELL: i32 = -1;

/// Largest accepted width or height.
pub const MAX_GRID_DIMENSION: u32 = 1024;

// ---------------------------------------------------------------------------
// WorldLayout
// ---------------------------------------------------------------------------

/// Static parameters of a world: size, population, node counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldLayout {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Number of agents, numbered `agent_1..=agent_<n>`.
    pub agents: u32,
    /// Cell every agent starts on.
    pub spawn: GridPos,
    /// Nodes to place per resource kind.
    pub node_counts: BTreeMap<Resource, u32>,
    /// Random draws per node before falling back to a free-cell scan.
    pub max_placement_attempts: u32,
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            agents: 4,
            spawn: GridPos::new(0, 0),
            node_counts: BTreeMap::from([
                (Resource::Wood, 10),
                (Resource::Stone, 8),
                (Resource::Iron, 6),
                (Resource::Coal, 4),
                (Resource::Diamond, 2),
            ]),
            max_placement_attempts: 1000,
        }
    }
}

impl WorldLayout {
    /// Reject layouts no world can be built from.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::InvalidLayout(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_GRID_DIMENSION || self.height > MAX_GRID_DIMENSION {
            return Err(WorldError::InvalidLayout(format!(
                "grid sides are limited to {MAX_GRID_DIMENSION}, got {}x{}",
                self.width, self.height
            )));
        }
        if self.agents == 0 {
            return Err(WorldError::InvalidLayout(String::from(
                "at least one agent is required",
            )));
        }
        if !self.spawn.in_bounds(self.width, self.height) {
            return Err(WorldError::OutOfBounds {
                position: self.spawn,
                width: self.width,
                height: self.height,
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(WorldError::InvalidLayout(String::from(
                "max_placement_attempts must be positive",
            )));
        }
        Ok(())
    }

    /// Total number of nodes across all kinds.
    pub fn total_nodes(&self) -> u64 {
        self.node_counts
            .values()
            .fold(0u64, |acc, &n| acc.saturating_add(u64::from(n)))
    }

    /// Number of cells nodes may be placed on.
    pub fn free_cells(&self) -> u64 {
        u64::from(self.width)
            .saturating_mul(u64::from(self.height))
            .saturating_sub(1)
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Mutable per-agent state.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AgentState {
    position: GridPos,
    collected: BTreeMap<Resource, u32>,
}

impl AgentState {
    const fn at(position: GridPos) -> Self {
        Self {
            position,
            collected: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorldState
// ---------------------------------------------------------------------------

/// Authoritative state of one world.
#[derive(Debug, Clone)]
pub struct WorldState {
    layout: WorldLayout,
    seed: u64,
    episode: u64,
    agents: BTreeMap<AgentId, AgentState>,
    nodes: Vec<NodeRecord>,
    pool: ResourcePool,
    tools_built: BTreeMap<Tool, bool>,
    terminated: bool,
    step: u64,
}

impl WorldState {
    /// Build a world from `layout` and run the first reset.
    pub fn new(layout: WorldLayout, seed: u64) -> Result<Self, WorldError> {
        layout.validate()?;
        let agents = AgentId::sequence(layout.agents)
            .map(|id| (id, AgentState::at(layout.spawn)))
            .collect();
        let mut world = Self {
            layout,
            seed,
            episode: 0,
            agents,
            nodes: Vec::new(),
            pool: ResourcePool::new(),
            tools_built: Tool::ALL.into_iter().map(|t| (t, false)).collect(),
            terminated: false,
            step: 0,
        };
        world.reset()?;
        Ok(world)
    }

    /// Start a new episode with an RNG derived from `(seed, episode)`.
    ///
    /// On failure the previous state is left untouched and the episode
    /// counter does not advance.
    pub fn reset(&mut self) -> Result<(), WorldError> {
        let mut rng = StdRng::seed_from_u64(episode_seed(self.seed, self.episode));
        self.reset_with_rng(&mut rng)?;
        self.episode = self.episode.saturating_add(1);
        Ok(())
    }

    /// Start a new episode, placing nodes with the caller's RNG.
    pub fn reset_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), WorldError> {
        let nodes = place_nodes(&self.layout, rng)?;
        self.nodes = nodes;
        self.pool.clear();
        for built in self.tools_built.values_mut() {
            *built = false;
        }
        for agent in self.agents.values_mut() {
            *agent = AgentState::at(self.layout.spawn);
        }
        self.terminated = false;
        self.step = 0;
        info!(
            episode = self.episode,
            nodes = self.nodes.len(),
            agents = self.agents.len(),
            "world reset"
        );
        Ok(())
    }

    // -------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------

    /// The layout this world was built from.
    pub const fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Base RNG seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of successful resets so far.
    pub const fn episode(&self) -> u64 {
        self.episode
    }

    /// Every agent id, in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    /// Whether `agent` belongs to this world.
    pub fn has_agent(&self, agent: AgentId) -> bool {
        self.agents.contains_key(&agent)
    }

    /// Current cell of `agent`.
    pub fn agent_position(&self, agent: AgentId) -> Result<GridPos, WorldError> {
        self.agents
            .get(&agent)
            .map(|a| a.position)
            .ok_or(WorldError::UnknownAgent(agent))
    }

    /// Per-resource units collected by `agent` this episode.
    pub fn collection_counts(&self, agent: AgentId) -> Result<&BTreeMap<Resource, u32>, WorldError> {
        self.agents
            .get(&agent)
            .map(|a| &a.collected)
            .ok_or(WorldError::UnknownAgent(agent))
    }

    /// Every agent with its position and collection counters.
    pub fn agents(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .map(|(&id, state)| AgentSnapshot {
                id,
                position: state.position,
                collected: state.collected.clone(),
            })
            .collect()
    }

    /// Every node placed this episode, collected or not.
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Nodes of one resource kind.
    pub fn nodes_of(&self, resource: Resource) -> impl Iterator<Item = &NodeRecord> + '_ {
        self.nodes.iter().filter(move |n| n.resource == resource)
    }

    /// Nodes still available for collection.
    pub fn uncollected_nodes(&self) -> Vec<NodeRecord> {
        self.nodes.iter().filter(|n| !n.collected).copied().collect()
    }

    /// Nodes placed on `pos`.
    pub fn nodes_at(&self, pos: GridPos) -> impl Iterator<Item = &NodeRecord> + '_ {
        self.nodes.iter().filter(move |n| n.position == pos)
    }

    /// The node of `resource` on `pos`, preferring an uncollected one.
    pub fn node_at(&self, pos: GridPos, resource: Resource) -> Option<&NodeRecord> {
        let mut matching = self.nodes_at(pos).filter(|n| n.resource == resource);
        let first = matching.next()?;
        if first.collected {
            Some(matching.find(|n| !n.collected).unwrap_or(first))
        } else {
            Some(first)
        }
    }

    /// The shared pool.
    pub const fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Pool counts for every resource kind.
    pub fn pool_snapshot(&self) -> BTreeMap<Resource, u32> {
        self.pool.snapshot()
    }

    /// Whether `tool` has been built this episode.
    pub fn is_built(&self, tool: Tool) -> bool {
        self.tools_built.get(&tool).copied().unwrap_or(false)
    }

    /// Built flag for every tool.
    pub fn tools_built(&self) -> BTreeMap<Tool, bool> {
        self.tools_built.clone()
    }

    /// Whether the terminal resource has been collected.
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Actions applied since the last reset.
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Integer map indexed `[y][x]`.
    ///
    /// Empty cells are [`EMPTY_CELL`], uncollected nodes carry their
    /// [`Resource::grid_code`], and agent cells are overlaid with
    /// [`AGENT_CELL`].
    pub fn grid_projection(&self) -> Vec<Vec<i32>> {
        let row = vec![EMPTY_CELL; to_index(self.layout.width)];
        let mut grid = vec![row; to_index(self.layout.height)];
        let nodes = self.nodes.iter().filter(|n| !n.collected);
        for (pos, code) in nodes.map(|n| (n.position, n.resource.grid_code())).chain(
            self.agents
                .values()
                .map(|a| (a.position, AGENT_CELL)),
        ) {
            if let Some(cell) = grid
                .get_mut(to_index(pos.y))
                .and_then(|r| r.get_mut(to_index(pos.x)))
            {
                *cell = code;
            }
        }
        grid
    }

    /// Full read-only view for planners.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            step: self.step,
            width: self.layout.width,
            height: self.layout.height,
            agents: self.agents(),
            nodes: self.uncollected_nodes(),
            pool: self.pool_snapshot(),
            tools_built: self.tools_built(),
            terminated: self.terminated,
        }
    }

    // -------------------------------------------------------------------
    // Mutators (reached only after gate/resolver/executor checks)
    // -------------------------------------------------------------------

    /// Move `agent` one cell, clamped to the grid.
    ///
    /// Returns the new position and whether the move was clamped.
    pub fn move_agent(
        &mut self,
        agent: AgentId,
        direction: Direction,
    ) -> Result<(GridPos, bool), WorldError> {
        let (width, height) = (self.layout.width, self.layout.height);
        let state = self
            .agents
            .get_mut(&agent)
            .ok_or(WorldError::UnknownAgent(agent))?;
        let (next, clamped) = state.position.step_clamped(direction, width, height);
        state.position = next;
        debug!(%agent, %direction, x = next.x, y = next.y, clamped, "agent moved");
        Ok((next, clamped))
    }

    /// Flag a node as collected. Returns `false` if it already was.
    pub fn mark_collected(&mut self, node: NodeId) -> Result<bool, WorldError> {
        let record = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node)
            .ok_or(WorldError::UnknownNode(node))?;
        let newly = !record.collected;
        record.collected = true;
        Ok(newly)
    }

    /// Flag a tool as built. Returns `false` if it already was.
    pub fn mark_built(&mut self, tool: Tool) -> bool {
        let entry = self.tools_built.entry(tool).or_insert(false);
        let newly = !*entry;
        *entry = true;
        newly
    }

    /// Mutable access to the shared pool.
    pub const fn pool_mut(&mut self) -> &mut ResourcePool {
        &mut self.pool
    }

    /// Count one unit of `resource` collected by `agent`.
    pub fn record_collection(&mut self, agent: AgentId, resource: Resource) -> Result<u32, WorldError> {
        let state = self
            .agents
            .get_mut(&agent)
            .ok_or(WorldError::UnknownAgent(agent))?;
        let count = state.collected.entry(resource).or_insert(0);
        *count = count
            .checked_add(1)
            .ok_or_else(|| WorldError::ArithmeticOverflow {
                context: format!("collection counter for {agent}"),
            })?;
        Ok(*count)
    }

    /// End the episode. Idempotent.
    pub fn terminate(&mut self) {
        if !self.terminated {
            info!(episode = self.episode, step = self.step, "episode terminated");
        }
        self.terminated = true;
    }

    /// Count one applied action. Returns the new step number.
    pub const fn advance_step(&mut self) -> u64 {
        self.step = self.step.saturating_add(1);
        self.step
    }
}

impl GridMap for WorldState {
    fn width(&self) -> u32 {
        self.layout.width
    }

    fn height(&self) -> u32 {
        self.layout.height
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Mix the base seed with the episode number.
const fn episode_seed(seed: u64, episode: u64) -> u64 {
    seed ^ episode.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn to_index(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Place every node of `layout` on a distinct free cell.
fn place_nodes<R: Rng + ?Sized>(
    layout: &WorldLayout,
    rng: &mut R,
) -> Result<Vec<NodeRecord>, WorldError> {
    let capacity = || WorldError::Capacity {
        requested: layout.total_nodes(),
        free: layout.free_cells(),
    };
    if layout.total_nodes() > layout.free_cells() {
        return Err(capacity());
    }

    let mut occupied = BTreeSet::from([layout.spawn]);
    let mut nodes = Vec::new();
    let mut next_id: u32 = 0;

    for resource in Resource::ALL {
        let count = layout.node_counts.get(&resource).copied().unwrap_or(0);
        for _ in 0..count {
            let drawn = (0..layout.max_placement_attempts)
                .map(|_| {
                    GridPos::new(
                        rng.random_range(0..layout.width),
                        rng.random_range(0..layout.height),
                    )
                })
                .find(|candidate| !occupied.contains(candidate));
            let position = match drawn {
                Some(cell) => cell,
                None => pick_free_cell(layout, &occupied, rng).ok_or_else(capacity)?,
            };
            occupied.insert(position);
            nodes.push(NodeRecord {
                id: NodeId::new(next_id),
                resource,
                position,
                collected: false,
            });
            next_id = next_id.saturating_add(1);
        }
    }
    Ok(nodes)
}

/// A cell chosen uniformly among those not in `occupied`.
fn pick_free_cell<R: Rng + ?Sized>(
    layout: &WorldLayout,
    occupied: &BTreeSet<GridPos>,
    rng: &mut R,
) -> Option<GridPos> {
    let free: Vec<GridPos> = (0..layout.height)
        .flat_map(|y| (0..layout.width).map(move |x| GridPos::new(x, y)))
        .filter(|cell| !occupied.contains(cell))
        .collect();
    if free.is_empty() {
        return None;
    }
    free.get(rng.random_range(0..free.len())).copied()
}
