//! End-to-end scenarios driven through the [`ActionExecutor`].
//!
//! Each test builds a world, applies actions the way an external planner
//! would, and checks the resulting results and world state.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use gridcraft_agents::rules::rule_for;
use gridcraft_core::{ActionExecutor, CoreError, SimulationConfig};
use gridcraft_types::{
    Action, ActionRequest, AgentId, Direction, GridPos, RejectionReason, Resource, Tool,
};
use gridcraft_world::{WorldError, WorldLayout, WorldState, path_positions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const AGENT: AgentId = AgentId::new(1);

fn executor_with(pool: &[(Resource, u32)], built: &[Tool]) -> ActionExecutor {
    let mut world = WorldState::new(WorldLayout::default(), 2024).unwrap();
    for &(resource, amount) in pool {
        world.pool_mut().add(resource, amount).unwrap();
    }
    for &tool in built {
        world.mark_built(tool);
    }
    ActionExecutor::new(world, 10)
}

fn act(ex: &mut ActionExecutor, action: Action) -> gridcraft_types::ActionResult {
    ex.apply(ActionRequest::new(AGENT, action)).unwrap()
}

/// Walk to the nearest uncollected node of `resource` and collect it.
fn harvest(ex: &mut ActionExecutor, resource: Resource) {
    let here = ex.world().agent_position(AGENT).unwrap();
    let target = ex
        .world()
        .nodes_of(resource)
        .filter(|n| !n.collected)
        .min_by_key(|n| (here.manhattan(n.position), n.id))
        .map(|n| n.position)
        .unwrap();
    ex.move_to(AGENT, target).unwrap();
    let result = act(ex, Action::Collect { resource });
    assert!(result.success, "{}", result.message);
}

fn craft(ex: &mut ActionExecutor, tool: Tool) {
    let result = act(ex, Action::Craft { tool });
    assert!(result.success, "{}", result.message);
}

#[test]
fn table_from_two_wood() {
    let mut ex = executor_with(&[(Resource::Wood, 2)], &[]);
    let result = act(&mut ex, Action::Craft { tool: Tool::Table });
    assert!(result.success);
    assert_eq!(result.pool.get(&Resource::Wood).copied(), Some(0));
    assert!(ex.world().is_built(Tool::Table));
}

#[test]
fn stone_pickaxe_from_wood_and_stone() {
    let mut ex = executor_with(&[(Resource::Wood, 1), (Resource::Stone, 1)], &[Tool::Table]);
    let result = act(
        &mut ex,
        Action::Craft {
            tool: Tool::StonePickaxe,
        },
    );
    assert!(result.success);
    assert_eq!(ex.world().pool().get(Resource::Wood), 0);
    assert_eq!(ex.world().pool().get(Resource::Stone), 0);
}

#[test]
fn double_build_is_rejected() {
    let mut ex = executor_with(&[(Resource::Wood, 4)], &[]);
    assert!(act(&mut ex, Action::Craft { tool: Tool::Table }).success);
    let second = act(&mut ex, Action::Craft { tool: Tool::Table });
    assert!(!second.success);
    assert_eq!(
        second.rejection.map(|r| r.reason),
        Some(RejectionReason::AlreadyBuilt)
    );
    assert_eq!(ex.world().pool().get(Resource::Wood), 2);
}

#[test]
fn path_to_three_four_takes_seven_moves() {
    let mut ex = executor_with(&[], &[]);
    let target = GridPos::new(3, 4);
    let path = ex.path(AGENT, target).unwrap();
    assert_eq!(path.len(), 7);
    let cells = path_positions(ex.world(), GridPos::new(0, 0), &path);
    assert_eq!(cells.last().copied(), Some(target));

    let results = ex.move_to(AGENT, target).unwrap();
    assert_eq!(results.len(), 7);
    assert!(results.iter().all(|r| r.success && !r.clamped));
    assert_eq!(ex.world().agent_position(AGENT).unwrap(), target);
    assert_eq!(ex.world().step(), 7);
}

#[test]
fn path_to_own_cell_is_empty() {
    let ex = executor_with(&[], &[]);
    assert!(ex.path(AGENT, GridPos::new(0, 0)).unwrap().is_empty());
}

#[test]
fn diamond_without_pickaxe_is_precondition_not_met() {
    let mut ex = executor_with(&[], &[]);
    let diamond = ex
        .world()
        .nodes_of(Resource::Diamond)
        .next()
        .map(|n| n.position)
        .unwrap();
    ex.move_to(AGENT, diamond).unwrap();
    let before = ex.snapshot();

    let result = act(
        &mut ex,
        Action::Collect {
            resource: Resource::Diamond,
        },
    );
    assert!(!result.success);
    assert!(!result.terminal);
    assert_eq!(
        result.rejection.as_ref().map(|r| r.reason),
        Some(RejectionReason::PreconditionNotMet)
    );
    let after = ex.snapshot();
    assert_eq!(after.pool, before.pool);
    assert_eq!(after.nodes, before.nodes);
    assert_eq!(after.tools_built, before.tools_built);
}

#[test]
fn diamond_with_pickaxe_ends_the_episode() {
    let mut ex = executor_with(&[], &[Tool::IronPickaxe]);
    harvest(&mut ex, Resource::Diamond);
    let snapshot = ex.snapshot();
    assert!(snapshot.terminated);
    assert_eq!(snapshot.pool.get(&Resource::Diamond).copied(), Some(1));

    // The world is inert: only waiting is accepted.
    let moved = act(
        &mut ex,
        Action::Move {
            direction: Direction::Down,
        },
    );
    assert!(!moved.success);
    assert!(moved.terminal);
    assert_eq!(
        moved.rejection.map(|r| r.reason),
        Some(RejectionReason::EpisodeOver)
    );
    assert!(act(&mut ex, Action::Wait).success);

    ex.reset().unwrap();
    assert!(!ex.world().is_terminated());
}

#[test]
fn full_progression_reaches_diamond() {
    let config = SimulationConfig::default();
    let mut ex = ActionExecutor::from_config(&config).unwrap();

    for _ in 0..2 {
        harvest(&mut ex, Resource::Wood);
    }
    craft(&mut ex, Tool::Table);
    for _ in 0..2 {
        harvest(&mut ex, Resource::Wood);
    }
    craft(&mut ex, Tool::WoodPickaxe);
    harvest(&mut ex, Resource::Wood);
    harvest(&mut ex, Resource::Stone);
    craft(&mut ex, Tool::StonePickaxe);
    for _ in 0..4 {
        harvest(&mut ex, Resource::Stone);
    }
    craft(&mut ex, Tool::Furnace);
    harvest(&mut ex, Resource::Wood);
    harvest(&mut ex, Resource::Coal);
    harvest(&mut ex, Resource::Iron);
    craft(&mut ex, Tool::IronPickaxe);

    assert_eq!(ex.world().pool().total(), Some(0));
    assert_eq!(ex.recommendation().next_tool, None);
    harvest(&mut ex, Resource::Diamond);
    assert!(ex.world().is_terminated());
}

#[test]
fn reset_on_tiny_grid_is_capacity_error() {
    let mut config = SimulationConfig::default();
    config.world.width = 4;
    config.world.height = 4;
    let result = ActionExecutor::from_config(&config);
    assert!(matches!(
        result,
        Err(CoreError::World(WorldError::Capacity { .. }))
    ));
}

#[test]
fn batch_applies_in_order() {
    let mut ex = executor_with(&[], &[]);
    let requests: Vec<ActionRequest> = AgentId::sequence(4)
        .map(|id| {
            ActionRequest::new(
                id,
                Action::Move {
                    direction: Direction::Right,
                },
            )
        })
        .collect();
    let results = ex.apply_batch(&requests).unwrap();
    let steps: Vec<u64> = results.iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![1, 2, 3, 4]);
    assert!(results.iter().all(|r| r.position == GridPos::new(1, 0)));
}

/// Drive `ex` with `steps` random requests and check the pool and tool
/// invariants after each one. Returns the number of successful builds.
fn run_random(ex: &mut ActionExecutor, seed: u64, steps: usize) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let agents: Vec<AgentId> = ex.world().agent_ids().collect();
    let mut collected_nodes = 0usize;
    let mut builds = 0usize;

    for _ in 0..steps {
        let agent = agents[rng.random_range(0..agents.len())];
        let action = match rng.random_range(0..4u8) {
            0 => Action::Move {
                direction: Direction::ALL[rng.random_range(0..4)],
            },
            1 => Action::Collect {
                resource: Resource::ALL[rng.random_range(0..5)],
            },
            2 => Action::Craft {
                tool: Tool::ALL[rng.random_range(0..5)],
            },
            _ => Action::Wait,
        };
        let pool_before = ex.world().pool_snapshot();
        let flags_before = ex.world().tools_built();
        let result = ex.apply(ActionRequest::new(agent, action)).unwrap();
        let pool_after = ex.world().pool_snapshot();
        let flags_after = ex.world().tools_built();
        assert_eq!(result.pool, pool_after);

        match action {
            Action::Craft { tool } if result.success => {
                builds += 1;
                let cost = rule_for(tool).consumes;
                for resource in Resource::ALL {
                    let spent = pool_before[&resource] - pool_after[&resource];
                    assert_eq!(spent, cost.get(&resource).copied().unwrap_or(0), "{tool}");
                }
                assert!(!flags_before[&tool]);
                assert!(flags_after[&tool]);
            }
            Action::Craft { tool } => {
                // A rejected build changes nothing.
                assert_eq!(pool_after, pool_before, "{tool}");
                assert_eq!(flags_after, flags_before, "{tool}");
            }
            _ => {
                // Only builds withdraw from the pool.
                for resource in Resource::ALL {
                    assert!(pool_after[&resource] >= pool_before[&resource]);
                }
            }
        }
        // Built flags never clear.
        for (tool, &was) in &flags_before {
            if was {
                assert_eq!(flags_after.get(tool), Some(&true));
            }
        }
        // Collected nodes never come back.
        let now = ex
            .world()
            .nodes()
            .iter()
            .filter(|n| n.collected)
            .count();
        assert!(now >= collected_nodes);
        collected_nodes = now;
        assert!(result.position.in_bounds(20, 20));
    }
    builds
}

#[test]
fn random_actions_preserve_invariants() {
    let mut ex = executor_with(&[], &[]);
    run_random(&mut ex, 7, 5000);
}

#[test]
fn random_builds_spend_exactly_their_cost() {
    let mut ex = executor_with(
        &[
            (Resource::Wood, 12),
            (Resource::Stone, 12),
            (Resource::Iron, 3),
            (Resource::Coal, 3),
        ],
        &[],
    );
    let builds = run_random(&mut ex, 11, 2000);
    assert!(builds > 0);
}

#[test]
fn batch_with_unknown_agent_changes_nothing() {
    let mut ex = executor_with(&[], &[]);
    let requests = [
        ActionRequest::new(
            AGENT,
            Action::Move {
                direction: Direction::Right,
            },
        ),
        ActionRequest::new(AgentId::new(99), Action::Wait),
    ];
    let result = ex.apply_batch(&requests);
    assert!(matches!(
        result,
        Err(CoreError::World(WorldError::UnknownAgent(id))) if id == AgentId::new(99)
    ));
    assert_eq!(ex.world().agent_position(AGENT).unwrap(), GridPos::new(0, 0));
    assert_eq!(ex.world().step(), 0);
}
