//! Enumeration types for the Gridcraft simulation.
//!
//! Resources, tools, movement directions, rejection reasons and the
//! recommendation status. Every enum carries an `ALL` table in canonical
//! order so callers can iterate without hand-written lists, and every
//! enum that crosses the planner boundary parses from the names planners
//! use (`"wood pickaxe"` and `"wood_pickaxe"` are both accepted).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// A planner supplied a name that does not match any known variant.
///
/// This is a caller bug (contract violation), not a gameplay outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {input:?}")]
pub struct ParseError {
    /// The kind of value being parsed (`Resource`, `Tool`, ...).
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

impl ParseError {
    /// Create a parse error for the given kind and input.
    pub fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_owned(),
        }
    }
}

/// Normalize a planner-supplied name: trim, lowercase, spaces and dashes
/// become underscores.
fn normalize(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A collectible resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Resource {
    /// Collectible bare-handed.
    Wood,
    /// Requires a wood pickaxe.
    Stone,
    /// Requires a stone pickaxe.
    Iron,
    /// Requires a wood pickaxe.
    Coal,
    /// Requires an iron pickaxe. Collecting it ends the episode.
    Diamond,
}

impl Resource {
    /// Every resource kind, in placement order.
    pub const ALL: [Self; 5] = [Self::Wood, Self::Stone, Self::Iron, Self::Coal, Self::Diamond];

    /// The canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Iron => "iron",
            Self::Coal => "coal",
            Self::Diamond => "diamond",
        }
    }

    /// The integer code used in the grid projection.
    ///
    /// `0` is reserved for empty cells and `-1` for agents.
    pub const fn grid_code(self) -> i32 {
        match self {
            Self::Wood => 1,
            Self::Stone => 2,
            Self::Iron => 3,
            Self::Diamond => 4,
            Self::Coal => 5,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize(s);
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == name)
            .ok_or_else(|| ParseError::new("Resource", s))
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// A craftable tool. Built at most once per episode, shared by all agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Tool {
    /// Crafting table; gates every other tool.
    Table,
    /// Unlocks stone and coal.
    WoodPickaxe,
    /// Unlocks iron.
    StonePickaxe,
    /// Gates the iron pickaxe.
    Furnace,
    /// Unlocks diamond.
    IronPickaxe,
}

impl Tool {
    /// Every tool, in recommendation priority order.
    pub const ALL: [Self; 5] = [
        Self::Table,
        Self::WoodPickaxe,
        Self::StonePickaxe,
        Self::Furnace,
        Self::IronPickaxe,
    ];

    /// The canonical snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::WoodPickaxe => "wood_pickaxe",
            Self::StonePickaxe => "stone_pickaxe",
            Self::Furnace => "furnace",
            Self::IronPickaxe => "iron_pickaxe",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize(s);
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| ParseError::new("Tool", s))
    }
}

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// A primitive one-cell move on the 4-connected grid.
///
/// `y` grows downward: `Up` decrements `y`, `Down` increments it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// `y - 1`.
    Up,
    /// `y + 1`.
    Down,
    /// `x - 1`.
    Left,
    /// `x + 1`.
    Right,
}

impl Direction {
    /// Every direction, in neighbour-expansion order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit delta `(dx, dy)`.
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// The canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize(s);
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == name)
            .ok_or_else(|| ParseError::new("Direction", s))
    }
}

// ---------------------------------------------------------------------------
// Rejection Reasons
// ---------------------------------------------------------------------------

/// The reason an agent's action was rejected by the executor.
///
/// Rejections are ordinary outcomes: the world is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// A required tool or resource amount is missing.
    PreconditionNotMet,
    /// No node of the requested kind exists at the agent's cell.
    NoResourceHere,
    /// The node at the agent's cell has already been collected.
    AlreadyCollected,
    /// The requested tool has already been built.
    AlreadyBuilt,
    /// The terminal resource has been collected; the world is inert.
    EpisodeOver,
}

// ---------------------------------------------------------------------------
// Recommendation Status
// ---------------------------------------------------------------------------

/// Whether the recommended next tool can be built right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RecommendationStatus {
    /// Every prerequisite is satisfied.
    Ready,
    /// Some resources or tools are still missing.
    NotReady,
    /// Every tool has been built.
    Done,
}
