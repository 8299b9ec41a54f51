//! Configuration loading and typed config structures for the Gridcraft
//! simulation.
//!
//! The configuration lives in `gridcraft-config.yaml`. Every field has a
//! default, so an empty file (or no file at all) yields the standard
//! 20x20 world with four agents.

use std::collections::BTreeMap;
use std::path::Path;

use gridcraft_types::{GridPos, Resource};
use gridcraft_world::WorldLayout;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parse but describe an unusable world.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `gridcraft-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Grid size, seed and placement bound.
    #[serde(default)]
    pub world: WorldConfig,

    /// Agent count and spawn cell.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Nodes placed per resource kind.
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// Reward values.
    #[serde(default)]
    pub rewards: RewardsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Validate and convert into a [`WorldLayout`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero-sized or oversized grid,
    /// zero agents, a zero placement bound, or a spawn cell outside the grid.
    pub fn layout(&self) -> Result<WorldLayout, ConfigError> {
        let layout = WorldLayout {
            width: self.world.width,
            height: self.world.height,
            agents: self.population.agents,
            spawn: self.population.spawn,
            node_counts: self.resources.node_counts(),
            max_placement_attempts: self.world.max_placement_attempts,
        };
        layout.validate().map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        Ok(layout)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Number of columns.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Number of rows.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Random seed for reproducible node placement.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Random draws per node before placement scans for a free cell.
    #[serde(default = "default_max_placement_attempts")]
    pub max_placement_attempts: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            max_placement_attempts: default_max_placement_attempts(),
        }
    }
}

/// Population parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents.
    #[serde(default = "default_agents")]
    pub agents: u32,

    /// Shared spawn cell.
    #[serde(default)]
    pub spawn: GridPos,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            agents: default_agents(),
            spawn: GridPos::default(),
        }
    }
}

/// Node counts per resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourcesConfig {
    /// Wood nodes.
    #[serde(default = "default_wood")]
    pub wood: u32,

    /// Stone nodes.
    #[serde(default = "default_stone")]
    pub stone: u32,

    /// Iron nodes.
    #[serde(default = "default_iron")]
    pub iron: u32,

    /// Coal nodes.
    #[serde(default = "default_coal")]
    pub coal: u32,

    /// Diamond nodes.
    #[serde(default = "default_diamond")]
    pub diamond: u32,
}

impl ResourcesConfig {
    /// Counts keyed by resource kind.
    pub fn node_counts(&self) -> BTreeMap<Resource, u32> {
        BTreeMap::from([
            (Resource::Wood, self.wood),
            (Resource::Stone, self.stone),
            (Resource::Iron, self.iron),
            (Resource::Coal, self.coal),
            (Resource::Diamond, self.diamond),
        ])
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            wood: default_wood(),
            stone: default_stone(),
            iron: default_iron(),
            coal: default_coal(),
            diamond: default_diamond(),
        }
    }
}

/// Reward values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardsConfig {
    /// Reward for each successful collection.
    #[serde(default = "default_collect_reward")]
    pub collect: u32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            collect: default_collect_reward(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per log line instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_width() -> u32 {
    20
}

const fn default_height() -> u32 {
    20
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_placement_attempts() -> u32 {
    1000
}

const fn default_agents() -> u32 {
    4
}

const fn default_wood() -> u32 {
    10
}

const fn default_stone() -> u32 {
    8
}

const fn default_iron() -> u32 {
    6
}

const fn default_coal() -> u32 {
    4
}

const fn default_diamond() -> u32 {
    2
}

const fn default_collect_reward() -> u32 {
    10
}

fn default_log_level() -> String {
    String::from("info")
}
