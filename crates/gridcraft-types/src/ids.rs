//! Type-safe identifier wrappers around `u32` indices.
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. Agents are numbered
//! from 1 and display as `agent_<n>`, matching the names external planners
//! use. Resource nodes are numbered from 0 in placement order.

use core::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::ParseError;

/// Generates a newtype wrapper around `u32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u32);

        impl $name {
            /// Create an identifier from its raw index.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Return the inner index.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        /// Deserializes from a bare index (`3`) or the display form
        /// (`"agent_3"`). Always serializes as the bare index.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct IdVisitor;

                impl Visitor<'_> for IdVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                        f.write_str(concat!("an index or a \"", $prefix, "_<n>\" string"))
                    }

                    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                        u32::try_from(v)
                            .map($name)
                            .map_err(|_overflow| E::invalid_value(Unexpected::Unsigned(v), &self))
                    }

                    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                        u32::try_from(v)
                            .map($name)
                            .map_err(|_negative| E::invalid_value(Unexpected::Signed(v), &self))
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                        v.parse()
                            .map_err(|_parse| E::invalid_value(Unexpected::Str(v), &self))
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            /// Accepts both the display form (`agent_3`) and a bare index (`3`).
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix(concat!($prefix, "_"))
                    .unwrap_or(trimmed);
                digits
                    .parse::<u32>()
                    .map(Self)
                    .map_err(|_parse| ParseError::new(stringify!($name), s))
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent in the simulation.
    AgentId, "agent"
}

define_id! {
    /// Unique identifier for a resource node placed on the grid.
    NodeId, "node"
}

impl AgentId {
    /// Identifiers for `count` agents, numbered `agent_1..=agent_<count>`.
    pub fn sequence(count: u32) -> impl Iterator<Item = Self> {
        (1..=count).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_displays_planner_name() {
        assert_eq!(AgentId::new(1).to_string(), "agent_1");
        assert_eq!(NodeId::new(7).to_string(), "node_7");
    }

    #[test]
    fn agent_id_parses_both_forms() {
        assert_eq!("agent_4".parse::<AgentId>().ok(), Some(AgentId::new(4)));
        assert_eq!("2".parse::<AgentId>().ok(), Some(AgentId::new(2)));
        assert!("agent_x".parse::<AgentId>().is_err());
        assert!("".parse::<AgentId>().is_err());
    }

    #[test]
    fn id_serializes_as_bare_number() {
        let json = serde_json::to_string(&AgentId::new(3)).ok();
        assert_eq!(json.as_deref(), Some("3"));
        let restored: Result<AgentId, _> = serde_json::from_str("3");
        assert_eq!(restored.ok(), Some(AgentId::new(3)));
    }

    #[test]
    fn id_deserializes_from_display_name() {
        let named: Result<AgentId, _> = serde_json::from_str("\"agent_2\"");
        assert_eq!(named.ok(), Some(AgentId::new(2)));
        let quoted_index: Result<AgentId, _> = serde_json::from_str("\"5\"");
        assert_eq!(quoted_index.ok(), Some(AgentId::new(5)));
        assert!(serde_json::from_str::<AgentId>("\"node_2x\"").is_err());
        assert!(serde_json::from_str::<AgentId>("-1").is_err());
        assert!(serde_json::from_str::<AgentId>("4294967296").is_err());
    }

    #[test]
    fn sequence_is_one_based() {
        let ids: Vec<AgentId> = AgentId::sequence(4).collect();
        assert_eq!(ids.first().copied(), Some(AgentId::new(1)));
        assert_eq!(ids.last().copied(), Some(AgentId::new(4)));
        assert_eq!(ids.len(), 4);
    }
}
