//! The shared resource pool.
//!
//! One global inventory, holding an entry for every resource kind. Counts
//! are unsigned and every mutation uses checked arithmetic, so a balance
//! can never go negative or wrap.

use std::collections::BTreeMap;

use gridcraft_types::Resource;

use crate::error::WorldError;

/// Collected-but-unconsumed resources, shared by every agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    counts: BTreeMap<Resource, u32>,
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourcePool {
    /// An empty pool with a zero entry for every resource kind.
    pub fn new() -> Self {
        Self {
            counts: Resource::ALL.into_iter().map(|r| (r, 0)).collect(),
        }
    }

    /// Current count of `resource`.
    pub fn get(&self, resource: Resource) -> u32 {
        self.counts.get(&resource).copied().unwrap_or(0)
    }

    /// Whether the pool holds at least `amount` of `resource`.
    pub fn has(&self, resource: Resource, amount: u32) -> bool {
        self.get(resource) >= amount
    }

    /// Deposit `amount` units of `resource`.
    pub fn add(&mut self, resource: Resource, amount: u32) -> Result<u32, WorldError> {
        let entry = self.counts.entry(resource).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| WorldError::ArithmeticOverflow {
                context: format!("pool deposit of {amount} {resource}"),
            })?;
        Ok(*entry)
    }

    /// Withdraw `amount` units of `resource`.
    ///
    /// Fails without mutating if the pool holds less than `amount`.
    pub fn remove(&mut self, resource: Resource, amount: u32) -> Result<u32, WorldError> {
        let available = self.get(resource);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or(WorldError::InsufficientResource {
                    resource,
                    requested: amount,
                    available,
                })?;
        self.counts.insert(resource, remaining);
        Ok(remaining)
    }

    /// Withdraw every `(resource, amount)` pair, or nothing at all.
    ///
    /// All balances are checked before the first withdrawal.
    pub fn remove_all(&mut self, costs: &BTreeMap<Resource, u32>) -> Result<(), WorldError> {
        for (&resource, &amount) in costs {
            if !self.has(resource, amount) {
                return Err(WorldError::InsufficientResource {
                    resource,
                    requested: amount,
                    available: self.get(resource),
                });
            }
        }
        for (&resource, &amount) in costs {
            self.remove(resource, amount)?;
        }
        Ok(())
    }

    /// Reset every count to zero.
    pub fn clear(&mut self) {
        for count in self.counts.values_mut() {
            *count = 0;
        }
    }

    /// Counts for every resource kind.
    pub fn snapshot(&self) -> BTreeMap<Resource, u32> {
        self.counts.clone()
    }

    /// Sum of all counts, or `None` on overflow.
    pub fn total(&self) -> Option<u32> {
        self.counts
            .values()
            .try_fold(0u32, |acc, &qty| acc.checked_add(qty))
    }
}
