//! Population manager: initial setup and replacement of the dead.
//!
//! At setup the manager creates every house and household and hands the
//! first `min(houses, households)` houses to the first households. After
//! each tick it tops the population back up to the target with newborn
//! households at the minimum age. It never removes households and never
//! exceeds the target.

use housing_agents::{AgentConfig, AgentError, DistributionTables, Household, Registry};
use housing_types::{HouseQuality, HouseholdId};
use rand::Rng;
use rand_distr::{Distribution, Pareto};
use tracing::debug;

use crate::config::{EconomyConfig, HousingConfig};

/// Errors that can occur while building the initial population.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// A distribution could not be constructed from the configuration.
    #[error("invalid distribution parameters: {reason}")]
    Distribution {
        /// Explanation from the distribution constructor.
        reason: String,
    },

    /// Linking houses and households failed.
    #[error("agent error during setup: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The configuration could not be loaded or failed validation.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: crate::config::ConfigError,
    },
}

/// Keeps the household count at its target.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationManager {
    target: usize,
    savings_lower: f64,
    savings_upper: f64,
}

impl PopulationManager {
    /// Manager for `target` households with initial savings drawn from
    /// `[savings_lower, savings_upper]`.
    pub const fn new(target: usize, savings_lower: f64, savings_upper: f64) -> Self {
        Self {
            target,
            savings_lower,
            savings_upper,
        }
    }

    /// Target household count.
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Create `count` houses with Pareto-distributed prices and uniform
    /// drifts. A `good_house_fraction` share has its drift made
    /// non-negative.
    pub fn create_houses(
        registry: &mut Registry,
        count: usize,
        economy: &EconomyConfig,
        housing: &HousingConfig,
        rng: &mut impl Rng,
    ) -> Result<(), SetupError> {
        let prices = Pareto::new(economy.house_price_base, economy.house_price_shape).map_err(
            |err| SetupError::Distribution {
                reason: err.to_string(),
            },
        )?;
        let [low, high] = housing.price_shock_range;

        for _ in 0..count {
            let position = registry.grid().random_cell(rng);
            let price = prices
                .sample(rng)
                .clamp(economy.price_lower, economy.price_upper);
            let drift = uniform(rng, low, high);
            let (drift, quality) = if rng.random::<f64>() < housing.good_house_fraction {
                (drift.abs(), HouseQuality::Good)
            } else {
                (drift, HouseQuality::Ordinary)
            };
            registry.add_house(position, price, drift, quality);
        }
        Ok(())
    }

    /// Create the initial households with ages drawn from the age table.
    pub fn create_households(
        &self,
        registry: &mut Registry,
        config: &AgentConfig,
        tables: &DistributionTables,
        rng: &mut impl Rng,
    ) -> Vec<HouseholdId> {
        (0..self.target)
            .map(|_| {
                let age = tables.ages.sample(&mut *rng);
                self.spawn(registry, age, config, tables, &mut *rng)
            })
            .collect()
    }

    /// Hand house i to household i for every i below `min(houses,
    /// households)`. Surplus households rent; surplus houses stay on the
    /// market.
    ///
    /// Returns the number of owners created.
    pub fn assign_initial_ownership(registry: &mut Registry) -> Result<usize, AgentError> {
        let pairs: Vec<_> = registry
            .house_ids()
            .into_iter()
            .zip(registry.household_ids())
            .collect();
        for &(house, household) in &pairs {
            registry.assign_initial(house, household)?;
        }
        Ok(pairs.len())
    }

    /// Add newborn households until the target is reached again.
    ///
    /// Returns the ids of the newborns.
    pub fn replenish(
        &self,
        registry: &mut Registry,
        config: &AgentConfig,
        tables: &DistributionTables,
        rng: &mut impl Rng,
    ) -> Vec<HouseholdId> {
        let missing = self.target.saturating_sub(registry.household_count());
        let born: Vec<_> = (0..missing)
            .map(|_| self.spawn(registry, config.minimum_age, config, tables, &mut *rng))
            .collect();
        if !born.is_empty() {
            debug!(births = born.len(), "Population replenished");
        }
        born
    }

    fn spawn(
        &self,
        registry: &mut Registry,
        age: u32,
        config: &AgentConfig,
        tables: &DistributionTables,
        rng: &mut impl Rng,
    ) -> HouseholdId {
        let savings = uniform(rng, self.savings_lower, self.savings_upper);
        let position = registry.grid().random_cell(rng);
        registry.add_household(|id| {
            Household::spawn(id, age, savings, position, config, &tables.incomes, &mut *rng)
        })
    }
}

/// Uniform draw from `[low, high)`; returns `low` for an empty range.
fn uniform(rng: &mut impl Rng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}
