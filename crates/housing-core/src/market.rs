//! The market aggregate: both agent tables, the clock, the random source,
//! and the sale ledger.

use housing_agents::{AgentConfig, DistributionTables, Grid, Registry};
use housing_ledger::SaleLedger;
use housing_types::{MarketSnapshot, MarketStats};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::clock::MarketClock;
use crate::config::MarketConfig;
use crate::population::{PopulationManager, SetupError};
use crate::scheduler::Scheduler;
use crate::stats;

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct Market {
    /// Human-readable run name.
    pub name: String,
    /// Period counter.
    pub clock: MarketClock,
    /// House and household tables plus the grid.
    pub registry: Registry,
    /// Read-only behavioral parameters.
    pub agent_config: AgentConfig,
    /// Age and income tables.
    pub tables: DistributionTables,
    /// The single random source of the run.
    pub rng: StdRng,
    /// Every completed sale.
    pub ledger: SaleLedger,
    /// Population target and newborn factory.
    pub population: PopulationManager,
    /// Activation queues.
    pub scheduler: Scheduler,
}

impl Market {
    /// Validate the configuration, load the tables, and populate the
    /// market.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Config`] for invalid configuration or tables,
    /// and [`SetupError::Distribution`] for unusable price parameters.
    pub fn new(config: &MarketConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let tables = config.load_tables()?;
        Self::with_tables(config, tables)
    }

    /// Populate a market using already-loaded tables.
    ///
    /// Houses are created first, then households; the first
    /// `min(houses, households)` pairs are linked as owners.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the price distribution cannot be built or
    /// an ownership link fails.
    pub fn with_tables(
        config: &MarketConfig,
        tables: DistributionTables,
    ) -> Result<Self, SetupError> {
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let agent_config = config.agent_config();
        let mut registry = Registry::new(Grid::new(config.world.width, config.world.height));
        let population = PopulationManager::new(
            config.population.initial_households as usize,
            config.economy.savings_lower,
            config.economy.savings_upper,
        );

        PopulationManager::create_houses(
            &mut registry,
            config.population.initial_houses as usize,
            &config.economy,
            &config.housing,
            &mut rng,
        )?;
        population.create_households(&mut registry, &agent_config, &tables, &mut rng);
        let owners = PopulationManager::assign_initial_ownership(&mut registry)?;

        info!(
            name = %config.world.name,
            seed = config.world.seed,
            houses = registry.house_count(),
            households = registry.household_count(),
            owners,
            "Market initialized"
        );

        Ok(Self {
            name: config.world.name.clone(),
            clock: MarketClock::new(),
            registry,
            agent_config,
            tables,
            rng,
            ledger: SaleLedger::new(),
            population,
            scheduler: Scheduler::new(),
        })
    }

    /// Read-only view of every agent's public fields.
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            period: self.clock.period(),
            houses: self.registry.houses().map(|h| h.snapshot()).collect(),
            households: self.registry.households().map(|h| h.snapshot()).collect(),
        }
    }

    /// Statistics over the current state.
    pub fn stats(&self) -> MarketStats {
        stats::compute_stats(&self.snapshot())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn small_config() -> MarketConfig {
        let mut config = MarketConfig::default();
        config.population.initial_houses = 30;
        config.population.initial_households = 40;
        config.world.width = 6;
        config.world.height = 6;
        config
    }

    #[test]
    fn setup_links_owners() {
        let market = Market::new(&small_config()).unwrap();
        assert_eq!(market.registry.house_count(), 30);
        assert_eq!(market.registry.household_count(), 40);
        let stats = market.stats();
        assert_eq!(stats.owners, 30);
        assert_eq!(stats.renters, 10);
        assert_eq!(stats.available_houses, 0);
        market.registry.check_ownership().unwrap();
    }

    #[test]
    fn same_seed_same_market() {
        let a = Market::new(&small_config()).unwrap();
        let b = Market::new(&small_config()).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.world.width = 0;
        assert!(matches!(
            Market::new(&config),
            Err(SetupError::Config { .. })
        ));
    }
}
