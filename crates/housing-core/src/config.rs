//! Configuration loading and typed config structures for the housing market.
//!
//! The canonical configuration lives in `housing-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader, a consistency check, and the conversion into the
//! read-only [`AgentConfig`] the agents consume.

use std::path::{Path, PathBuf};

use housing_agents::{
    AgentConfig, DistributionTables, PolicyConfig, PricingConfig, RawTables, RiskConfig,
    TableError,
};
use serde::Deserialize;

/// Age at which the starter grant is paid.
const STARTER_GRANT_AGE: u32 = 20;
/// Age at which the retirement grant is paid.
const RETIREMENT_GRANT_AGE: u32 = 75;
/// Age at which the low-income grant is paid.
const LOW_INCOME_GRANT_AGE: u32 = 25;
/// Period in which the low-income grant is paid.
const LOW_INCOME_GRANT_PERIOD: u64 = 1;
/// Smallest price the sale ledger can record (one cent).
const MIN_PRICE: f64 = 0.01;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration or table file from disk.
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

    /// The values parsed but are inconsistent.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },

    /// The distribution tables failed validation.
    #[error("invalid distribution tables: {source}")]
    Table {
        /// The underlying table error.
        #[from]
        source: TableError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level market configuration.
///
/// Mirrors the structure of `housing-config.yaml`. Every field has a
/// default, so an empty section (or file) yields the reference model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarketConfig {
    /// World-level settings (name, seed, grid size).
    #[serde(default)]
    pub world: WorldConfig,

    /// Population sizes and age limits.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Money: savings, prices, mortgages, rent.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// House price process.
    #[serde(default)]
    pub housing: HousingConfig,

    /// Household risk attitudes and search behavior.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// One-time savings grants.
    #[serde(default)]
    pub policy: PolicySection,

    /// Distribution table source.
    #[serde(default)]
    pub tables: TablesConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run length.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl MarketConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Reject inconsistent values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        let p = &self.population;
        let e = &self.economy;
        let h = &self.housing;
        let b = &self.behavior;
        let [shock_low, shock_high] = h.price_shock_range;

        check(w.width > 0 && w.height > 0, "grid width and height must be at least 1")?;
        check(p.minimum_age < p.maximum_age, "minimum_age must be below maximum_age")?;
        check(
            p.maximum_moving_age >= p.minimum_age,
            "maximum_moving_age must not be below minimum_age",
        )?;
        check(e.savings_lower <= e.savings_upper, "savings_lower must not exceed savings_upper")?;
        check(e.price_lower <= e.price_upper, "price_lower must not exceed price_upper")?;
        check(e.price_lower >= MIN_PRICE, "price_lower must be at least one cent")?;
        check(e.house_price_base > 0.0, "house_price_base must be positive")?;
        check(e.house_price_shape > 0.0, "house_price_shape must be positive")?;
        check(
            e.minimum_house_price >= MIN_PRICE,
            "minimum_house_price must be at least one cent",
        )?;
        check(e.payoff_fraction >= 0.0, "payoff_fraction must not be negative")?;
        check(
            e.bank_income_multiplier >= 0.0,
            "bank_income_multiplier must not be negative",
        )?;
        check(e.rental_cost >= 0.0, "rental_cost must not be negative")?;
        check(
            shock_low <= shock_high,
            "price_shock_range must be [low, high]",
        )?;
        check(h.monthly_shock_scale >= 0.0, "monthly_shock_scale must not be negative")?;
        check(
            is_probability(h.good_house_fraction),
            "good_house_fraction must be in [0, 1]",
        )?;
        check(
            is_probability(h.sign_flip_probability),
            "sign_flip_probability must be in [0, 1]",
        )?;
        check(
            is_probability(b.sophisticated_fraction),
            "sophisticated_fraction must be in [0, 1]",
        )?;
        check(
            is_probability(b.empty_neighborhood_threshold),
            "empty_neighborhood_threshold must be in [0, 1]",
        )?;
        check(b.age_utility_scaling >= 0.0, "age_utility_scaling must not be negative")?;
        check(
            b.alpha_sd >= 0.0 && b.beta_sd >= 0.0 && b.lambda_sd >= 0.0,
            "risk standard deviations must not be negative",
        )?;
        Ok(())
    }

    /// Build the read-only parameter record handed to every agent.
    pub fn agent_config(&self) -> AgentConfig {
        let p = &self.population;
        let e = &self.economy;
        let h = &self.housing;
        let b = &self.behavior;
        let g = &self.policy;
        AgentConfig {
            minimum_age: p.minimum_age,
            maximum_age: p.maximum_age,
            maximum_moving_age: p.maximum_moving_age,
            payoff_fraction: e.payoff_fraction,
            bank_income_multiplier: e.bank_income_multiplier,
            rental_cost: e.rental_cost,
            age_utility_scaling: b.age_utility_scaling,
            empty_neighborhood_threshold: b.empty_neighborhood_threshold,
            search_sample_size: b.search_sample_size,
            pricing: PricingConfig {
                inflation_rate: e.inflation_rate,
                sign_flip_probability: h.sign_flip_probability,
                monthly_shock_scale: h.monthly_shock_scale,
                minimum_price: e.minimum_house_price,
            },
            risk: RiskConfig {
                alpha_mean: b.alpha_mean,
                alpha_sd: b.alpha_sd,
                beta_mean: b.beta_mean,
                beta_sd: b.beta_sd,
                lambda_mean: b.lambda_mean,
                lambda_sd: b.lambda_sd,
                sophisticated_fraction: b.sophisticated_fraction,
            },
            policy: PolicyConfig {
                starter_grant_enabled: g.savings_grant_at_20,
                retirement_grant_enabled: g.savings_grant_at_75,
                low_income_grant_enabled: g.income_grant_at_25,
                starter_grant_amount: g.starter_grant_amount,
                starter_grant_age: STARTER_GRANT_AGE,
                starter_grant_after_period: g.starter_grant_after_period,
                retirement_grant_amount: g.retirement_grant_amount,
                retirement_grant_age: RETIREMENT_GRANT_AGE,
                low_income_grant_amount: g.low_income_grant_amount,
                low_income_grant_age: LOW_INCOME_GRANT_AGE,
                low_income_grant_period: LOW_INCOME_GRANT_PERIOD,
                low_income_bin_limit: g.low_income_bin_limit,
            },
        }
    }

    /// Load and validate the distribution tables.
    ///
    /// Uses the file named in `tables.path` (YAML or JSON) when set, the
    /// built-in tables otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`]/[`ConfigError::Yaml`] if the file cannot
    /// be read or parsed, and [`ConfigError::Table`] if it fails validation.
    pub fn load_tables(&self) -> Result<DistributionTables, ConfigError> {
        match &self.tables.path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                let raw: RawTables = serde_yml::from_str(&contents)?;
                Ok(DistributionTables::from_raw(&raw)?)
            }
            None => Ok(DistributionTables::builtin()?),
        }
    }
}

fn check(ok: bool, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: reason.to_owned(),
        })
    }
}

fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable run name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grid width in cells.
    #[serde(default = "default_grid_size")]
    pub width: u32,

    /// Grid height in cells.
    #[serde(default = "default_grid_size")]
    pub height: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            width: default_grid_size(),
            height: default_grid_size(),
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of houses created at setup.
    #[serde(default = "default_initial_houses")]
    pub initial_houses: u32,

    /// Target number of households, restored after every tick.
    #[serde(default = "default_initial_households")]
    pub initial_households: u32,

    /// Age of newborn households.
    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,

    /// Age at which households are removed.
    #[serde(default = "default_maximum_age")]
    pub maximum_age: u32,

    /// Oldest age at which households still buy or list.
    #[serde(default = "default_maximum_moving_age")]
    pub maximum_moving_age: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_houses: default_initial_houses(),
            initial_households: default_initial_households(),
            minimum_age: default_minimum_age(),
            maximum_age: default_maximum_age(),
            maximum_moving_age: default_maximum_moving_age(),
        }
    }
}

/// Economy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EconomyConfig {
    /// Lower bound of initial savings.
    #[serde(default = "default_savings_lower")]
    pub savings_lower: f64,

    /// Upper bound of initial savings.
    #[serde(default = "default_savings_upper")]
    pub savings_upper: f64,

    /// Lowest initial house price.
    #[serde(default = "default_price_lower")]
    pub price_lower: f64,

    /// Highest initial house price.
    #[serde(default = "default_price_upper")]
    pub price_upper: f64,

    /// Scale of the Pareto draw for initial prices.
    #[serde(default = "default_house_price_base")]
    pub house_price_base: f64,

    /// Shape of the Pareto draw for initial prices.
    #[serde(default = "default_house_price_shape")]
    pub house_price_shape: f64,

    /// Fraction of the house value accrued into owners' savings each month.
    #[serde(default = "default_payoff_fraction")]
    pub payoff_fraction: f64,

    /// Yearly inflation in percent.
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,

    /// Yearly income multiple a bank lends.
    #[serde(default = "default_bank_income_multiplier")]
    pub bank_income_multiplier: f64,

    /// Monthly rent paid by households without a house.
    #[serde(default = "default_rental_cost")]
    pub rental_cost: f64,

    /// Price floor.
    #[serde(default = "default_minimum_house_price")]
    pub minimum_house_price: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            savings_lower: default_savings_lower(),
            savings_upper: default_savings_upper(),
            price_lower: default_price_lower(),
            price_upper: default_price_upper(),
            house_price_base: default_house_price_base(),
            house_price_shape: default_house_price_shape(),
            payoff_fraction: default_payoff_fraction(),
            inflation_rate: default_inflation_rate(),
            bank_income_multiplier: default_bank_income_multiplier(),
            rental_cost: default_rental_cost(),
            minimum_house_price: default_minimum_house_price(),
        }
    }
}

/// House price process configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HousingConfig {
    /// Share of houses whose drift is forced non-negative.
    #[serde(default = "default_good_house_fraction")]
    pub good_house_fraction: f64,

    /// Uniform range `[low, high]` of the per-house annual drift, in percent.
    #[serde(default = "default_price_shock_range")]
    pub price_shock_range: [f64; 2],

    /// Probability that a price change flips sign.
    #[serde(default = "default_sign_flip_probability")]
    pub sign_flip_probability: f64,

    /// Scale of the monthly shock relative to the yearly one.
    #[serde(default = "default_monthly_shock_scale")]
    pub monthly_shock_scale: f64,
}

impl Default for HousingConfig {
    fn default() -> Self {
        Self {
            good_house_fraction: default_good_house_fraction(),
            price_shock_range: default_price_shock_range(),
            sign_flip_probability: default_sign_flip_probability(),
            monthly_shock_scale: default_monthly_shock_scale(),
        }
    }
}

/// Household behavior configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BehaviorConfig {
    /// Mean gain curvature.
    #[serde(default = "default_curvature_mean")]
    pub alpha_mean: f64,

    /// Spread of the gain curvature.
    #[serde(default = "default_curvature_sd")]
    pub alpha_sd: f64,

    /// Mean loss curvature.
    #[serde(default = "default_curvature_mean")]
    pub beta_mean: f64,

    /// Spread of the loss curvature.
    #[serde(default = "default_curvature_sd")]
    pub beta_sd: f64,

    /// Mean loss aversion.
    #[serde(default = "default_lambda_mean")]
    pub lambda_mean: f64,

    /// Spread of the loss aversion.
    #[serde(default = "default_lambda_sd")]
    pub lambda_sd: f64,

    /// Share of sophisticated households.
    #[serde(default = "default_sophisticated_fraction")]
    pub sophisticated_fraction: f64,

    /// Per-year decrease in the probability of looking at the market.
    #[serde(default = "default_age_utility_scaling")]
    pub age_utility_scaling: f64,

    /// Available share of neighbor houses above which a neighborhood is
    /// considered empty.
    #[serde(default = "default_empty_neighborhood_threshold")]
    pub empty_neighborhood_threshold: f64,

    /// Houses inspected when evaluating a listing; all when absent.
    #[serde(default)]
    pub search_sample_size: Option<usize>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            alpha_mean: default_curvature_mean(),
            alpha_sd: default_curvature_sd(),
            beta_mean: default_curvature_mean(),
            beta_sd: default_curvature_sd(),
            lambda_mean: default_lambda_mean(),
            lambda_sd: default_lambda_sd(),
            sophisticated_fraction: default_sophisticated_fraction(),
            age_utility_scaling: default_age_utility_scaling(),
            empty_neighborhood_threshold: default_empty_neighborhood_threshold(),
            search_sample_size: None,
        }
    }
}

/// Policy toggles and grant amounts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicySection {
    /// Pay a lump sum to 20-year-olds once the start period has passed.
    #[serde(default)]
    pub savings_grant_at_20: bool,

    /// Pay a lump sum to 75-year-olds.
    #[serde(default)]
    pub savings_grant_at_75: bool,

    /// Pay a means-tested lump sum to low-income 25-year-olds in period 1.
    #[serde(default)]
    pub income_grant_at_25: bool,

    /// Amount of the grant at 20.
    #[serde(default = "default_savings_grant")]
    pub starter_grant_amount: f64,

    /// The grant at 20 is paid only after this period.
    #[serde(default = "default_starter_grant_after_period")]
    pub starter_grant_after_period: u64,

    /// Amount of the grant at 75.
    #[serde(default = "default_savings_grant")]
    pub retirement_grant_amount: f64,

    /// Amount of the means-tested grant.
    #[serde(default = "default_low_income_grant")]
    pub low_income_grant_amount: f64,

    /// Income bins below this index qualify for the means-tested grant.
    #[serde(default = "default_low_income_bin_limit")]
    pub low_income_bin_limit: usize,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            savings_grant_at_20: false,
            savings_grant_at_75: false,
            income_grant_at_25: false,
            starter_grant_amount: default_savings_grant(),
            starter_grant_after_period: default_starter_grant_after_period(),
            retirement_grant_amount: default_savings_grant(),
            low_income_grant_amount: default_low_income_grant(),
            low_income_bin_limit: default_low_income_bin_limit(),
        }
    }
}

/// Where the distribution tables come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TablesConfig {
    /// YAML or JSON file with `ages` and `incomes` rows; built-in tables
    /// when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Run length configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of monthly ticks to run.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Housing Market".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_grid_size() -> u32 {
    20
}

const fn default_initial_houses() -> u32 {
    700
}

const fn default_initial_households() -> u32 {
    1000
}

const fn default_minimum_age() -> u32 {
    18
}

const fn default_maximum_age() -> u32 {
    100
}

const fn default_maximum_moving_age() -> u32 {
    75
}

const fn default_savings_lower() -> f64 {
    0.0
}

const fn default_savings_upper() -> f64 {
    100_000.0
}

const fn default_price_lower() -> f64 {
    50_000.0
}

const fn default_price_upper() -> f64 {
    1_000_000.0
}

const fn default_house_price_base() -> f64 {
    150_000.0
}

const fn default_house_price_shape() -> f64 {
    3.0
}

const fn default_payoff_fraction() -> f64 {
    0.002
}

const fn default_inflation_rate() -> f64 {
    2.0
}

const fn default_bank_income_multiplier() -> f64 {
    4.5
}

const fn default_rental_cost() -> f64 {
    800.0
}

const fn default_minimum_house_price() -> f64 {
    1.0
}

const fn default_good_house_fraction() -> f64 {
    0.2
}

const fn default_price_shock_range() -> [f64; 2] {
    [-2.0, 6.0]
}

const fn default_sign_flip_probability() -> f64 {
    0.05
}

const fn default_monthly_shock_scale() -> f64 {
    0.2
}

const fn default_curvature_mean() -> f64 {
    0.88
}

const fn default_curvature_sd() -> f64 {
    0.05
}

const fn default_lambda_mean() -> f64 {
    2.25
}

const fn default_lambda_sd() -> f64 {
    0.25
}

const fn default_sophisticated_fraction() -> f64 {
    0.5
}

const fn default_age_utility_scaling() -> f64 {
    0.01
}

const fn default_empty_neighborhood_threshold() -> f64 {
    0.4
}

const fn default_savings_grant() -> f64 {
    10_000.0
}

const fn default_starter_grant_after_period() -> u64 {
    30
}

const fn default_low_income_grant() -> f64 {
    20_000.0
}

const fn default_low_income_bin_limit() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_max_ticks() -> u64 {
    200
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MarketConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.population.initial_houses, 700);
        assert_eq!(config.population.initial_households, 1000);
        assert_eq!(config.simulation.max_ticks, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_agent_config_matches_agent_defaults() {
        assert_eq!(MarketConfig::default().agent_config(), AgentConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  name: Test Market
  seed: 9
  width: 5
  height: 7
population:
  initial_houses: 10
  initial_households: 12
economy:
  rental_cost: 0.0
  bank_income_multiplier: 3.0
housing:
  price_shock_range: [0.0, 1.0]
behavior:
  search_sample_size: 25
policy:
  savings_grant_at_20: true
simulation:
  max_ticks: 24
";
        let config = MarketConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Test Market");
        assert_eq!(config.world.width, 5);
        assert_eq!(config.world.height, 7);
        assert_eq!(config.population.initial_households, 12);
        assert_eq!(config.behavior.search_sample_size, Some(25));
        assert_eq!(config.simulation.max_ticks, 24);
        assert!(config.validate().is_ok());

        let agents = config.agent_config();
        assert!(agents.rental_cost.abs() < f64::EPSILON);
        assert!((agents.bank_income_multiplier - 3.0).abs() < f64::EPSILON);
        assert!(agents.policy.starter_grant_enabled);
        assert!(!agents.policy.retirement_grant_enabled);
        assert_eq!(agents.search_sample_size, Some(25));
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = MarketConfig::parse("world:\n  seed: 7\n").unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.width, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let err = MarketConfig::parse("world: [unclosed").err();
        assert!(matches!(err, Some(ConfigError::Yaml { .. })));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = MarketConfig::default();
        config.world.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = MarketConfig::default();
        config.population.minimum_age = 120;
        assert!(config.validate().is_err());

        let mut config = MarketConfig::default();
        config.economy.price_lower = 2.0e6;
        assert!(config.validate().is_err());

        let mut config = MarketConfig::default();
        config.housing.sign_flip_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = MarketConfig::default();
        config.economy.bank_income_multiplier = -1.0;
        assert!(config.validate().is_err());

        let mut config = MarketConfig::default();
        config.housing.price_shock_range = [3.0, 1.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn prices_below_one_cent_are_rejected() {
        let mut config = MarketConfig::default();
        config.economy.price_lower = 0.004;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = MarketConfig::default();
        config.economy.minimum_house_price = 0.004;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = MarketConfig::default();
        config.economy.price_lower = MIN_PRICE;
        config.economy.minimum_house_price = MIN_PRICE;
        config.validate().unwrap();
    }

    #[test]
    fn builtin_tables_load_without_path() {
        let tables = MarketConfig::default().load_tables().unwrap();
        assert_eq!(tables.incomes.bin_count(), 10);
    }

    #[test]
    fn missing_table_file_is_io_error() {
        let mut config = MarketConfig::default();
        config.tables.path = Some(PathBuf::from("/nonexistent/housing-tables.yaml"));
        assert!(matches!(config.load_tables(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("housing-config.yaml");
        let config = MarketConfig::from_file(&path).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.load_tables().is_ok());
    }
}
