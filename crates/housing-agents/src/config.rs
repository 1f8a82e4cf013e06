//! Read-only parameters for agent behavior.
//!
//! The market builds one [`AgentConfig`] from `housing-config.yaml` at
//! start-up and passes it by reference into every constructor and decision
//! function. Nothing in here changes during a run.

use housing_types::{RiskProfile, Strategy};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Behavioral and economic parameters shared by all agents.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Age at which households are born and may start trading (default: 18).
    pub minimum_age: u32,

    /// Age at which a household is removed from the population (default: 100).
    pub maximum_age: u32,

    /// Oldest age at which a household still buys or lists (default: 75).
    pub maximum_moving_age: u32,

    /// Fraction of the house value accrued into savings each month by
    /// owners (default: 0.002).
    pub payoff_fraction: f64,

    /// Yearly income multiple a bank is willing to lend (default: 4.5).
    pub bank_income_multiplier: f64,

    /// Monthly rent paid by households without a house (default: 800).
    pub rental_cost: f64,

    /// Per-year decrease in the probability of checking the market
    /// (default: 0.01, so a 50-year-old looks half of the months).
    pub age_utility_scaling: f64,

    /// Available fraction of neighboring houses above which a neighborhood
    /// counts as empty (default: 0.4).
    pub empty_neighborhood_threshold: f64,

    /// Number of shuffled houses inspected when evaluating a listing.
    /// `None` inspects the whole available pool (default).
    pub search_sample_size: Option<usize>,

    /// House price process.
    pub pricing: PricingConfig,

    /// Distribution of risk attitudes and strategies at creation.
    pub risk: RiskConfig,

    /// One-time savings grants.
    pub policy: PolicyConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            minimum_age: 18,
            maximum_age: 100,
            maximum_moving_age: 75,
            payoff_fraction: 0.002,
            bank_income_multiplier: 4.5,
            rental_cost: 800.0,
            age_utility_scaling: 0.01,
            empty_neighborhood_threshold: 0.4,
            search_sample_size: None,
            pricing: PricingConfig::default(),
            risk: RiskConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Whether a household of this age may buy or list a house.
    pub const fn can_trade_at(&self, age: u32) -> bool {
        age >= self.minimum_age && age <= self.maximum_moving_age
    }
}

/// Parameters of the stochastic house price process.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    /// Yearly inflation in percent, added to every house's drift (default: 2.0).
    pub inflation_rate: f64,

    /// Probability that a drawn price change flips sign (default: 0.05).
    pub sign_flip_probability: f64,

    /// Scale of the monthly shock relative to the yearly one (default: 0.2).
    pub monthly_shock_scale: f64,

    /// Floor that keeps prices strictly positive (default: 1.0).
    pub minimum_price: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            inflation_rate: 2.0,
            sign_flip_probability: 0.05,
            monthly_shock_scale: 0.2,
            minimum_price: 1.0,
        }
    }
}

/// Means and spreads for the per-household risk parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    /// Mean gain curvature (default: 0.88).
    pub alpha_mean: f64,
    /// Standard deviation of the gain curvature (default: 0.05).
    pub alpha_sd: f64,
    /// Mean loss curvature (default: 0.88).
    pub beta_mean: f64,
    /// Standard deviation of the loss curvature (default: 0.05).
    pub beta_sd: f64,
    /// Mean loss aversion (default: 2.25).
    pub lambda_mean: f64,
    /// Standard deviation of the loss aversion (default: 0.25).
    pub lambda_sd: f64,
    /// Share of households created with the sophisticated strategy
    /// (default: 0.5).
    pub sophisticated_fraction: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            alpha_mean: 0.88,
            alpha_sd: 0.05,
            beta_mean: 0.88,
            beta_sd: 0.05,
            lambda_mean: 2.25,
            lambda_sd: 0.25,
            sophisticated_fraction: 0.5,
        }
    }
}

/// Lowest curvature a sampled profile may have.
const MIN_CURVATURE: f64 = 0.01;

impl RiskConfig {
    /// Draw a risk profile around the configured means.
    ///
    /// Curvatures are clamped to `[0.01, 1]` and loss aversion to be
    /// non-negative so the value function stays concave for gains.
    pub fn sample_profile(&self, rng: &mut impl Rng) -> RiskProfile {
        let alpha = normal(rng, self.alpha_mean, self.alpha_sd).clamp(MIN_CURVATURE, 1.0);
        let beta = normal(rng, self.beta_mean, self.beta_sd).clamp(MIN_CURVATURE, 1.0);
        let lambda = normal(rng, self.lambda_mean, self.lambda_sd).max(0.0);
        RiskProfile {
            alpha,
            beta,
            lambda,
        }
    }

    /// Draw a forecast strategy.
    pub fn sample_strategy(&self, rng: &mut impl Rng) -> Strategy {
        if rng.random::<f64>() < self.sophisticated_fraction {
            Strategy::Sophisticated
        } else {
            Strategy::Naive
        }
    }
}

/// Toggles and amounts for the one-time savings grants.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Grant a lump sum at `starter_grant_age` after `starter_grant_after_period`.
    pub starter_grant_enabled: bool,
    /// Grant a lump sum at `retirement_grant_age`.
    pub retirement_grant_enabled: bool,
    /// Grant a lump sum to low-income households at `low_income_grant_age`
    /// in `low_income_grant_period`.
    pub low_income_grant_enabled: bool,

    /// Starter grant amount (default: 10 000).
    pub starter_grant_amount: f64,
    /// Age that receives the starter grant (default: 20).
    pub starter_grant_age: u32,
    /// The starter grant is paid only once the period exceeds this (default: 30).
    pub starter_grant_after_period: u64,

    /// Retirement grant amount (default: 10 000).
    pub retirement_grant_amount: f64,
    /// Age that receives the retirement grant (default: 75).
    pub retirement_grant_age: u32,

    /// Low-income grant amount (default: 20 000).
    pub low_income_grant_amount: f64,
    /// Age that receives the low-income grant (default: 25).
    pub low_income_grant_age: u32,
    /// Period in which the low-income grant is paid (default: 1).
    pub low_income_grant_period: u64,
    /// Households whose income bin is below this qualify (default: 3).
    pub low_income_bin_limit: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            starter_grant_enabled: false,
            retirement_grant_enabled: false,
            low_income_grant_enabled: false,
            starter_grant_amount: 10_000.0,
            starter_grant_age: 20,
            starter_grant_after_period: 30,
            retirement_grant_amount: 10_000.0,
            retirement_grant_age: 75,
            low_income_grant_amount: 20_000.0,
            low_income_grant_age: 25,
            low_income_grant_period: 1,
            low_income_bin_limit: 3,
        }
    }
}

/// Draw from `Normal(mean, |sd|)`.
///
/// Falls back to `mean` when the spread is not finite.
pub fn normal(rng: &mut impl Rng, mean: f64, sd: f64) -> f64 {
    Normal::new(mean, sd.abs()).map_or(mean, |dist| dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.minimum_age, 18);
        assert_eq!(cfg.maximum_age, 100);
        assert_eq!(cfg.maximum_moving_age, 75);
        assert!(cfg.search_sample_size.is_none());
        assert!(!cfg.policy.starter_grant_enabled);
    }

    #[test]
    fn trading_age_window() {
        let cfg = AgentConfig::default();
        assert!(!cfg.can_trade_at(17));
        assert!(cfg.can_trade_at(18));
        assert!(cfg.can_trade_at(75));
        assert!(!cfg.can_trade_at(76));
    }

    #[test]
    fn sampled_profiles_are_bounded() {
        let cfg = RiskConfig {
            alpha_sd: 5.0,
            beta_sd: 5.0,
            lambda_sd: 50.0,
            ..RiskConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let p = cfg.sample_profile(&mut rng);
            assert!((MIN_CURVATURE..=1.0).contains(&p.alpha));
            assert!((MIN_CURVATURE..=1.0).contains(&p.beta));
            assert!(p.lambda >= 0.0);
        }
    }

    #[test]
    fn zero_spread_returns_mean() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!((normal(&mut rng, 3.5, 0.0) - 3.5).abs() < 1e-12);
        assert!((normal(&mut rng, 3.5, f64::NAN) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn negative_spread_uses_its_magnitude() {
        let mut rng = SmallRng::seed_from_u64(2);
        let draws: Vec<f64> = (0..2000).map(|_| normal(&mut rng, 10.0, -1.0)).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((mean - 10.0).abs() < 0.2);
        assert!(draws.iter().any(|&d| d < 10.0) && draws.iter().any(|&d| d > 10.0));
    }

    #[test]
    fn strategy_fraction_extremes() {
        let mut rng = SmallRng::seed_from_u64(9);
        let all_naive = RiskConfig {
            sophisticated_fraction: 0.0,
            ..RiskConfig::default()
        };
        let all_smart = RiskConfig {
            sophisticated_fraction: 1.0,
            ..RiskConfig::default()
        };
        for _ in 0..50 {
            assert_eq!(all_naive.sample_strategy(&mut rng), Strategy::Naive);
            assert_eq!(all_smart.sample_strategy(&mut rng), Strategy::Sophisticated);
        }
    }
}
