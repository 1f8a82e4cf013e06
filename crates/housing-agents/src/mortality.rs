//! Mortality: maximum age and the yearly Gompertz draw.

use housing_types::DeathCause;
use rand::Rng;

use crate::config::AgentConfig;
use crate::household::{Household, MONTHS_PER_YEAR};

/// Baseline yearly death probability independent of age.
const BASELINE_HAZARD: f64 = 0.0005;
/// Log10 intercept of the age-dependent hazard.
const GOMPERTZ_INTERCEPT: f64 = -4.2;
/// Log10 slope of the age-dependent hazard per year.
const GOMPERTZ_SLOPE: f64 = 0.038;

/// Yearly probability of death at `age` (not capped at 1).
pub fn gompertz_probability(age: u32) -> f64 {
    BASELINE_HAZARD + 10_f64.powf(GOMPERTZ_SLOPE.mul_add(f64::from(age), GOMPERTZ_INTERCEPT))
}

/// Decide whether a household dies this month.
///
/// A household at the maximum age always dies. Otherwise the Gompertz draw
/// happens once a year, in the last month before its birthday. The random
/// draw is only consumed when that check actually runs.
pub fn check_death(
    household: &Household,
    config: &AgentConfig,
    rng: &mut impl Rng,
) -> Option<DeathCause> {
    if household.age >= config.maximum_age {
        return Some(DeathCause::MaximumAge);
    }
    if household.monthly_ageing == MONTHS_PER_YEAR - 1
        && rng.random::<f64>() < gompertz_probability(household.age)
    {
        return Some(DeathCause::Mortality);
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use housing_types::{HouseholdId, Position};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::distribution::DistributionTables;

    fn household(age: u32) -> Household {
        let tables = DistributionTables::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        Household::spawn(
            HouseholdId::new(1),
            age,
            0.0,
            Position::new(0, 0),
            &AgentConfig::default(),
            &tables.incomes,
            &mut rng,
        )
    }

    #[test]
    fn hazard_grows_with_age() {
        let young = gompertz_probability(20);
        let old = gompertz_probability(90);
        assert!(young > BASELINE_HAZARD);
        assert!(old > young);
        assert!((gompertz_probability(0) - (0.0005 + 10_f64.powf(-4.2))).abs() < 1e-12);
    }

    #[test]
    fn maximum_age_always_dies() {
        let cfg = AgentConfig::default();
        let mut h = household(50);
        h.age = cfg.maximum_age;
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(
            check_death(&h, &cfg, &mut rng),
            Some(DeathCause::MaximumAge)
        );
    }

    #[test]
    fn no_draw_outside_last_month() {
        let cfg = AgentConfig::default();
        let mut h = household(99);
        let mut rng = SmallRng::seed_from_u64(3);
        for month in 0..MONTHS_PER_YEAR - 1 {
            h.monthly_ageing = month;
            assert_eq!(check_death(&h, &cfg, &mut rng), None);
        }
    }

    #[test]
    fn certain_hazard_fires_in_last_month() {
        // At 99 the hazard is 10^(-0.438) + 0.0005, well below 1; raise the
        // age ceiling so a much older household faces a hazard above 1.
        let cfg = AgentConfig {
            maximum_age: 200,
            ..AgentConfig::default()
        };
        let mut h = household(50);
        h.age = 150;
        h.monthly_ageing = MONTHS_PER_YEAR - 1;
        assert!(gompertz_probability(150) > 1.0);
        let mut rng = SmallRng::seed_from_u64(4);
        assert_eq!(check_death(&h, &cfg, &mut rng), Some(DeathCause::Mortality));
    }
}
