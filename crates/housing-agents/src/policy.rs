//! One-time savings grants.
//!
//! Each grant is paid at most once per household, when its toggle is on
//! and the household matches the grant's age (and period or income test).

use housing_types::Grant;

use crate::config::PolicyConfig;
use crate::household::Household;

/// Pay every grant the household qualifies for this month.
///
/// Returns the grants paid, in declaration order.
pub fn apply_grants(household: &mut Household, period: u64, policy: &PolicyConfig) -> Vec<Grant> {
    let mut paid = Vec::new();

    if policy.starter_grant_enabled
        && household.age == policy.starter_grant_age
        && period > policy.starter_grant_after_period
    {
        pay(household, Grant::StarterSavings, policy.starter_grant_amount, &mut paid);
    }

    if policy.retirement_grant_enabled && household.age == policy.retirement_grant_age {
        pay(
            household,
            Grant::RetirementSavings,
            policy.retirement_grant_amount,
            &mut paid,
        );
    }

    if policy.low_income_grant_enabled
        && period == policy.low_income_grant_period
        && household.age == policy.low_income_grant_age
        && household.income_bin < policy.low_income_bin_limit
    {
        pay(household, Grant::LowIncome, policy.low_income_grant_amount, &mut paid);
    }

    paid
}

fn pay(household: &mut Household, grant: Grant, amount: f64, paid: &mut Vec<Grant>) {
    if household.grants.insert(grant) {
        household.savings += amount;
        paid.push(grant);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use housing_types::{HouseholdId, Position};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::AgentConfig;
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

    fn all_enabled() -> PolicyConfig {
        PolicyConfig {
            starter_grant_enabled: true,
            retirement_grant_enabled: true,
            low_income_grant_enabled: true,
            ..PolicyConfig::default()
        }
    }

    #[test]
    fn disabled_policy_pays_nothing() {
        let mut h = household(20);
        assert!(apply_grants(&mut h, 100, &PolicyConfig::default()).is_empty());
        assert!(h.savings.abs() < f64::EPSILON);
    }

    #[test]
    fn starter_grant_waits_for_period_gate() {
        let policy = all_enabled();
        let mut h = household(20);
        assert!(apply_grants(&mut h, 30, &policy).is_empty());
        assert_eq!(apply_grants(&mut h, 31, &policy), vec![Grant::StarterSavings]);
        assert!((h.savings - policy.starter_grant_amount).abs() < 1e-9);
    }

    #[test]
    fn grants_are_paid_once() {
        let policy = all_enabled();
        let mut h = household(75);
        assert_eq!(apply_grants(&mut h, 5, &policy), vec![Grant::RetirementSavings]);
        assert!(apply_grants(&mut h, 6, &policy).is_empty());
        assert!((h.savings - policy.retirement_grant_amount).abs() < 1e-9);
    }

    #[test]
    fn low_income_grant_is_means_tested() {
        let policy = all_enabled();
        let mut poor = household(25);
        poor.income_bin = 0;
        assert_eq!(apply_grants(&mut poor, 1, &policy), vec![Grant::LowIncome]);

        let mut rich = household(25);
        rich.income_bin = policy.low_income_bin_limit;
        assert!(apply_grants(&mut rich, 1, &policy).is_empty());

        let mut late = household(25);
        late.income_bin = 0;
        assert!(apply_grants(&mut late, 2, &policy).is_empty());
    }
}
