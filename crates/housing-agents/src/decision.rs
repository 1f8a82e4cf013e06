//! Monthly household decision protocol.
//!
//! [`step_household`] runs one household through its month in a fixed
//! order:
//!
//! 1. ageing,
//! 2. income walk (and crediting the month's income),
//! 3. savings and equity update,
//! 4. market participation: owners may list, renters try to buy,
//! 5. mortality,
//! 6. one-time policy grants.
//!
//! Every effect is applied to the [`Registry`] immediately, so a purchase
//! made by one household is visible to the next one in the same pass.

use housing_types::{DeathCause, Grant, HouseId, HouseholdId};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::AgentConfig;
use crate::distribution::IncomeTable;
use crate::error::AgentError;
use crate::mortality::check_death;
use crate::policy::apply_grants;
use crate::registry::{Registry, Transfer};
use crate::utility::utility;

/// What happened to one household during its activation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HouseholdOutcome {
    /// Purchase completed by this household, if any.
    pub purchase: Option<Transfer>,
    /// House this household put on the market, if any.
    pub listed: Option<HouseId>,
    /// Set when the household died and was removed.
    pub death: Option<DeathCause>,
    /// Grants paid this month.
    pub grants: Vec<Grant>,
}

/// Run one household through its month.
///
/// Returns an empty outcome if the household is no longer in the registry
/// (it may have been removed earlier in the same pass).
pub fn step_household(
    registry: &mut Registry,
    id: HouseholdId,
    period: u64,
    config: &AgentConfig,
    incomes: &IncomeTable,
    rng: &mut impl Rng,
) -> Result<HouseholdOutcome, AgentError> {
    let mut outcome = HouseholdOutcome::default();
    if !registry.contains_household(id) {
        return Ok(outcome);
    }

    // 1-2. Ageing and income.
    let household = registry.household_mut(id)?;
    household.age_one_month();
    household.update_income(incomes, rng);
    let house = household.house;

    // 3. Equity.
    let house_price = match house {
        Some(h) => Some(registry.house(h)?.price),
        None => None,
    };
    registry.household_mut(id)?.settle_month(house_price, config);

    // 4. Market participation.
    let household = registry.household(id)?;
    if config.can_trade_at(household.age) {
        match house {
            Some(home) => {
                if !registry.house(home)?.available {
                    let look_probability =
                        config.age_utility_scaling.mul_add(-f64::from(household.age), 1.0);
                    let roll: f64 = rng.random();
                    let empty = registry
                        .neighborhood_is_empty(household.position, config.empty_neighborhood_threshold);
                    if (roll < look_probability || empty)
                        && evaluate_listing(registry, id, config, rng)? > 0.0
                    {
                        registry.list_house(home)?;
                        debug!(period, household = %id, house = %home, "House listed");
                        outcome.listed = Some(home);
                    }
                }
            }
            None => {
                outcome.purchase = buy_house(registry, id, config)?;
            }
        }
    }

    // 5. Mortality.
    if let Some(cause) = check_death(registry.household(id)?, config, rng) {
        let gone = registry.remove_household(id)?;
        debug!(
            period,
            household = %id,
            age = gone.age,
            cause = %cause,
            released = gone.house.is_some(),
            "Household died"
        );
        outcome.death = Some(cause);
        return Ok(outcome);
    }

    // 6. Policy grants.
    outcome.grants = apply_grants(registry.household_mut(id)?, period, &config.policy);
    Ok(outcome)
}

/// Forecast of the house the household last sold, under its own strategy.
pub fn reference_forecast(registry: &Registry, id: HouseholdId) -> Result<Option<f64>, AgentError> {
    let household = registry.household(id)?;
    match household.sold_house {
        Some(sold) => Ok(Some(registry.house(sold)?.forecast(household.strategy))),
        None => Ok(None),
    }
}

/// Expected utility of putting the household's house on the market.
///
/// The household's budget is its mortgage quote, plus its own house's
/// forecast change net of the outstanding mortgage, plus savings; the house
/// price itself is not spendable. It samples the pool of other available
/// houses and weighs each candidate's utility by the share of affordable
/// houses that forecast better than its own. Owners without a house, or
/// with an empty sample, get 0.
pub fn evaluate_listing(
    registry: &Registry,
    id: HouseholdId,
    config: &AgentConfig,
    rng: &mut impl Rng,
) -> Result<f64, AgentError> {
    let household = registry.household(id)?;
    let Some(home_id) = household.house else {
        return Ok(0.0);
    };
    let strategy = household.strategy;
    let own_forecast = registry.house(home_id)?.forecast(strategy);

    let quote = household.mortgage_quote(config);
    let available_money = quote + (own_forecast - household.mortgage) + household.savings;

    let mut pool: Vec<HouseId> = registry
        .available_houses()
        .into_iter()
        .filter(|&h| h != home_id)
        .collect();
    pool.shuffle(rng);
    if let Some(limit) = config.search_sample_size {
        pool.truncate(limit);
    }

    let mut attractive = 0_usize;
    let mut affordable = 0_usize;
    for &candidate in &pool {
        let house = registry.house(candidate)?;
        if house.price < available_money {
            affordable += 1;
            if house.forecast(strategy) > own_forecast {
                attractive += 1;
            }
        }
    }
    let prob_buy = if attractive > 0 && affordable > 0 {
        attractive as f64 / affordable as f64
    } else {
        0.0
    };

    let reference = reference_forecast(registry, id)?.unwrap_or(0.0);
    let mut expected = 0.0;
    for &candidate in &pool {
        let house = registry.house(candidate)?;
        expected += utility(
            house.forecast(strategy),
            reference,
            household.position,
            house.position,
            &household.risk,
        ) * prob_buy;
    }
    Ok(expected)
}

/// Try to buy the best affordable house from the live available pool.
///
/// Without a reference point candidates are ranked by forecast, otherwise
/// by utility; ties keep pool order. The first candidate priced below
/// savings plus the mortgage quote is bought. Returns `None` when nothing is
/// affordable, which is a normal outcome.
pub fn buy_house(
    registry: &mut Registry,
    id: HouseholdId,
    config: &AgentConfig,
) -> Result<Option<Transfer>, AgentError> {
    let household = registry.household(id)?;
    let strategy = household.strategy;
    let position = household.position;
    let risk = household.risk;
    let quote = household.mortgage_quote(config);
    let budget = household.savings + quote;
    let reference = reference_forecast(registry, id)?;

    let mut ranked: Vec<(HouseId, f64, f64)> = Vec::new();
    for candidate in registry.available_houses() {
        let house = registry.house(candidate)?;
        if house.owner == Some(id) {
            continue;
        }
        let forecast = house.forecast(strategy);
        let score = reference.map_or(forecast, |r| {
            utility(forecast, r, position, house.position, &risk)
        });
        ranked.push((candidate, score, house.price));
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let Some(&(choice, _, _)) = ranked.iter().find(|(_, _, price)| *price < budget) else {
        return Ok(None);
    };

    let transfer = registry.transfer(choice, id, quote)?;
    debug!(
        household = %id,
        house = %choice,
        price = transfer.price,
        mortgage = transfer.buyer_mortgage,
        seller = ?transfer.seller,
        "House bought"
    );
    Ok(Some(transfer))
}
