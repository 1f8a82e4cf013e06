//! Market-level invariants checked across many ticks and seeds.
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use housing_agents::{House, Household, IncomeRow, IncomeTable};
use housing_core::config::MarketConfig;
use housing_core::market::Market;
use housing_core::runner::{NoOpCallback, run_simulation};
use housing_core::stats::gini;
use housing_core::tick::run_tick;
use housing_types::{HouseId, HouseQuality, HouseholdId, Position};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn config(seed: u64, houses: u32, households: u32) -> MarketConfig {
    let mut config = MarketConfig::default();
    config.world.seed = seed;
    config.world.width = 8;
    config.world.height = 8;
    config.population.initial_houses = houses;
    config.population.initial_households = households;
    config
}

/// Income table with a single zero-income bin.
fn zero_incomes() -> IncomeTable {
    IncomeTable::from_rows(&[IncomeRow {
        bin: 0,
        income: 0.0,
        cumulative: [1.0; 7],
    }])
    .unwrap()
}

/// An empty market where nothing costs or earns anything on its own.
fn quiet_market() -> Market {
    let mut market = Market::new(&config(1, 0, 0)).unwrap();
    market.tables.incomes = zero_incomes();
    market.agent_config.rental_cost = 0.0;
    market.agent_config.bank_income_multiplier = 0.0;
    market.agent_config.pricing.inflation_rate = 0.0;
    market
}

fn add_renter(market: &mut Market, savings: f64, age: u32) -> HouseholdId {
    let mut rng = StdRng::seed_from_u64(5);
    let config = market.agent_config.clone();
    let incomes = market.tables.incomes.clone();
    market.registry.add_household(|id| {
        Household::spawn(id, age, savings, Position::new(0, 0), &config, &incomes, &mut rng)
    })
}

fn assert_single_ownership(market: &Market) {
    market.registry.check_ownership().unwrap();
    let mut owned: BTreeSet<HouseId> = BTreeSet::new();
    for household in market.registry.households() {
        if let Some(house) = household.house {
            assert!(owned.insert(house), "house {house} owned twice");
        }
    }
    for house in market.registry.houses() {
        assert!(house.available || house.owner.is_some());
        assert!(house.price > 0.0);
    }
}

#[test]
fn renter_with_enough_savings_buys_the_only_house() {
    let mut market = quiet_market();
    let house = market
        .registry
        .add_house(Position::new(2, 2), 200_000.0, 0.0, HouseQuality::Ordinary);
    let buyer = add_renter(&mut market, 250_000.0, 30);

    let summary = run_tick(&mut market).unwrap();
    assert_eq!(summary.sales, 1);

    let household = market.registry.household(buyer).unwrap();
    let home = market.registry.house(house).unwrap();
    assert_eq!(household.house, Some(house));
    assert_eq!(home.owner, Some(buyer));
    assert!(!home.available);
    assert!((home.price - 200_000.0).abs() < 1e-9);
    assert!(household.mortgage.abs() < f64::EPSILON);
    let expected = 250_000.0 - (home.price - household.mortgage);
    assert!((household.savings - expected).abs() < 1e-6);
    assert_eq!(household.position, home.position);
}

#[test]
fn zero_savings_and_zero_income_cannot_buy() {
    let mut market = quiet_market();
    let house = market
        .registry
        .add_house(Position::new(1, 1), 200_000.0, 0.0, HouseQuality::Ordinary);
    let renter = add_renter(&mut market, 0.0, 30);

    for _ in 0..6 {
        run_tick(&mut market).unwrap();
    }
    assert!(!market.registry.household(renter).unwrap().is_owner());
    assert!(market.registry.house(house).unwrap().available);
    assert!(market.ledger.is_empty());
}

#[test]
fn owner_at_maximum_age_is_replaced_by_a_newborn() {
    let mut market = Market::new(&config(3, 1, 1)).unwrap();
    let elder = *market.registry.household_ids().first().unwrap();
    let house = market.registry.household(elder).unwrap().house.unwrap();
    let maximum_age = market.agent_config.maximum_age;
    {
        let household = market.registry.household_mut(elder).unwrap();
        household.age = maximum_age - 1;
        household.monthly_ageing = 11;
    }

    let summary = run_tick(&mut market).unwrap();
    assert_eq!(summary.deaths_at_maximum_age, 1);
    assert_eq!(summary.births, 1);
    assert!(!market.registry.contains_household(elder));

    let released = market.registry.house(house).unwrap();
    assert!(released.available);
    assert_eq!(released.owner, None);

    assert_eq!(market.registry.household_count(), 1);
    let newborn = market.registry.households().next().unwrap();
    assert_eq!(newborn.age, market.agent_config.minimum_age);
    assert!(newborn.id > elder);
    assert!(!newborn.is_owner());
}

#[test]
fn zero_shock_keeps_prices_fixed() {
    let mut cfg = config(11, 25, 0);
    cfg.economy.inflation_rate = 0.0;
    cfg.housing.price_shock_range = [0.0, 0.0];
    let mut market = Market::new(&cfg).unwrap();
    let before: Vec<f64> = market.registry.houses().map(|h| h.price).collect();

    for _ in 0..24 {
        run_tick(&mut market).unwrap();
    }
    let after: Vec<f64> = market.registry.houses().map(|h| h.price).collect();
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn constant_price_change_drives_both_forecasts() {
    let mut house = House::new(
        HouseId::new(1),
        Position::new(0, 0),
        100_000.0,
        0.0,
        HouseQuality::Ordinary,
    );
    for period in 0..48 {
        house.record_price_change(250.0, period);
        assert!((house.naive_forecast - 250.0).abs() < 1e-9);
        assert!((house.sophisticated_forecast - 250.0).abs() < 1e-6);
    }
}

#[test]
fn gini_scenarios() {
    assert!(gini(&[1234.0; 50]).abs() < 1e-12);
    let mut values = vec![0.0; 9];
    values.push(5_000.0);
    assert!((gini(&values) - 0.9).abs() < 1e-12);
}

#[test]
fn long_run_keeps_every_invariant() {
    let mut market = Market::new(&config(2024, 70, 100)).unwrap();
    for _ in 0..120 {
        let summary = run_tick(&mut market).unwrap();
        assert_eq!(summary.households, 100);
        assert_eq!(market.registry.household_count(), 100);
        assert_eq!(summary.stats.owners + summary.stats.renters, 100);
        assert_single_ownership(&market);
    }
    for sale in market.ledger.records() {
        assert!(sale.buyer_mortgage <= sale.price);
        assert!(sale.is_balanced());
    }
    let ages = market.registry.households().map(|h| h.age);
    let cfg = &market.agent_config;
    for age in ages {
        assert!(age >= cfg.minimum_age && age < cfg.maximum_age);
    }
}

#[test]
fn runner_matches_manual_ticks() {
    let mut a = Market::new(&config(77, 20, 30)).unwrap();
    let mut b = Market::new(&config(77, 20, 30)).unwrap();
    let result = run_simulation(&mut a, 10, &mut NoOpCallback).unwrap();
    let mut last = None;
    for _ in 0..10 {
        last = Some(run_tick(&mut b).unwrap());
    }
    assert_eq!(result.final_summary, last);
    assert_eq!(a.snapshot(), b.snapshot());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn invariants_hold_for_any_seed(seed in any::<u64>(), houses in 0_u32..30, households in 0_u32..30) {
        let mut market = Market::new(&config(seed, houses, households)).unwrap();
        for _ in 0..24 {
            let summary = run_tick(&mut market).unwrap();
            prop_assert_eq!(summary.households, households);
            prop_assert!(summary.stats.gini >= 0.0);
            assert_single_ownership(&market);
        }
        for sale in market.ledger.records() {
            prop_assert!(sale.buyer_mortgage <= sale.price);
        }
    }
}
