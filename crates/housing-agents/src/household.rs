//! Household agent state and its monthly bookkeeping.
//!
//! This module covers everything a household does to itself: ageing, the
//! income walk, and the savings/equity update. Decisions that touch houses
//! or other households (listing, buying, dying) live in [`crate::decision`]
//! and [`crate::registry`], which own the cross-agent links.

use std::collections::BTreeSet;

use housing_types::{Grant, HouseId, HouseholdId, HouseholdSnapshot, Position, RiskProfile, Strategy};
use rand::Rng;

use crate::config::AgentConfig;
use crate::distribution::IncomeTable;

/// Months in a year of household age.
pub const MONTHS_PER_YEAR: u32 = 12;

/// A household in the market.
#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    /// Unique identifier, never reused.
    pub id: HouseholdId,
    /// Grid cell. Reset to [`Position::OFF_MARKET`] when evicted by a sale.
    pub position: Position,
    /// Liquid savings; may go negative.
    pub savings: f64,
    /// Monthly income.
    pub income: f64,
    /// Current bin in the income table.
    pub income_bin: usize,
    /// Percentile position within the age bracket.
    pub income_percentile: f64,
    /// Age in years.
    pub age: u32,
    /// Months since the last birthday (0-11).
    pub monthly_ageing: u32,
    /// Outstanding mortgage (0 without one).
    pub mortgage: f64,
    /// Housing-adjusted net wealth, recomputed every month.
    pub equity: f64,
    /// Forecast strategy, fixed at creation.
    pub strategy: Strategy,
    /// Prospect-theory parameters, fixed at creation.
    pub risk: RiskProfile,
    /// Owned house.
    pub house: Option<HouseId>,
    /// Last house this household sold; its forecast is the utility
    /// reference point.
    pub sold_house: Option<HouseId>,
    /// Consecutive months without a house.
    pub months_renting: u32,
    /// One-time grants already paid.
    pub grants: BTreeSet<Grant>,
}

impl Household {
    /// Create a renter of the given age, sampling income, strategy and risk
    /// profile.
    ///
    /// The age is clamped into `[minimum_age, maximum_age - 1]` so a freshly
    /// created household is never due for removal.
    pub fn spawn(
        id: HouseholdId,
        age: u32,
        savings: f64,
        position: Position,
        config: &AgentConfig,
        incomes: &IncomeTable,
        rng: &mut impl Rng,
    ) -> Self {
        let oldest = config.maximum_age.saturating_sub(1).max(config.minimum_age);
        let age = age.clamp(config.minimum_age, oldest);
        let draw = incomes.sample_initial(age, rng);
        let strategy = config.risk.sample_strategy(rng);
        let risk = config.risk.sample_profile(rng);
        Self {
            id,
            position,
            savings,
            income: draw.income,
            income_bin: draw.bin,
            income_percentile: draw.percentile,
            age,
            monthly_ageing: 0,
            mortgage: 0.0,
            equity: savings,
            strategy,
            risk,
            house: None,
            sold_house: None,
            months_renting: 0,
            grants: BTreeSet::new(),
        }
    }

    /// Whether the household owns a house.
    pub const fn is_owner(&self) -> bool {
        self.house.is_some()
    }

    /// Advance the month counter; returns `true` on a birthday.
    pub const fn age_one_month(&mut self) -> bool {
        self.monthly_ageing += 1;
        if self.monthly_ageing >= MONTHS_PER_YEAR {
            self.monthly_ageing = 0;
            self.age = self.age.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Take one step of the income walk and credit the month's income.
    pub fn update_income(&mut self, incomes: &IncomeTable, rng: &mut impl Rng) {
        let draw = incomes.walk(self.age, self.income_bin, rng);
        self.income = draw.income;
        self.income_bin = draw.bin;
        self.income_percentile = draw.percentile;
        self.savings += self.income;
    }

    /// Monthly savings and equity update.
    ///
    /// `house_price` is the price of the owned house, `None` for renters.
    pub fn settle_month(&mut self, house_price: Option<f64>, config: &AgentConfig) {
        if let Some(price) = house_price {
            self.savings += config.payoff_fraction * price;
            self.equity = price + self.savings - self.mortgage;
            self.months_renting = 0;
        } else {
            self.savings -= config.rental_cost;
            self.equity = self.savings - self.mortgage;
            self.months_renting = self.months_renting.saturating_add(1);
        }
    }

    /// What a bank would lend this household.
    pub fn mortgage_quote(&self, config: &AgentConfig) -> f64 {
        (self.income * 12.0 * config.bank_income_multiplier).max(0.0)
    }

    /// Read-only view of the public fields.
    pub const fn snapshot(&self) -> HouseholdSnapshot {
        HouseholdSnapshot {
            id: self.id,
            position: self.position,
            savings: self.savings,
            income: self.income,
            age: self.age,
            mortgage: self.mortgage,
            equity: self.equity,
            house: self.house,
            strategy: self.strategy,
            months_renting: self.months_renting,
        }
    }
}
