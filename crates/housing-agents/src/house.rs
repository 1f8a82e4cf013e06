//! House agent: price process and forecasts.
//!
//! A house owns its price and two forecasts of the next price change. Each
//! tick the scheduler calls [`House::advance_price`] before any household
//! acts, so every decision in a tick sees the same prices.

use housing_types::{HouseId, HouseQuality, HouseSnapshot, HouseholdId, Position, Strategy};
use rand::Rng;

use crate::config::{PricingConfig, normal};

/// Months per year; a price tick at a multiple of this is a year boundary.
pub const MONTHS_PER_YEAR: u64 = 12;

/// A house on the market grid.
#[derive(Debug, Clone, PartialEq)]
pub struct House {
    /// Unique identifier.
    pub id: HouseId,
    /// Grid cell (fixed for the whole run).
    pub position: Position,
    /// Current price, always at least the configured minimum.
    pub price: f64,
    /// Last realized price change.
    pub price_change: f64,
    /// Naive forecast: the last price change.
    pub naive_forecast: f64,
    /// Sophisticated forecast: average change over elapsed periods.
    pub sophisticated_forecast: f64,
    /// Whether the house is on the market.
    pub available: bool,
    /// Current owner. A listed house keeps its seller until it is bought.
    pub owner: Option<HouseholdId>,
    /// Drift class.
    pub quality: HouseQuality,
    /// Own annual drift in percent, drawn at creation.
    pub drift: f64,
    /// Sum of all realized price changes.
    cumulative_change: f64,
}

impl House {
    /// Create an unowned, available house.
    pub const fn new(
        id: HouseId,
        position: Position,
        price: f64,
        drift: f64,
        quality: HouseQuality,
    ) -> Self {
        Self {
            id,
            position,
            price,
            price_change: 0.0,
            naive_forecast: 0.0,
            sophisticated_forecast: 0.0,
            available: true,
            owner: None,
            quality,
            drift,
            cumulative_change: 0.0,
        }
    }

    /// Annual shock in percent: own drift plus model inflation.
    pub fn shock(&self, pricing: &PricingConfig) -> f64 {
        self.drift + pricing.inflation_rate
    }

    /// Advance the price by one month and update both forecasts.
    ///
    /// At a year boundary the percentage change is drawn from
    /// `Normal(shock, 2 * |shock|)`; in other months mean and spread are
    /// scaled by `monthly_shock_scale`. The sign of the change flips with
    /// `sign_flip_probability`. Returns the realized change.
    pub fn advance_price(
        &mut self,
        period: u64,
        pricing: &PricingConfig,
        rng: &mut impl Rng,
    ) -> f64 {
        let shock = self.shock(pricing);
        let scale = if period.is_multiple_of(MONTHS_PER_YEAR) {
            1.0
        } else {
            pricing.monthly_shock_scale
        };
        let percent = normal(rng, shock * scale, 2.0 * shock.abs() * scale);

        let mut change = self.price * percent / 100.0;
        if rng.random::<f64>() < pricing.sign_flip_probability {
            change = -change;
        }

        let old = self.price;
        self.price = (old + change).max(pricing.minimum_price);
        let realized = self.price - old;
        self.record_price_change(realized, period);
        realized
    }

    /// Fold a realized price change into the forecasts.
    pub fn record_price_change(&mut self, change: f64, period: u64) {
        self.price_change = change;
        self.naive_forecast = change;
        self.cumulative_change += change;
        self.sophisticated_forecast = self.cumulative_change / (period + 1) as f64;
    }

    /// The forecast a household with `strategy` would use.
    pub const fn forecast(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Naive => self.naive_forecast,
            Strategy::Sophisticated => self.sophisticated_forecast,
        }
    }

    /// Read-only view of the public fields.
    pub const fn snapshot(&self) -> HouseSnapshot {
        HouseSnapshot {
            id: self.id,
            position: self.position,
            price: self.price,
            price_change: self.price_change,
            naive_forecast: self.naive_forecast,
            sophisticated_forecast: self.sophisticated_forecast,
            available: self.available,
            owner: self.owner,
            quality: self.quality,
        }
    }
}
