//! Core value structs shared across the workspace.
//!
//! Agent state itself lives in `housing-agents`; this module holds the
//! small value types agents are built from and the read-only snapshot
//! records handed to statistics collectors and output writers.

use serde::{Deserialize, Serialize};

use crate::enums::{HouseQuality, Strategy};
use crate::ids::{HouseId, HouseholdId};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A cell on the market grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Position {
    /// Placeholder cell for households that were evicted by a sale and have
    /// not bought again yet.
    pub const OFF_MARKET: Self = Self { x: 0, y: 0 };

    /// Create a position from its coordinates.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another cell.
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

// ---------------------------------------------------------------------------
// Risk profile
// ---------------------------------------------------------------------------

/// Prospect-theory parameters of a household, drawn once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Curvature for gains (`x^alpha`).
    pub alpha: f64,
    /// Curvature for losses (`|x|^beta`).
    pub beta: f64,
    /// Loss aversion multiplier.
    pub lambda: f64,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self {
            alpha: 0.88,
            beta: 0.88,
            lambda: 2.25,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Read-only view of a house's public fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseSnapshot {
    /// House identifier.
    pub id: HouseId,
    /// Grid cell.
    pub position: Position,
    /// Current price.
    pub price: f64,
    /// Last price change.
    pub price_change: f64,
    /// Naive forecast (last change).
    pub naive_forecast: f64,
    /// Sophisticated forecast (average change over elapsed periods).
    pub sophisticated_forecast: f64,
    /// Whether the house is on the market.
    pub available: bool,
    /// Current owner, if any.
    pub owner: Option<HouseholdId>,
    /// Drift class.
    pub quality: HouseQuality,
}

/// Read-only view of a household's public fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    /// Household identifier.
    pub id: HouseholdId,
    /// Grid cell.
    pub position: Position,
    /// Savings (may be negative).
    pub savings: f64,
    /// Monthly income.
    pub income: f64,
    /// Age in years.
    pub age: u32,
    /// Outstanding mortgage.
    pub mortgage: f64,
    /// Net housing-adjusted wealth computed this month.
    pub equity: f64,
    /// Owned house, if any.
    pub house: Option<HouseId>,
    /// Forecast strategy.
    pub strategy: Strategy,
    /// Consecutive months without a house.
    pub months_renting: u32,
}

/// Full read-only view of both agent tables at the end of a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Months elapsed.
    pub period: u64,
    /// All houses, ordered by id.
    pub houses: Vec<HouseSnapshot>,
    /// All living households, ordered by id.
    pub households: Vec<HouseholdSnapshot>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate statistics collected after each tick.
///
/// Every average over an empty group is reported as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Gini coefficient of household savings.
    pub gini: f64,
    /// Mean monthly income.
    pub average_income: f64,
    /// Mean household age in years.
    pub mean_age: f64,
    /// Mean savings over all households.
    pub average_savings: f64,
    /// Mean savings per age bracket, in [`AgeBracket::ALL`] order.
    ///
    /// [`AgeBracket::ALL`]: crate::AgeBracket::ALL
    pub savings_by_bracket: Vec<f64>,
    /// Mean house price.
    pub average_price: f64,
    /// Houses currently on the market.
    pub available_houses: u32,
    /// Households that own a house.
    pub owners: u32,
    /// Households without a house.
    pub renters: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert!(b.distance_to(b).abs() < 1e-12);
    }

    #[test]
    fn off_market_is_origin() {
        assert_eq!(Position::OFF_MARKET, Position::new(0, 0));
    }
}
