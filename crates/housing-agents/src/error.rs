//! Error types for the housing-agents crate.
//!
//! Agent behavior itself never fails: empty pools, zero neighbors and
//! unaffordable markets are normal outcomes handled with numeric guards.
//! The errors here cover broken table lookups (an id that is not in the
//! market) and malformed distribution tables, which must fail at load time.

use housing_types::{HouseId, HouseholdId};

/// Errors that can occur while operating on the agent tables.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Household with the given ID is not in the population.
    #[error("household not found: {0}")]
    HouseholdNotFound(HouseholdId),

    /// House with the given ID is not in the market.
    #[error("house not found: {0}")]
    HouseNotFound(HouseId),

    /// A house and its owner disagree about who owns what.
    #[error("ownership mismatch on house {house}: {reason}")]
    OwnershipMismatch {
        /// The house whose links are inconsistent.
        house: HouseId,
        /// Description of the inconsistency.
        reason: String,
    },

    /// A purchase was attempted on a house that is not on the market.
    #[error("house {0} is not for sale")]
    NotForSale(HouseId),

    /// A household that already owns a house attempted to buy another.
    #[error("household {0} already owns a house")]
    AlreadyOwner(HouseholdId),
}

/// Errors raised while validating distribution tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table has no rows.
    #[error("{table} table is empty")]
    Empty {
        /// Which table was empty.
        table: &'static str,
    },

    /// Income bins must be numbered 0, 1, 2, ... in order.
    #[error("income bins out of order: expected bin {expected}, found {found}")]
    BinOutOfOrder {
        /// The bin index expected at this row.
        expected: usize,
        /// The bin index found.
        found: usize,
    },

    /// Cumulative thresholds must not decrease from one bin to the next.
    #[error("non-monotonic percentile column {bracket} at bin {bin}")]
    NonMonotonic {
        /// Age bracket column (0-based).
        bracket: usize,
        /// Bin at which the threshold decreased.
        bin: usize,
    },

    /// A cumulative threshold was outside `[0, 1]` or not finite.
    #[error("percentile threshold {value} out of range in column {bracket} at bin {bin}")]
    ThresholdOutOfRange {
        /// Age bracket column (0-based).
        bracket: usize,
        /// Offending bin.
        bin: usize,
        /// Offending value.
        value: f64,
    },

    /// A percentile column never reaches a positive threshold.
    #[error("percentile column {bracket} has no positive weight")]
    EmptyColumn {
        /// Age bracket column (0-based).
        bracket: usize,
    },

    /// A count or income was negative or not finite.
    #[error("invalid value {value} in {table} table")]
    InvalidValue {
        /// Which table held the value.
        table: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Ages in the age table must be strictly ascending.
    #[error("ages out of order at age {age}")]
    AgeOutOfOrder {
        /// The age that broke the ordering.
        age: u32,
    },

    /// The age table's counts sum to zero.
    #[error("age table has zero total weight")]
    ZeroWeight,
}
