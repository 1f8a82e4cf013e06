//! Sale ledger for the housing market simulation.
//!
//! Agents keep their money in `f64` because prices follow a continuous
//! stochastic process. Every completed purchase is additionally booked here
//! in [`Decimal`], rounded to cents, so per-period volumes and the balance
//! of each sale can be checked exactly.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`SaleLedger`]: append-only log with period queries.
//! - [`sale`] -- The [`SaleBuilder`] for validated record construction.
//! - [`balance`] -- Per-period balance verification.
//!
//! # Balance Law
//!
//! For every sale S:
//!
//! ```text
//! buyer_mortgage + buyer_outlay == price
//! seller_proceeds + seller_mortgage_settled == price   (if S has a seller)
//! ```
//!
//! Both sides hold by construction; the check guards against corrupted
//! records.
//!
//! # Usage
//!
//! ```
//! use housing_ledger::{BalanceResult, SaleLedger, SaleParams};
//! use housing_types::{HouseId, HouseholdId};
//!
//! let mut ledger = SaleLedger::new();
//! ledger
//!     .record_sale(SaleParams {
//!         period: 3,
//!         house: HouseId::new(1),
//!         buyer: HouseholdId::new(7),
//!         seller: None,
//!         price: 200_000.0,
//!         buyer_mortgage: 150_000.0,
//!         seller_mortgage: 0.0,
//!     })
//!     .ok();
//!
//! assert_eq!(ledger.sales_in(3).len(), 1);
//! assert_eq!(ledger.verify_balance(3), BalanceResult::Balanced);
//! ```

pub mod balance;
pub mod ledger;
pub mod sale;

// Re-export primary types at crate root.
pub use balance::BalanceResult;
pub use ledger::{SaleLedger, SaleParams};
pub use sale::{SaleBuilder, SaleRecord};

use rust_decimal::Decimal;

use housing_types::SaleId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording a sale.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// An amount was NaN, infinite, or too large for a decimal.
    #[error("{field} is not a finite amount: {value}")]
    NonFinite {
        /// Which amount was rejected.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Prices must be strictly positive.
    #[error("sale price must be positive, got {price}")]
    NonPositivePrice {
        /// The rejected price.
        price: Decimal,
    },

    /// Mortgages must not be negative.
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount {
        /// Which amount was rejected.
        field: &'static str,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A buyer can never borrow more than the price.
    #[error("buyer mortgage {mortgage} exceeds price {price}")]
    MortgageExceedsPrice {
        /// Mortgage after rounding.
        mortgage: Decimal,
        /// Price after rounding.
        price: Decimal,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A balance violation found while verifying a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAnomaly {
    /// The period that was verified.
    pub period: u64,
    /// Sales whose two sides do not add up to the price.
    pub sales: Vec<SaleId>,
    /// Human-readable description.
    pub message: String,
}

impl core::fmt::Display for BalanceAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
