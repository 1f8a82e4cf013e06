//! The sale ledger: an append-only log of completed purchases.
//!
//! # Design
//!
//! - **Append-only**: records are never modified or deleted.
//! - **Precision**: all amounts are [`Decimal`] rounded to cents.
//! - **Ordered**: records are kept in the order sales happened, so period
//!   queries return sales in activation order.

use rust_decimal::Decimal;

use housing_types::{HouseId, HouseholdId, SaleId};

use crate::LedgerError;
use crate::balance::{self, BalanceResult};
use crate::sale::{SaleBuilder, SaleRecord};

/// Parameters of a completed purchase, in simulation units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleParams {
    /// Period in which the sale happened.
    pub period: u64,
    /// House sold.
    pub house: HouseId,
    /// New owner.
    pub buyer: HouseholdId,
    /// Previous owner, if any.
    pub seller: Option<HouseholdId>,
    /// Transaction price.
    pub price: f64,
    /// Mortgage taken by the buyer.
    pub buyer_mortgage: f64,
    /// Mortgage the seller had outstanding (ignored without a seller).
    pub seller_mortgage: f64,
}

/// Every sale of the run.
#[derive(Debug)]
pub struct SaleLedger {
    records: Vec<SaleRecord>,
    next_id: SaleId,
}

impl Default for SaleLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SaleLedger {
    /// Create an empty ledger. Sale ids start at 1.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: SaleId::new(1),
        }
    }

    /// Number of recorded sales.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no sale has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    /// Validate and append a sale.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the amounts fail validation; nothing is
    /// appended in that case.
    pub fn record_sale(&mut self, params: SaleParams) -> Result<&SaleRecord, LedgerError> {
        let mut builder = SaleBuilder::new(params.period, params.house, params.buyer)
            .price(params.price)
            .buyer_mortgage(params.buyer_mortgage);
        if let Some(seller) = params.seller {
            builder = builder.seller(seller, params.seller_mortgage);
        }

        let index = self.records.len();
        self.records.push(builder.build(self.next_id)?);
        self.next_id = self.next_id.next();
        self.records
            .get(index)
            .ok_or(LedgerError::MissingField("record"))
    }

    /// Sales recorded in `period`.
    pub fn sales_in(&self, period: u64) -> Vec<&SaleRecord> {
        self.records.iter().filter(|s| s.period == period).collect()
    }

    /// Total price of all sales in `period`.
    pub fn volume(&self, period: u64) -> Decimal {
        self.records
            .iter()
            .filter(|s| s.period == period)
            .map(|s| s.price)
            .sum()
    }

    /// Mean sale price in `period`, `None` if nothing sold.
    pub fn mean_price(&self, period: u64) -> Option<Decimal> {
        let count = self.records.iter().filter(|s| s.period == period).count();
        if count == 0 {
            return None;
        }
        self.volume(period)
            .checked_div(Decimal::from(count))
            .map(|m| m.round_dp(crate::sale::CENTS))
    }

    /// Verify that every sale in `period` balances.
    pub fn verify_balance(&self, period: u64) -> BalanceResult {
        balance::verify_balance(period, &self.records)
    }
}
