//! Sale records and their validated construction.
//!
//! The [`SaleBuilder`] converts the `f64` amounts of a completed transfer to
//! cents and derives the dependent amounts (buyer outlay, seller proceeds)
//! in decimal arithmetic, so both sides of a record add up exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use housing_types::{HouseId, HouseholdId, SaleId};

use crate::LedgerError;

/// Decimal places kept for every amount.
pub const CENTS: u32 = 2;

/// One completed house purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Sequential sale number.
    pub id: SaleId,
    /// Period in which the sale happened.
    pub period: u64,
    /// House sold.
    pub house: HouseId,
    /// New owner.
    pub buyer: HouseholdId,
    /// Previous owner, if any.
    pub seller: Option<HouseholdId>,
    /// Transaction price.
    pub price: Decimal,
    /// Mortgage taken by the buyer.
    pub buyer_mortgage: Decimal,
    /// Part of the price paid from the buyer's savings.
    pub buyer_outlay: Decimal,
    /// Net amount credited to the seller.
    pub seller_proceeds: Decimal,
    /// Seller mortgage repaid out of the price.
    pub seller_mortgage_settled: Decimal,
}

impl SaleRecord {
    /// Whether both sides of the sale add up to the price.
    pub fn is_balanced(&self) -> bool {
        let buyer_side = self.buyer_mortgage.checked_add(self.buyer_outlay);
        if buyer_side != Some(self.price) {
            return false;
        }
        if self.seller.is_none() {
            return true;
        }
        self.seller_proceeds
            .checked_add(self.seller_mortgage_settled)
            == Some(self.price)
    }
}

/// Builder for [`SaleRecord`].
#[derive(Debug, Clone)]
pub struct SaleBuilder {
    period: u64,
    house: HouseId,
    buyer: HouseholdId,
    seller: Option<(HouseholdId, f64)>,
    price: Option<f64>,
    buyer_mortgage: f64,
}

impl SaleBuilder {
    /// Start a record for `buyer` purchasing `house` in `period`.
    pub const fn new(period: u64, house: HouseId, buyer: HouseholdId) -> Self {
        Self {
            period,
            house,
            buyer,
            seller: None,
            price: None,
            buyer_mortgage: 0.0,
        }
    }

    /// Set the previous owner and the mortgage it had outstanding.
    pub const fn seller(mut self, seller: HouseholdId, outstanding_mortgage: f64) -> Self {
        self.seller = Some((seller, outstanding_mortgage));
        self
    }

    /// Set the transaction price.
    pub const fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the mortgage taken by the buyer (default 0).
    pub const fn buyer_mortgage(mut self, mortgage: f64) -> Self {
        self.buyer_mortgage = mortgage;
        self
    }

    /// Validate and build the record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the price is missing or not positive, an
    /// amount is not finite or is negative, or the buyer's mortgage exceeds
    /// the price.
    pub fn build(self, id: SaleId) -> Result<SaleRecord, LedgerError> {
        let raw_price = self.price.ok_or(LedgerError::MissingField("price"))?;
        let price = to_cents("price", raw_price)?;
        if price <= Decimal::ZERO {
            return Err(LedgerError::NonPositivePrice { price });
        }

        let buyer_mortgage = to_cents("buyer_mortgage", self.buyer_mortgage)?;
        if buyer_mortgage < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount {
                field: "buyer_mortgage",
                amount: buyer_mortgage,
            });
        }
        if buyer_mortgage > price {
            return Err(LedgerError::MortgageExceedsPrice {
                mortgage: buyer_mortgage,
                price,
            });
        }
        let buyer_outlay = price - buyer_mortgage;

        let (seller, seller_mortgage_settled, seller_proceeds) = match self.seller {
            Some((id, outstanding)) => {
                let settled = to_cents("seller_mortgage", outstanding)?;
                if settled < Decimal::ZERO {
                    return Err(LedgerError::NegativeAmount {
                        field: "seller_mortgage",
                        amount: settled,
                    });
                }
                (Some(id), settled, price - settled)
            }
            None => (None, Decimal::ZERO, Decimal::ZERO),
        };

        Ok(SaleRecord {
            id,
            period: self.period,
            house: self.house,
            buyer: self.buyer,
            seller,
            price,
            buyer_mortgage,
            buyer_outlay,
            seller_proceeds,
            seller_mortgage_settled,
        })
    }
}

/// Convert an `f64` amount to a decimal rounded to cents.
fn to_cents(field: &'static str, value: f64) -> Result<Decimal, LedgerError> {
    if !value.is_finite() {
        return Err(LedgerError::NonFinite { field, value });
    }
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(CENTS))
        .ok_or(LedgerError::NonFinite { field, value })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn builder() -> SaleBuilder {
        SaleBuilder::new(4, HouseId::new(2), HouseholdId::new(9))
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        let sale = builder()
            .price(123_456.789)
            .buyer_mortgage(100_000.004)
            .build(SaleId::new(1))
            .unwrap();
        assert_eq!(sale.price, dec!(123456.79));
        assert_eq!(sale.buyer_mortgage, dec!(100000.00));
        assert_eq!(sale.buyer_outlay, dec!(23456.79));
        assert!(sale.is_balanced());
    }

    #[test]
    fn seller_side_is_derived() {
        let sale = builder()
            .price(200_000.0)
            .seller(HouseholdId::new(3), 120_000.5)
            .build(SaleId::new(1))
            .unwrap();
        assert_eq!(sale.seller, Some(HouseholdId::new(3)));
        assert_eq!(sale.seller_mortgage_settled, dec!(120000.50));
        assert_eq!(sale.seller_proceeds, dec!(79999.50));
        assert!(sale.is_balanced());
    }

    #[test]
    fn underwater_seller_has_negative_proceeds() {
        let sale = builder()
            .price(50_000.0)
            .seller(HouseholdId::new(3), 80_000.0)
            .build(SaleId::new(1))
            .unwrap();
        assert_eq!(sale.seller_proceeds, dec!(-30000));
        assert!(sale.is_balanced());
    }

    #[test]
    fn missing_price_rejected() {
        let err = builder().build(SaleId::new(1)).err();
        assert!(matches!(err, Some(LedgerError::MissingField("price"))));
    }

    #[test]
    fn non_finite_price_rejected() {
        let err = builder().price(f64::NAN).build(SaleId::new(1)).err();
        assert!(matches!(err, Some(LedgerError::NonFinite { field: "price", .. })));
    }

    #[test]
    fn zero_price_rejected() {
        let err = builder().price(0.001).build(SaleId::new(1)).err();
        assert!(matches!(err, Some(LedgerError::NonPositivePrice { .. })));
    }

    #[test]
    fn oversized_mortgage_rejected() {
        let err = builder()
            .price(100.0)
            .buyer_mortgage(100.5)
            .build(SaleId::new(1))
            .err();
        assert!(matches!(err, Some(LedgerError::MortgageExceedsPrice { .. })));
    }

    #[test]
    fn tampered_record_is_unbalanced() {
        let mut sale = builder()
            .price(100.0)
            .buyer_mortgage(40.0)
            .build(SaleId::new(1))
            .unwrap();
        sale.buyer_outlay = dec!(59.99);
        assert!(!sale.is_balanced());
    }

    #[test]
    fn record_serializes() {
        let sale = builder().price(10.0).build(SaleId::new(5)).unwrap();
        let json = serde_json::to_string(&sale).unwrap();
        let back: SaleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sale);
    }
}
