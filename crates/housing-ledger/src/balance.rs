//! Balance verification for one period of sales.

use tracing::warn;

use crate::BalanceAnomaly;
use crate::sale::SaleRecord;

/// The result of a balance check for a single period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceResult {
    /// Every sale in the period balances.
    Balanced,
    /// At least one sale does not.
    Anomaly(BalanceAnomaly),
}

/// Verify that every sale recorded in `period` balances on both sides.
///
/// Periods without sales are trivially balanced.
pub fn verify_balance(period: u64, sales: &[SaleRecord]) -> BalanceResult {
    let broken: Vec<_> = sales
        .iter()
        .filter(|s| s.period == period && !s.is_balanced())
        .map(|s| s.id)
        .collect();

    if broken.is_empty() {
        return BalanceResult::Balanced;
    }

    let count = broken.len();
    warn!(period, count, "Unbalanced sales in ledger");
    BalanceResult::Anomaly(BalanceAnomaly {
        period,
        sales: broken,
        message: format!("LEDGER_ANOMALY in period {period}: {count} unbalanced sale(s)"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use housing_types::{HouseId, HouseholdId, SaleId};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::sale::SaleBuilder;

    fn sale(id: u64, period: u64) -> SaleRecord {
        SaleBuilder::new(period, HouseId::new(1), HouseholdId::new(1))
            .price(1000.0)
            .buyer_mortgage(600.0)
            .build(SaleId::new(id))
            .unwrap()
    }

    #[test]
    fn empty_period_is_balanced() {
        assert_eq!(verify_balance(0, &[]), BalanceResult::Balanced);
    }

    #[test]
    fn corrupted_sale_reported_in_its_period_only() {
        let mut bad = sale(2, 5);
        bad.buyer_mortgage = dec!(700);
        let sales = vec![sale(1, 5), bad, sale(3, 6)];

        assert_eq!(verify_balance(6, &sales), BalanceResult::Balanced);
        let result = verify_balance(5, &sales);
        assert!(matches!(result, BalanceResult::Anomaly(_)));
        if let BalanceResult::Anomaly(anomaly) = result {
            assert_eq!(anomaly.period, 5);
            assert_eq!(anomaly.sales, vec![SaleId::new(2)]);
            assert!(anomaly.to_string().contains("period 5"));
        }
    }
}
