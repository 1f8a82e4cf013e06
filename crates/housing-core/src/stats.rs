//! Statistics collectors run over the end-of-tick snapshot.
//!
//! Every collector is a pure function of a [`MarketSnapshot`]. Averages over
//! empty groups are 0 rather than NaN.

use housing_types::{AgeBracket, MarketSnapshot, MarketStats};

/// Gini coefficient of a set of values.
///
/// Computed on the ascending sort as `Σ (2i − n + 1) x_i / (n · Σ x)` with
/// zero-based `i`. Returns 0 for an empty set or a non-positive total.
pub fn gini(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| (2.0 * i as f64 - n + 1.0) * x)
        .sum();
    weighted / (n * total)
}

/// Arithmetic mean, 0 for an empty iterator.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), x| (sum + x, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Mean savings for each age bracket, in [`AgeBracket::ALL`] order.
pub fn savings_by_bracket(snapshot: &MarketSnapshot) -> Vec<f64> {
    let mut sums = [0.0_f64; AgeBracket::COUNT];
    let mut counts = [0_usize; AgeBracket::COUNT];
    for household in &snapshot.households {
        let bracket = AgeBracket::from_age(household.age).index();
        if let (Some(sum), Some(count)) = (sums.get_mut(bracket), counts.get_mut(bracket)) {
            *sum += household.savings;
            *count += 1;
        }
    }
    sums.iter()
        .zip(counts)
        .map(|(sum, count)| if count == 0 { 0.0 } else { sum / count as f64 })
        .collect()
}

/// Every collector at once.
pub fn compute_stats(snapshot: &MarketSnapshot) -> MarketStats {
    let households = &snapshot.households;
    let savings: Vec<f64> = households.iter().map(|h| h.savings).collect();
    let owners = households.iter().filter(|h| h.house.is_some()).count();
    let available = snapshot.houses.iter().filter(|h| h.available).count();

    MarketStats {
        gini: gini(&savings),
        average_income: mean(households.iter().map(|h| h.income)),
        mean_age: mean(households.iter().map(|h| f64::from(h.age))),
        average_savings: mean(savings.iter().copied()),
        savings_by_bracket: savings_by_bracket(snapshot),
        average_price: mean(snapshot.houses.iter().map(|h| h.price)),
        available_houses: count_u32(available),
        owners: count_u32(owners),
        renters: count_u32(households.len().saturating_sub(owners)),
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
