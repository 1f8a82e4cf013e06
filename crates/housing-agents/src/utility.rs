//! Prospect-theory utility of a candidate house.

use std::cmp::Ordering;

use housing_types::{Position, RiskProfile};

/// Prospect value of a forecast gain `x` relative to the reference point,
/// before the distance penalty.
///
/// Gains are valued as `x^alpha`, losses as `-lambda * |x|^beta`, and an
/// exact tie (or a NaN) as 0.
pub fn prospect_value(x: f64, risk: &RiskProfile) -> f64 {
    match x.partial_cmp(&0.0) {
        Some(Ordering::Greater) => x.powf(risk.alpha),
        Some(Ordering::Less) => -risk.lambda * x.abs().powf(risk.beta),
        _ => 0.0,
    }
}

/// Utility of moving from `from` to a house at `to` whose forecast is
/// `candidate_forecast`.
///
/// `reference_forecast` is the forecast of the last house the household
/// sold (0 if it never sold one). A candidate whose forecast equals the
/// reference has utility 0 regardless of distance.
pub fn utility(
    candidate_forecast: f64,
    reference_forecast: f64,
    from: Position,
    to: Position,
    risk: &RiskProfile,
) -> f64 {
    let x = candidate_forecast - reference_forecast;
    match x.partial_cmp(&0.0) {
        Some(Ordering::Greater | Ordering::Less) => {
            prospect_value(x, risk) - from.distance_to(to)
        }
        _ => 0.0,
    }
}
