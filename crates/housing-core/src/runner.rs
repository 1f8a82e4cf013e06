//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`run_tick`] until the tick budget is spent or
//! the market runs out of households, handing every summary to a
//! [`TickCallback`].
//!
//! [`run_tick`]: crate::tick::run_tick

use serde::Serialize;
use tracing::{info, warn};

use crate::market::Market;
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationEndReason {
    /// The configured number of ticks completed.
    MaxTicksReached,
    /// No households were left after a tick.
    NoHouseholds,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, market: &Market);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _market: &Market) {}
}

/// Run the market for at most `max_ticks` ticks.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub fn run_simulation(
    market: &mut Market,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        name = %market.name,
        max_ticks,
        households = market.registry.household_count(),
        houses = market.registry.house_count(),
        "Simulation starting"
    );

    while total_ticks < max_ticks {
        let summary = tick::run_tick(market)?;
        total_ticks = total_ticks.saturating_add(1);

        callback.on_tick(&summary, market);

        if summary.households == 0 {
            info!(period = summary.period, "No households left");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::NoHouseholds,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);
    }

    info!(max_ticks, "Tick limit reached");
    Ok(SimulationResult {
        end_reason: SimulationEndReason::MaxTicksReached,
        final_summary: last_summary,
        total_ticks,
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_period = result.final_summary.as_ref().map(|s| s.period),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            period = summary.period,
            households = summary.households,
            owners = summary.stats.owners,
            renters = summary.stats.renters,
            gini = summary.stats.gini,
            average_price = summary.stats.average_price,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
