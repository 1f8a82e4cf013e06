//! House and household agents for the housing market simulation.
//!
//! This crate is the logic layer: everything that operates on agent state
//! without touching I/O or the clock. It sits between `housing-types`
//! (identifiers and snapshots) and `housing-core` (scheduling, population
//! management, statistics).
//!
//! # Modules
//!
//! - [`config`] -- Read-only behavioral parameters ([`AgentConfig`])
//! - [`decision`] -- The monthly household protocol: list, buy, die, grants
//! - [`distribution`] -- Age and income tables, inverse-CDF sampling, income walk
//! - [`error`] -- [`AgentError`] and [`TableError`]
//! - [`grid`] -- Toroidal grid and Moore neighborhoods
//! - [`house`] -- House price process and forecasts
//! - [`household`] -- Household state, ageing, income, equity
//! - [`mortality`] -- Maximum age and Gompertz mortality
//! - [`policy`] -- One-time savings grants
//! - [`registry`] -- Arena of both agent kinds and ownership transfers
//! - [`utility`] -- Prospect-theory utility

pub mod config;
pub mod decision;
pub mod distribution;
pub mod error;
pub mod grid;
pub mod house;
pub mod household;
pub mod mortality;
pub mod policy;
pub mod registry;
pub mod utility;

// Re-export primary types at crate root for convenience.
pub use config::{AgentConfig, PolicyConfig, PricingConfig, RiskConfig};
pub use decision::{HouseholdOutcome, buy_house, evaluate_listing, step_household};
pub use distribution::{
    AgeRow, AgeTable, DistributionTables, IncomeBin, IncomeDraw, IncomeRow, IncomeTable, RawTables,
};
pub use error::{AgentError, TableError};
pub use grid::Grid;
pub use house::House;
pub use household::Household;
pub use mortality::{check_death, gompertz_probability};
pub use registry::{Registry, Transfer};
