//! Market clock, scheduling, population management, and the tick cycle for
//! the housing market simulation.
//!
//! This crate owns the monthly tick cycle: house pass, household pass,
//! settlement, replenishment, and statistics collection.
//!
//! # Modules
//!
//! - [`clock`] -- Period counter and year boundaries.
//! - [`config`] -- Configuration loading from `housing-config.yaml` into
//!   strongly-typed structs.
//! - [`market`] -- The [`Market`] aggregate and its setup.
//! - [`population`] -- Initial population and replacement of the dead.
//! - [`runner`] -- Bounded simulation loop and [`TickCallback`].
//! - [`scheduler`] -- Random-order activation of houses and households.
//! - [`stats`] -- Gini, averages and per-bracket savings.
//! - [`tick`] -- The tick cycle engine loop.
//!
//! [`Market`]: market::Market
//! [`TickCallback`]: runner::TickCallback

pub mod clock;
pub mod config;
pub mod market;
pub mod population;
pub mod runner;
pub mod scheduler;
pub mod stats;
pub mod tick;
