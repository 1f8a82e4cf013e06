//! Shared type definitions for the housing market simulation.
//!
//! This crate is the single source of truth for identifiers, enumerations
//! and snapshot records used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe `u64` wrappers for house, household and sale ids
//! - [`enums`] -- Strategy, house quality, grants, death causes, age brackets
//! - [`structs`] -- Positions, risk profiles, snapshots and statistics

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AgeBracket, DeathCause, Grant, HouseQuality, Strategy};
pub use ids::{HouseId, HouseholdId, SaleId};
pub use structs::{
    HouseSnapshot, HouseholdSnapshot, MarketSnapshot, MarketStats, Position, RiskProfile,
};
