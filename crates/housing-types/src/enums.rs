//! Enumeration types for the housing market simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Which price forecast a household trusts when comparing houses.
///
/// Drawn once when the household is created and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Expects the last observed price change to repeat.
    Naive,
    /// Expects the average price change over all elapsed periods.
    Sophisticated,
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Naive => write!(f, "naive"),
            Self::Sophisticated => write!(f, "sophisticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// House quality
// ---------------------------------------------------------------------------

/// Long-run drift class of a house.
///
/// Good houses never draw a negative annual drift, so their price is biased
/// upward over the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseQuality {
    /// Drift drawn from the full configured shock range.
    Ordinary,
    /// Drift forced non-negative.
    Good,
}

// ---------------------------------------------------------------------------
// Policy grants
// ---------------------------------------------------------------------------

/// One-time savings grants a household can receive under policy toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Lump sum at age 20, only after the configured start period.
    StarterSavings,
    /// Lump sum at age 75.
    RetirementSavings,
    /// Means-tested lump sum for low-income 25-year-olds in period 1.
    LowIncome,
}

// ---------------------------------------------------------------------------
// Death
// ---------------------------------------------------------------------------

/// Why a household left the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Reached the configured maximum age.
    MaximumAge,
    /// The yearly Gompertz mortality draw fired.
    Mortality,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MaximumAge => write!(f, "maximum_age"),
            Self::Mortality => write!(f, "mortality"),
        }
    }
}

// ---------------------------------------------------------------------------
// Age brackets
// ---------------------------------------------------------------------------

/// Age bracket used by the income table and the savings statistics.
///
/// Boundaries: under 25, under 35, under 45, under 55, under 65, under 75,
/// and 75 or older.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    /// Younger than 25.
    Under25,
    /// 25 to 34.
    From25To34,
    /// 35 to 44.
    From35To44,
    /// 45 to 54.
    From45To54,
    /// 55 to 64.
    From55To64,
    /// 65 to 74.
    From65To74,
    /// 75 and older.
    From75,
}

impl AgeBracket {
    /// Number of brackets.
    pub const COUNT: usize = 7;

    /// All brackets in ascending age order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Under25,
        Self::From25To34,
        Self::From35To44,
        Self::From45To54,
        Self::From55To64,
        Self::From65To74,
        Self::From75,
    ];

    /// Classify an age in years.
    pub const fn from_age(age: u32) -> Self {
        match age {
            0..25 => Self::Under25,
            25..35 => Self::From25To34,
            35..45 => Self::From35To44,
            45..55 => Self::From45To54,
            55..65 => Self::From55To64,
            65..75 => Self::From65To74,
            _ => Self::From75,
        }
    }

    /// Zero-based position of the bracket (column index in the income table).
    pub const fn index(self) -> usize {
        match self {
            Self::Under25 => 0,
            Self::From25To34 => 1,
            Self::From35To44 => 2,
            Self::From45To54 => 3,
            Self::From55To64 => 4,
            Self::From65To74 => 5,
            Self::From75 => 6,
        }
    }
}
