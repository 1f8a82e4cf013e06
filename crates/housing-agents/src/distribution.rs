//! Age and income distribution tables.
//!
//! Both tables arrive pre-computed (YAML/JSON rows, or the built-in set) and
//! are validated once when the market is constructed. After that they are
//! read-only lookup structures used for:
//!
//! - inverse-CDF sampling of a household's age at population init,
//! - inverse-CDF sampling of its starting income bin,
//! - the monthly bounded random walk over income bins.
//!
//! The income matrix has one row per income bin: the bin index, the bin's
//! representative monthly income, and one cumulative percentile threshold
//! per [`AgeBracket`].

use housing_types::AgeBracket;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::error::TableError;

// ---------------------------------------------------------------------------
// Raw input rows
// ---------------------------------------------------------------------------

/// One row of the age table: how many people have this age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeRow {
    /// Age in years.
    pub age: u32,
    /// Population count (any non-negative weight).
    pub count: f64,
}

/// One row of the income matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRow {
    /// Bin index; rows must be numbered 0, 1, 2, ...
    pub bin: usize,
    /// Representative monthly income of the bin.
    pub income: f64,
    /// Cumulative percentile threshold per age bracket.
    pub cumulative: [f64; AgeBracket::COUNT],
}

/// Unvalidated tables as read from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTables {
    /// Age distribution rows.
    pub ages: Vec<AgeRow>,
    /// Income matrix rows.
    pub incomes: Vec<IncomeRow>,
}

// ---------------------------------------------------------------------------
// Age table
// ---------------------------------------------------------------------------

/// Validated, normalized age distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeTable {
    /// Ages in ascending order.
    ages: Vec<u32>,
    /// Normalized cumulative weight per age; the last entry is 1.
    cumulative: Vec<f64>,
}

impl AgeTable {
    /// Validate and normalize age rows.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the table is empty, ages are not strictly
    /// ascending, a count is negative or not finite, or all counts are zero.
    pub fn from_rows(rows: &[AgeRow]) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::Empty { table: "age" });
        }

        let mut ages = Vec::with_capacity(rows.len());
        let mut running = Vec::with_capacity(rows.len());
        let mut total = 0.0_f64;
        let mut previous: Option<u32> = None;

        for row in rows {
            if let Some(prev) = previous
                && row.age <= prev
            {
                return Err(TableError::AgeOutOfOrder { age: row.age });
            }
            if !row.count.is_finite() || row.count < 0.0 {
                return Err(TableError::InvalidValue {
                    table: "age",
                    value: row.count,
                });
            }
            total += row.count;
            ages.push(row.age);
            running.push(total);
            previous = Some(row.age);
        }

        if total <= 0.0 {
            return Err(TableError::ZeroWeight);
        }

        let cumulative = running.into_iter().map(|c| c / total).collect();
        Ok(Self { ages, cumulative })
    }

    /// Draw an age by inverse-CDF sampling.
    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        let u: f64 = rng.random();
        let idx = self
            .cumulative
            .iter()
            .position(|&c| u < c)
            .unwrap_or_else(|| self.ages.len().saturating_sub(1));
        self.ages.get(idx).copied().unwrap_or_default()
    }

    /// Youngest age in the table.
    pub fn youngest(&self) -> Option<u32> {
        self.ages.first().copied()
    }

    /// Oldest age in the table.
    pub fn oldest(&self) -> Option<u32> {
        self.ages.last().copied()
    }
}

// ---------------------------------------------------------------------------
// Income table
// ---------------------------------------------------------------------------

/// One income bin as seen from a single age bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeBin {
    /// Cumulative share of the bracket earning at most this bin.
    pub threshold: f64,
    /// Representative monthly income.
    pub income: f64,
}

/// Result of an income draw or walk step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeDraw {
    /// Monthly income.
    pub income: f64,
    /// Bin index in the income table.
    pub bin: usize,
    /// Percentile position within the household's age bracket.
    pub percentile: f64,
}

/// Validated income-by-bracket-and-percentile matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeTable {
    /// One bin sequence per age bracket, in [`AgeBracket::ALL`] order.
    brackets: Vec<Vec<IncomeBin>>,
}

impl IncomeTable {
    /// Validate the income matrix.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the table is empty, bins are not numbered
    /// consecutively from 0, an income is negative, a threshold is outside
    /// `[0, 1]`, a column decreases, or a column never becomes positive.
    pub fn from_rows(rows: &[IncomeRow]) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::Empty { table: "income" });
        }

        let mut brackets: Vec<Vec<IncomeBin>> = (0..AgeBracket::COUNT)
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (expected, row) in rows.iter().enumerate() {
            if row.bin != expected {
                return Err(TableError::BinOutOfOrder {
                    expected,
                    found: row.bin,
                });
            }
            if !row.income.is_finite() || row.income < 0.0 {
                return Err(TableError::InvalidValue {
                    table: "income",
                    value: row.income,
                });
            }

            for (bracket, (&threshold, column)) in
                row.cumulative.iter().zip(brackets.iter_mut()).enumerate()
            {
                if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                    return Err(TableError::ThresholdOutOfRange {
                        bracket,
                        bin: expected,
                        value: threshold,
                    });
                }
                if let Some(previous) = column.last()
                    && threshold < previous.threshold
                {
                    return Err(TableError::NonMonotonic {
                        bracket,
                        bin: expected,
                    });
                }
                column.push(IncomeBin {
                    threshold,
                    income: row.income,
                });
            }
        }

        for (bracket, column) in brackets.iter().enumerate() {
            let top = column.last().map_or(0.0, |b| b.threshold);
            if top <= 0.0 {
                return Err(TableError::EmptyColumn { bracket });
            }
        }

        Ok(Self { brackets })
    }

    /// Number of income bins.
    pub fn bin_count(&self) -> usize {
        self.brackets.first().map_or(0, Vec::len)
    }

    /// Bin sequence of `(threshold, income)` for the bracket containing `age`.
    pub fn lookup(&self, age: u32) -> &[IncomeBin] {
        self.brackets
            .get(AgeBracket::from_age(age).index())
            .map_or(&[], Vec::as_slice)
    }

    /// Draw a starting income for a household of the given age.
    ///
    /// A uniform percentile is mapped to the first bin whose cumulative
    /// threshold exceeds it (the top bin if the column tops out below 1).
    pub fn sample_initial(&self, age: u32, rng: &mut impl Rng) -> IncomeDraw {
        let bins = self.lookup(age);
        let percentile: f64 = rng.random();
        let bin = bins
            .iter()
            .position(|b| percentile < b.threshold)
            .unwrap_or_else(|| bins.len().saturating_sub(1));
        let income = bins.get(bin).map_or(0.0, |b| b.income);
        IncomeDraw {
            income,
            bin,
            percentile,
        }
    }

    /// Take one step of the bounded income random walk.
    ///
    /// The step is a normally distributed integer (mean 0, sd 1) added to
    /// `bin` and clamped to the valid bin range. The returned percentile is
    /// the new bin's threshold within the age bracket.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn walk(&self, age: u32, bin: usize, rng: &mut impl Rng) -> IncomeDraw {
        let bins = self.lookup(age);
        let z: f64 = StandardNormal.sample(rng);
        let top = bins.len().saturating_sub(1) as f64;
        // Clamped to [0, top] before the cast, so the conversion is exact.
        let target = (bin as f64 + z.round()).clamp(0.0, top) as usize;
        let (income, percentile) = bins
            .get(target)
            .map_or((0.0, 0.0), |b| (b.income, b.threshold));
        IncomeDraw {
            income,
            bin: target,
            percentile,
        }
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Both distribution tables, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionTables {
    /// Age distribution for population init.
    pub ages: AgeTable,
    /// Income matrix for sampling and the income walk.
    pub incomes: IncomeTable,
}

impl DistributionTables {
    /// Validate raw tables.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found in either table.
    pub fn from_raw(raw: &RawTables) -> Result<Self, TableError> {
        Ok(Self {
            ages: AgeTable::from_rows(&raw.ages)?,
            incomes: IncomeTable::from_rows(&raw.incomes)?,
        })
    }

    /// The built-in tables used when no table file is configured.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the built-in rows are covered by tests.
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_raw(&builtin_raw())
    }
}

/// Representative monthly income per built-in bin.
const BUILTIN_INCOMES: [f64; 10] = [
    900.0, 1400.0, 1900.0, 2400.0, 2900.0, 3500.0, 4200.0, 5200.0, 6800.0, 9500.0,
];

/// Built-in cumulative thresholds, one array per age bracket.
const BUILTIN_COLUMNS: [[f64; 10]; AgeBracket::COUNT] = [
    [0.22, 0.42, 0.58, 0.71, 0.81, 0.88, 0.93, 0.97, 0.99, 1.0],
    [0.08, 0.18, 0.30, 0.44, 0.58, 0.70, 0.80, 0.89, 0.96, 1.0],
    [0.06, 0.13, 0.22, 0.33, 0.45, 0.57, 0.69, 0.81, 0.92, 1.0],
    [0.06, 0.12, 0.20, 0.30, 0.41, 0.53, 0.65, 0.78, 0.91, 1.0],
    [0.08, 0.16, 0.26, 0.37, 0.49, 0.61, 0.72, 0.83, 0.93, 1.0],
    [0.12, 0.27, 0.43, 0.57, 0.69, 0.79, 0.87, 0.93, 0.97, 1.0],
    [0.16, 0.35, 0.53, 0.67, 0.78, 0.86, 0.92, 0.96, 0.99, 1.0],
];

/// Raw rows of the built-in tables.
///
/// Ages 18 to 99 with a flat profile up to 64 and a linear decline after.
pub fn builtin_raw() -> RawTables {
    let ages = (18_u32..100)
        .map(|age| {
            let count = if age < 65 {
                220.0
            } else {
                (220.0 - f64::from(age - 64) * 6.0).max(5.0)
            };
            AgeRow { age, count }
        })
        .collect();

    let incomes = BUILTIN_INCOMES
        .iter()
        .enumerate()
        .map(|(bin, &income)| {
            let mut cumulative = [0.0; AgeBracket::COUNT];
            for (slot, column) in cumulative.iter_mut().zip(BUILTIN_COLUMNS.iter()) {
                *slot = column.get(bin).copied().unwrap_or(1.0);
            }
            IncomeRow {
                bin,
                income,
                cumulative,
            }
        })
        .collect();

    RawTables { ages, incomes }
}
