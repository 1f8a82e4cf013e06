//! Market clock.
//!
//! The clock is the only mutable counter shared by the whole market. It
//! holds the period (months elapsed, starting at 0). A tick runs at the
//! current period and advances the clock when it completes, so the first
//! tick is period 0 and sophisticated forecasts divide by `period + 1`.

use housing_agents::house::MONTHS_PER_YEAR;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Period counter would overflow.
    #[error("period counter overflow: cannot advance beyond u64::MAX")]
    PeriodOverflow,
}

/// Monthly market clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketClock {
    /// Months elapsed.
    period: u64,
}

impl MarketClock {
    /// A clock at period 0.
    pub const fn new() -> Self {
        Self { period: 0 }
    }

    /// A clock at an arbitrary period (useful for tests).
    pub const fn at(period: u64) -> Self {
        Self { period }
    }

    /// Current period.
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// Month within the year (0-11).
    pub const fn month_of_year(&self) -> u64 {
        self.period % MONTHS_PER_YEAR
    }

    /// Whether the current period opens a new year.
    pub const fn is_year_boundary(&self) -> bool {
        self.month_of_year() == 0
    }

    /// Move to the next period and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PeriodOverflow`] at `u64::MAX`.
    pub const fn advance(&mut self) -> Result<u64, ClockError> {
        match self.period.checked_add(1) {
            Some(next) => {
                self.period = next;
                Ok(next)
            }
            None => Err(ClockError::PeriodOverflow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_on_a_year_boundary() {
        let clock = MarketClock::new();
        assert_eq!(clock.period(), 0);
        assert!(clock.is_year_boundary());
    }

    #[test]
    fn year_boundaries_every_twelve_months() {
        let mut clock = MarketClock::new();
        let mut boundaries = 0;
        for _ in 0..36 {
            if clock.is_year_boundary() {
                boundaries += 1;
            }
            assert!(clock.advance().is_ok());
        }
        assert_eq!(boundaries, 3);
        assert_eq!(clock.period(), 36);
        assert_eq!(clock.month_of_year(), 0);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = MarketClock::at(u64::MAX);
        assert!(matches!(clock.advance(), Err(ClockError::PeriodOverflow)));
        assert_eq!(clock.period(), u64::MAX);
    }
}
