//! Inclusive calendar date ranges for pipeline runs

use crate::error::{CurrenseeError, Result};
use chrono::{Duration, NaiveDate};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, failing if start is after end
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CurrenseeError::InvalidRange(format!(
                "start date {} cannot be after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range (always >= 1)
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// A constructed range always contains at least one day
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All dates in the range, ascending, inclusive of both ends
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::with_capacity(self.len());
        let mut current = self.start;

        while current <= self.end {
            days.push(current);
            current += Duration::days(1);
        }

        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_generation() {
        let range = DateRange::new(date(2025, 4, 15), date(2025, 4, 19)).unwrap();
        let days = range.days();

        assert_eq!(days.len(), 5);
        assert_eq!(range.len(), 5);
        assert_eq!(days[0], date(2025, 4, 15));
        assert_eq!(days[4], date(2025, 4, 19));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::single(date(2025, 4, 15));
        assert_eq!(range.days(), vec![date(2025, 4, 15)]);
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_range_spans_month_boundary() {
        let range = DateRange::new(date(2025, 1, 30), date(2025, 2, 2)).unwrap();
        assert_eq!(
            range.days(),
            vec![
                date(2025, 1, 30),
                date(2025, 1, 31),
                date(2025, 2, 1),
                date(2025, 2, 2),
            ]
        );
    }

    #[test]
    fn test_start_after_end_fails() {
        let result = DateRange::new(date(2025, 4, 19), date(2025, 4, 15));
        assert!(matches!(result, Err(CurrenseeError::InvalidRange(_))));
    }

    proptest! {
        #[test]
        fn prop_days_are_ascending_and_inclusive(
            start_offset in 0i64..20_000,
            span in 0i64..400,
        ) {
            let epoch = date(1990, 1, 1);
            let start = epoch + Duration::days(start_offset);
            let end = start + Duration::days(span);

            let range = DateRange::new(start, end).unwrap();
            let days = range.days();

            prop_assert_eq!(days.len() as i64, span + 1);
            prop_assert_eq!(days[0], start);
            prop_assert_eq!(*days.last().unwrap(), end);
            prop_assert!(days.windows(2).all(|w| w[1] == w[0] + Duration::days(1)));
        }
    }
}
