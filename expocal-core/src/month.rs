//! Month navigation and the Sunday-first display grid.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::date_range::DateSpan;
use crate::error::{ExpoError, ExpoResult};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> ExpoResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ExpoError::InvalidMonth(format!("{year}-{month:02}")))?;
        Ok(Month { first })
    }

    /// The month a given day belongs to.
    pub fn containing(day: NaiveDate) -> Self {
        Month {
            first: day - Days::new(u64::from(day.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn number(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first - Days::new(1)
    }

    pub fn next(&self) -> Self {
        Month {
            first: self.first + Months::new(1),
        }
    }

    pub fn prev(&self) -> Self {
        Month {
            first: self.first - Months::new(1),
        }
    }

    pub fn span(&self) -> DateSpan {
        DateSpan {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        Month::containing(day) == *self
    }

    /// Long name, e.g. "April 2024".
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.number())
    }
}

impl FromStr for Month {
    type Err = ExpoError;

    /// Parse YYYY-MM.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ExpoError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).map_err(|_| invalid())
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub is_today: bool,
}

/// Every day from the Sunday on/before the 1st through the Saturday
/// on/after the last day of the month.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: Month,
    pub cells: Vec<DayCell>,
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

impl MonthGrid {
    pub fn new(month: Month, today: NaiveDate) -> Self {
        let cells = Self::window(month)
            .days()
            .map(|date| DayCell {
                date,
                in_month: month.contains(date),
                is_today: date == today,
            })
            .collect();

        MonthGrid { month, cells }
    }

    /// The full range of days the grid displays.
    pub fn window(month: Month) -> DateSpan {
        let first = month.first_day();
        let last = month.last_day();
        let lead = u64::from(first.weekday().num_days_from_sunday());
        let trail = 6 - u64::from(last.weekday().num_days_from_sunday());

        DateSpan {
            start: first - Days::new(lead),
            end: last + Days::new(trail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn april_2024_grid_spans_sunday_to_saturday() {
        let month = Month::new(2024, 4).unwrap();
        let grid = MonthGrid::new(month, date(2024, 4, 15));

        let first = grid.cells.first().unwrap();
        let last = grid.cells.last().unwrap();
        assert_eq!(first.date, date(2024, 3, 31));
        assert_eq!(first.date.weekday(), Weekday::Sun);
        assert!(!first.in_month);
        assert_eq!(last.date, date(2024, 5, 4));
        assert_eq!(last.date.weekday(), Weekday::Sat);
        assert!(!last.in_month);

        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.cells.iter().filter(|c| c.in_month).count(), 30);
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_days() {
        // September 2024 starts on a Sunday and ends on a Monday
        let grid = MonthGrid::new(Month::new(2024, 9).unwrap(), date(2024, 1, 1));
        assert_eq!(grid.cells.first().unwrap().date, date(2024, 9, 1));
        assert!(grid.cells.first().unwrap().in_month);
        assert_eq!(grid.cells.last().unwrap().date, date(2024, 10, 5));
    }

    #[test]
    fn february_2026_fits_four_weeks() {
        // Sunday the 1st through Saturday the 28th
        let grid = MonthGrid::new(Month::new(2026, 2).unwrap(), date(2026, 2, 1));
        assert_eq!(grid.cells.len(), 28);
        assert!(grid.cells.iter().all(|c| c.in_month));
    }

    #[test]
    fn today_is_marked_once() {
        let grid = MonthGrid::new(Month::new(2024, 4).unwrap(), date(2024, 4, 1));
        let today: Vec<_> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(2024, 4, 1));
    }

    #[test]
    fn navigation_wraps_years() {
        let december = Month::new(2024, 12).unwrap();
        assert_eq!(december.next(), Month::new(2025, 1).unwrap());
        assert_eq!(Month::new(2025, 1).unwrap().prev(), december);
        assert_eq!(december.last_day(), date(2024, 12, 31));
        assert_eq!(Month::new(2024, 2).unwrap().last_day(), date(2024, 2, 29));
    }

    #[test]
    fn containing_and_labels() {
        let month = Month::containing(date(2024, 4, 17));
        assert_eq!(month, Month::new(2024, 4).unwrap());
        assert_eq!(month.label(), "April 2024");
        assert_eq!(month.to_string(), "2024-04");
    }

    #[test]
    fn parse_month() {
        assert_eq!("2024-04".parse::<Month>().unwrap(), Month::new(2024, 4).unwrap());
        assert!("2024-13".parse::<Month>().is_err());
        assert!("april".parse::<Month>().is_err());
    }
}
