//! Inclusive calendar-date spans for events.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{ExpoError, ExpoResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of whole calendar days.
/// No time zone is involved: a day is a day wherever the calendar is viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ExpoResult<Self> {
        if end < start {
            return Err(ExpoError::InvalidSpan {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateSpan { start, end })
    }

    /// Parse a pair of YYYY-MM-DD strings.
    pub fn parse(start: &str, end: &str) -> ExpoResult<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Whether any day of `other` is also a day of this span.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

/// Parse YYYY-MM-DD, ignoring surrounding whitespace.
pub fn parse_date(s: &str) -> ExpoResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ExpoError::InvalidDate(s.to_string()))
}
