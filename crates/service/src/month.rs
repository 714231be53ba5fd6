//! Calendar-month addressing for listings, summaries, and rollover.
//!
//! Months are 1-based (`1..=12`); date windows are half-open
//! `[first-of-month, first-of-next-month)` so late-night transactions on the
//! last day are never dropped.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::Validation(format!("month must be 1..=12, got {month}")));
        }
        if !(1970..=9999).contains(&year) {
            return Err(ServiceError::Validation(format!("year out of range: {year}")));
        }
        Ok(Self { year, month })
    }

    pub fn current() -> Self {
        let now = Utc::now();
        Self { year: now.year(), month: now.month() }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Midnight UTC on the given day of this month.
    pub fn day(self, day: u32) -> Result<DateTime<Utc>, ServiceError> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            ServiceError::Validation(format!(
                "invalid date {}-{:02}-{:02}",
                self.year, self.month, day
            ))
        })?;
        Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    }

    pub fn start(self) -> Result<DateTime<Utc>, ServiceError> {
        self.day(1)
    }

    pub fn end_exclusive(self) -> Result<DateTime<Utc>, ServiceError> {
        self.next().day(1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
