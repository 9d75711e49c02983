//! Expiry dates and the checks run against them.
//!
//! A record's label only shows month and day. [`expiry_check`] is the
//! label-level comparison: it borrows the year from "today". [`Expiry`]
//! additionally keeps the full date it was generated with, so the validator
//! can place it in the rolling shelf-life window instead of guessing a year.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Longest shelf life a correct record may carry, in months.
pub const MAX_SHELF_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExpiryError {
    #[error("invalid expiry label: month {month}, day {day}")]
    InvalidDate { month: u32, day: u32 },
}

/// Where an expiry falls relative to the shelf-life window of a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpiryStatus {
    /// Strictly after today and no more than [`MAX_SHELF_MONTHS`] ahead.
    Valid,
    /// On or before today.
    Expired,
    /// More than [`MAX_SHELF_MONTHS`] ahead of today.
    OutOfRange,
}

/// An expiry stamp. Displays as month/day; compares as a full date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Expiry {
    date: NaiveDate,
}

impl Expiry {
    pub fn on(date: NaiveDate) -> Self {
        Self { date }
    }

    /// `today` shifted forward by `months`. Saturates at the end of the
    /// calendar; month ends clamp (Jan 31 + 1 month = Feb 28/29).
    pub fn months_after(today: NaiveDate, months: u32) -> Self {
        let date = today
            .checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX);
        Self { date }
    }

    /// `today` shifted backward by `months`. Saturates at the start of the
    /// calendar.
    pub fn months_before(today: NaiveDate, months: u32) -> Self {
        let date = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// The printed label, `MM/DD`.
    pub fn label(&self) -> String {
        format!("{:02}/{:02}", self.month(), self.day())
    }

    /// Place this expiry in the shelf-life window that starts at `today`.
    pub fn status(&self, today: NaiveDate) -> ExpiryStatus {
        if self.date <= today {
            ExpiryStatus::Expired
        } else if self.date > shelf_limit(today) {
            ExpiryStatus::OutOfRange
        } else {
            ExpiryStatus::Valid
        }
    }
}

/// The last day a correct record generated on `today` may expire on.
pub fn shelf_limit(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(MAX_SHELF_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Label-level expiry check: build a date from `today`'s year and the given
/// month/day and report whether it is on or before `today`.
///
/// Feb 29 resolves to Feb 28 in non-leap years.
pub fn expiry_check(month: u32, day: u32, today: NaiveDate) -> Result<bool, ExpiryError> {
    let stamped = resolve_in_year(today.year(), month, day)?;
    Ok(stamped <= today)
}

fn resolve_in_year(year: i32, month: u32, day: u32) -> Result<NaiveDate, ExpiryError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| {
            if month == 2 && day == 29 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
        .ok_or(ExpiryError::InvalidDate { month, day })
}
