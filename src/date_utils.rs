use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// A calendar month, written as `YYYY-MM` on the wire and in storage.
///
/// Ordering is chronological (year first, then month), so sorting a list of
/// keys never depends on the order the keys were discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors only admit valid (year, month) pairs.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Short display label such as `Jul 2025`. The year is part of the label,
    /// so the same month in different years never shares a label.
    pub fn label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }

    /// Long display label such as `July 2025`.
    pub fn long_label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonth(pub String);

impl fmt::Display for InvalidMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month '{}', expected YYYY-MM", self.0)
    }
}

impl std::error::Error for InvalidMonth {}

impl FromStr for MonthKey {
    type Err = InvalidMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonth(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = InvalidMonth;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl ToSql for MonthKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for MonthKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// The `count` most recent months ending at `latest`, newest first.
pub fn recent_months(latest: MonthKey, count: usize) -> Vec<MonthKey> {
    std::iter::successors(Some(latest), |m| Some(m.prev()))
        .take(count)
        .collect()
}

/// An optional, inclusive date window selected by the user.
///
/// Without a `from` bound every date matches. Without a `to` bound the
/// window is the single day `from`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self {
            from: Some(date),
            to: None,
        }
    }

    pub fn is_all(&self) -> bool {
        self.from.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.from {
            None => true,
            Some(from) => date >= from && date <= self.to.unwrap_or(from),
        }
    }

    pub fn label(&self) -> String {
        match (self.from, self.to) {
            (None, _) => "All Transactions".to_string(),
            (Some(from), None) => from.format("%b %d, %Y").to_string(),
            (Some(from), Some(to)) => format!(
                "{} - {}",
                from.format("%b %d, %Y"),
                to.format("%b %d, %Y")
            ),
        }
    }
}

/// Parse a date submitted by a client: either a plain `YYYY-MM-DD` date or a
/// full RFC 3339 timestamp. For a timestamp the calendar date in the
/// timestamp's own offset is used, so a `Z` timestamp yields its UTC date.
pub fn parse_input_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
