use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A reporting window: everything, one calendar year, or one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    All,
    Year(i32),
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn current_month(today: NaiveDate) -> Self {
        Period::Month {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn current_year(today: NaiveDate) -> Self {
        Period::Year(today.year())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::All => true,
            Period::Year(year) => date.year() == year,
            Period::Month { year, month } => date.year() == year && date.month() == month,
        }
    }

    /// Parse `all`, `YYYY` or `YYYY-MM`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        let invalid = || ValidationError::InvalidPeriod(input.to_string());

        if s.eq_ignore_ascii_case("all") {
            return Ok(Period::All);
        }

        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

        match s.split_once('-') {
            None => {
                if s.len() != 4 || !digits(s) {
                    return Err(invalid());
                }
                s.parse().map(Period::Year).map_err(|_| invalid())
            }
            Some((year, month)) => {
                if year.len() != 4 || month.len() > 2 || !digits(year) || !digits(month) {
                    return Err(invalid());
                }
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(Period::Month { year, month })
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::All => write!(f, "all"),
            Period::Year(year) => write!(f, "{:04}", year),
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}
