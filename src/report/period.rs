//! Named look-back periods for reports and exports.

use std::str::FromStr;

use time::{Date, Duration};

use crate::Error;

/// An inclusive date range used to window expense queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRange {
    pub start: Date,
    pub end: Date,
}

/// A fixed-day-count look-back window selector.
///
/// The day counts are literal (90, 180, 365), not calendar month arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    ThirtyDays,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "30days" => Ok(Period::ThirtyDays),
            "3months" => Ok(Period::ThreeMonths),
            "6months" => Ok(Period::SixMonths),
            "1year" => Ok(Period::OneYear),
            _ => Err(Error::InvalidPeriod(token.to_owned())),
        }
    }
}

impl Period {
    /// The number of days the period looks back.
    pub fn days(&self) -> i64 {
        match self {
            Period::ThirtyDays => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
        }
    }

    /// The date window ending at `now` covered by the period.
    pub fn window(&self, now: Date) -> WindowRange {
        WindowRange {
            start: now - Duration::days(self.days()),
            end: now,
        }
    }

    /// The human-readable label used in export titles.
    pub fn label(&self) -> &'static str {
        match self {
            Period::ThirtyDays => "Last 30 Days",
            Period::ThreeMonths => "Last 3 Months",
            Period::SixMonths => "Last 6 Months",
            Period::OneYear => "Last 1 Year",
        }
    }

    /// The URL token for the period, used in download filenames.
    pub fn as_token(&self) -> &'static str {
        match self {
            Period::ThirtyDays => "30days",
            Period::ThreeMonths => "3months",
            Period::SixMonths => "6months",
            Period::OneYear => "1year",
        }
    }
}
