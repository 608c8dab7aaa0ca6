use crate::error::CoreError;
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sampling granularity offered by the market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

const INTRADAY: &[Interval] = &[
    Interval::OneMinute,
    Interval::TwoMinutes,
    Interval::FiveMinutes,
    Interval::FifteenMinutes,
    Interval::ThirtyMinutes,
    Interval::OneHour,
];

const INTRADAY_AND_DAILY: &[Interval] = &[
    Interval::OneMinute,
    Interval::TwoMinutes,
    Interval::FiveMinutes,
    Interval::FifteenMinutes,
    Interval::ThirtyMinutes,
    Interval::OneHour,
    Interval::OneDay,
];

const UP_TO_MONTHLY: &[Interval] = &[
    Interval::OneDay,
    Interval::FiveDays,
    Interval::OneWeek,
    Interval::OneMonth,
];

const UP_TO_QUARTERLY: &[Interval] = &[
    Interval::OneDay,
    Interval::FiveDays,
    Interval::OneWeek,
    Interval::OneMonth,
    Interval::ThreeMonths,
];

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::TwoMinutes => "2m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::FiveDays => "5d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
            Interval::ThreeMonths => "3mo",
        }
    }

    pub fn is_intraday(&self) -> bool {
        INTRADAY.contains(self)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UP_TO_QUARTERLY
            .iter()
            .chain(INTRADAY)
            .find(|interval| interval.as_str() == s)
            .copied()
            .ok_or_else(|| CoreError::InvalidInput("interval".to_string(), s.to_string()))
    }
}

/// How far back a chart looks from its end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Days(u32),
    Months(u32),
}

/// The lookback windows a user can pick for a ticker chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Horizon {
    pub const ALL: [Horizon; 7] = [
        Horizon::OneDay,
        Horizon::FiveDays,
        Horizon::OneMonth,
        Horizon::SixMonths,
        Horizon::OneYear,
        Horizon::ThreeYears,
        Horizon::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::OneDay => "1d",
            Horizon::FiveDays => "5d",
            Horizon::OneMonth => "1mo",
            Horizon::SixMonths => "6mo",
            Horizon::OneYear => "1y",
            Horizon::ThreeYears => "3y",
            Horizon::FiveYears => "5y",
        }
    }

    /// Human-readable label, e.g. "6 Month".
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::OneDay => "1 Day",
            Horizon::FiveDays => "5 Day",
            Horizon::OneMonth => "1 Month",
            Horizon::SixMonths => "6 Month",
            Horizon::OneYear => "1 Year",
            Horizon::ThreeYears => "3 Year",
            Horizon::FiveYears => "5 Year",
        }
    }

    pub fn lookback(&self) -> Lookback {
        match self {
            Horizon::OneDay => Lookback::Days(1),
            Horizon::FiveDays => Lookback::Days(5),
            Horizon::OneMonth => Lookback::Months(1),
            Horizon::SixMonths => Lookback::Months(6),
            Horizon::OneYear => Lookback::Months(12),
            Horizon::ThreeYears => Lookback::Months(36),
            Horizon::FiveYears => Lookback::Months(60),
        }
    }

    /// Returns the `(start, end)` date window of this horizon ending at `end`.
    ///
    /// Month arithmetic clamps to the last day of a shorter month, so one year
    /// back from 2024-02-29 is 2023-02-28.
    pub fn window_ending(&self, end: NaiveDate) -> Result<(NaiveDate, NaiveDate), CoreError> {
        let start = match self.lookback() {
            Lookback::Days(days) => end.checked_sub_signed(Duration::days(i64::from(days))),
            Lookback::Months(months) => end.checked_sub_months(Months::new(months)),
        };

        start
            .map(|start| (start, end))
            .ok_or_else(|| CoreError::InvalidInput("horizon end date".to_string(), end.to_string()))
    }

    /// The sampling intervals offered for this horizon. The first entry is the
    /// default selection.
    pub fn intervals(&self) -> &'static [Interval] {
        match self {
            Horizon::OneDay => INTRADAY,
            Horizon::FiveDays => INTRADAY_AND_DAILY,
            Horizon::OneMonth => UP_TO_MONTHLY,
            Horizon::SixMonths | Horizon::OneYear | Horizon::ThreeYears | Horizon::FiveYears => {
                UP_TO_QUARTERLY
            }
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Horizon::ALL
            .iter()
            .find(|horizon| horizon.as_str() == s || horizon.label().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| CoreError::InvalidInput("horizon".to_string(), s.to_string()))
    }
}
