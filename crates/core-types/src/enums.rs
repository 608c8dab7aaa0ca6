use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The local trend of an observation relative to its immediate predecessor.
///
/// Serialized as `-1`, `0` or `1` so a direction mask can be handed straight to
/// a charting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Down,
    #[default]
    Flat,
    Up,
}

impl Direction {
    /// Classifies the step from `previous` to `current` using strict comparisons.
    /// Equal values (and any comparison involving NaN) are `Flat`.
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Direction::Up
        } else if current < previous {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Down => -1,
            Direction::Flat => 0,
            Direction::Up => 1,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.as_i8()
    }
}

impl TryFrom<i8> for Direction {
    type Error = CoreError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Down),
            0 => Ok(Direction::Flat),
            1 => Ok(Direction::Up),
            other => Err(CoreError::InvalidInput(
                "direction".to_string(),
                format!("{other} is not one of -1, 0, 1"),
            )),
        }
    }
}

/// The named price/volume fields of an OHLCV table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl PriceField {
    /// The price columns that a cleaned OHLC table must carry.
    pub const OHLC: [PriceField; 4] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
    ];

    /// The column label used by the market-data provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::AdjClose => "Adj Close",
            PriceField::Volume => "Volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            "adjclose" => Ok(PriceField::AdjClose),
            "volume" => Ok(PriceField::Volume),
            _ => Err(CoreError::InvalidInput(
                "price field".to_string(),
                s.to_string(),
            )),
        }
    }
}

/// How gaps in a price series are imputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapFill {
    /// Carry the last known value forward, then cover a leading gap backwards.
    #[default]
    ForwardBackward,
    /// Interpolate linearly by position; leading gaps are left missing.
    Linear,
}

/// What to do with values that fall outside the IQR fences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierTreatment {
    /// Replace flagged values with a missing value.
    #[default]
    Mask,
    /// Winsorize flagged values to the nearer fence.
    Clip,
}
