use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    #[error("{0:?} is not a published forecast hour")]
    UnknownHour(String),
    #[error("{0:?} is not a supported pressure level")]
    UnknownLevel(String),
}

/// Offset in hours from model initialisation. Only the published steps are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ForecastHour(u16);

impl ForecastHour {
    pub const ALL: [ForecastHour; 11] = [
        ForecastHour(0),
        ForecastHour(6),
        ForecastHour(12),
        ForecastHour(18),
        ForecastHour(24),
        ForecastHour(48),
        ForecastHour(72),
        ForecastHour(96),
        ForecastHour(120),
        ForecastHour(144),
        ForecastHour(168),
    ];

    pub fn new(hours: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|hour| hour.0 == hours)
    }

    pub fn hours(self) -> u16 {
        self.0
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn previous(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl Default for ForecastHour {
    fn default() -> Self {
        ForecastHour(0)
    }
}

impl fmt::Display for ForecastHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for ForecastHour {
    type Error = FilterParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| FilterParseError::UnknownHour(value.to_string()))
    }
}

impl From<ForecastHour> for u16 {
    fn from(hour: ForecastHour) -> Self {
        hour.0
    }
}

impl FromStr for ForecastHour {
    type Err = FilterParseError;

    /// Accepts `72` or `72h`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('h').unwrap_or(trimmed);
        digits
            .parse::<u16>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| FilterParseError::UnknownHour(s.to_string()))
    }
}

/// Atmospheric pressure surface, highest pressure (lowest altitude) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PressureLevel {
    #[default]
    Hpa1000,
    Hpa925,
    Hpa850,
    Hpa700,
    Hpa500,
    Hpa300,
    Hpa250,
    Hpa200,
    Hpa100,
}

impl PressureLevel {
    pub const ALL: [PressureLevel; 9] = [
        PressureLevel::Hpa1000,
        PressureLevel::Hpa925,
        PressureLevel::Hpa850,
        PressureLevel::Hpa700,
        PressureLevel::Hpa500,
        PressureLevel::Hpa300,
        PressureLevel::Hpa250,
        PressureLevel::Hpa200,
        PressureLevel::Hpa100,
    ];

    pub fn hectopascals(self) -> u16 {
        match self {
            PressureLevel::Hpa1000 => 1000,
            PressureLevel::Hpa925 => 925,
            PressureLevel::Hpa850 => 850,
            PressureLevel::Hpa700 => 700,
            PressureLevel::Hpa500 => 500,
            PressureLevel::Hpa300 => 300,
            PressureLevel::Hpa250 => 250,
            PressureLevel::Hpa200 => 200,
            PressureLevel::Hpa100 => 100,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn previous(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hPa", self.hectopascals())
    }
}

impl FromStr for PressureLevel {
    type Err = FilterParseError;

    /// Accepts `850hPa`, `850 hPa` or `850`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let digits = lowered.strip_suffix("hpa").unwrap_or(&lowered).trim_end();
        digits
            .parse::<u16>()
            .ok()
            .and_then(|hpa| Self::ALL.iter().copied().find(|level| level.hectopascals() == hpa))
            .ok_or_else(|| FilterParseError::UnknownLevel(s.to_string()))
    }
}

impl TryFrom<String> for PressureLevel {
    type Error = FilterParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PressureLevel> for String {
    fn from(level: PressureLevel) -> Self {
        level.to_string()
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, step: usize) -> T {
    let position = options.iter().position(|option| *option == current).unwrap_or(0);
    options[(position + step) % options.len()]
}

/// Date, hour and level chosen by the user. Independent of the tree selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    pub date: NaiveDate,
    pub hour: ForecastHour,
    pub level: PressureLevel,
}

impl FilterState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            hour: ForecastHour::default(),
            level: PressureLevel::default(),
        }
    }

    /// Moves the date by whole days. Dates outside chrono's range are left unchanged.
    pub fn stepped_date(&self, days: i64) -> NaiveDate {
        let magnitude = Days::new(days.unsigned_abs());
        let stepped = if days >= 0 {
            self.date.checked_add_days(magnitude)
        } else {
            self.date.checked_sub_days(magnitude)
        };
        stepped.unwrap_or(self.date)
    }
}
