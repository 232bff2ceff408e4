//! Time-of-day values as entered in schedule and timetable forms.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when text is not a valid `HH:MM` or `HH:MM:SS` time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day: {input}")]
pub struct ParseTimeOfDayError {
    input: String,
}

/// Wall-clock time without a date, accepted as `HH:MM` or `HH:MM:SS`.
///
/// Serialises as `HH:MM:SS`; displays as `HH:MM` unless seconds are set.
///
/// # Examples
/// ```
/// use fleet_console::domain::TimeOfDay;
///
/// let departure: TimeOfDay = "08:30".parse().expect("valid time");
/// assert_eq!(departure.to_string(), "08:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Wrap an existing [`NaiveTime`].
    pub const fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Access the underlying [`NaiveTime`].
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map(Self)
            .map_err(|_| ParseTimeOfDayError {
                input: value.to_owned(),
            })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.second() == 0 {
            write!(f, "{}", self.0.format("%H:%M"))
        } else {
            write!(f, "{}", self.0.format("%H:%M:%S"))
        }
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.format("%H:%M:%S"))
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
