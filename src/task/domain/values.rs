//! Validated scalar types for task records.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Maximum title length in characters.
    pub const MAX_LEN: usize = 255;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the trimmed value is empty
    /// or [`TaskDomainError::TitleTooLong`] when it exceeds
    /// [`Title::MAX_LEN`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LEN {
            return Err(TaskDomainError::TitleTooLong {
                max: Self::MAX_LEN,
                actual: length,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current importance of a task, always within `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Impact(f64);

impl Impact {
    /// Lowest representable impact.
    pub const MIN: Self = Self(0.0);
    /// Highest representable impact.
    pub const MAX: Self = Self(10.0);
    /// Impact given to tasks created without one.
    pub const DEFAULT: Self = Self(5.0);

    /// Creates a validated impact.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ImpactOutOfRange`] when the value is not a
    /// finite number in `[0, 10]`.
    pub fn new(value: f64) -> Result<Self, TaskDomainError> {
        if !value.is_finite() || !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return Err(TaskDomainError::ImpactOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Saturates an arbitrary value into the impact range. `NaN` maps to
    /// [`Impact::MIN`].
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Returns the impact as a float.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Impact {
    type Error = TaskDomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Impact> for f64 {
    fn from(value: Impact) -> Self {
        value.0
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hours of work needed to complete one unit of a task.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Effort(f64);

impl Effort {
    /// Largest accepted effort in hours.
    pub const MAX_HOURS: f64 = 1000.0;
    /// Effort given to tasks created without one.
    pub const DEFAULT: Self = Self(1.0);

    /// Creates a validated effort.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidEffort`] when the value is not
    /// finite, not positive, or exceeds [`Effort::MAX_HOURS`].
    pub fn new(hours: f64) -> Result<Self, TaskDomainError> {
        if !hours.is_finite() || hours <= 0.0 || hours > Self::MAX_HOURS {
            return Err(TaskDomainError::InvalidEffort(hours));
        }
        Ok(Self(hours))
    }

    /// Returns the effort in hours.
    #[must_use]
    pub const fn hours(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Effort {
    type Error = TaskDomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Effort> for f64 {
    fn from(value: Effort) -> Self {
        value.0
    }
}

/// Impact change per hour, used for both growth and decay.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct HourlyRate(f64);

impl HourlyRate {
    /// A rate that never changes impact.
    pub const ZERO: Self = Self(0.0);
    /// Rate given to tasks created without one.
    pub const DEFAULT: Self = Self(0.1);

    /// Creates a validated hourly rate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidHourlyRate`] when the value is
    /// negative or not finite.
    pub fn new(per_hour: f64) -> Result<Self, TaskDomainError> {
        if !per_hour.is_finite() || per_hour < 0.0 {
            return Err(TaskDomainError::InvalidHourlyRate(per_hour));
        }
        Ok(Self(per_hour))
    }

    /// Returns the rate per hour.
    #[must_use]
    pub const fn per_hour(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for HourlyRate {
    type Error = TaskDomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HourlyRate> for f64 {
    fn from(value: HourlyRate) -> Self {
        value.0
    }
}

/// Positive number of minutes spent on a task, at most `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    /// Largest accepted duration.
    pub const MAX_MINUTES: u32 = i32::MAX.unsigned_abs();

    /// Creates a validated duration from raw caller input.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDuration`] when the value is zero,
    /// negative, or above [`Self::MAX_MINUTES`].
    pub fn new(minutes: i64) -> Result<Self, TaskDomainError> {
        match u32::try_from(minutes) {
            Ok(value) if value > 0 && value <= Self::MAX_MINUTES => Ok(Self(value)),
            _ => Err(TaskDomainError::InvalidDuration(minutes)),
        }
    }

    /// Returns the number of minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Returns the duration expressed in hours.
    #[must_use]
    pub fn hours(self) -> f64 {
        f64::from(self.0) / 60.0
    }
}

impl TryFrom<i64> for DurationMinutes {
    type Error = TaskDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DurationMinutes> for i64 {
    fn from(value: DurationMinutes) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}
