//! Settings type definitions.

use super::SettingsError;
use crate::task::{
    domain::{Effort, HourlyRate, Impact, PriorityModel},
    services::{CreationDefaults, LifecyclePolicy},
};
use serde::{Deserialize, Serialize};

/// Root settings type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Priority engine parameters.
    pub ranking: RankingSettings,
    /// Values applied to fields omitted at task creation.
    pub defaults: TaskDefaults,
    /// Tracing subscriber configuration.
    pub logging: LoggingSettings,
}

/// Priority engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    /// Smallest effort, in hours, used as divisor.
    pub effort_floor: f64,
    /// Smallest days-to-deadline used as divisor.
    pub deadline_floor_days: f64,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            effort_floor: 0.1,
            deadline_floor_days: 0.1,
        }
    }
}

/// Values applied to fields omitted at task creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDefaults {
    /// Initial impact.
    pub impact: f64,
    /// Effort in hours.
    pub effort: f64,
    /// Impact growth per outstanding hour.
    pub not_doing_hourly_rate: f64,
    /// Rate-mode decay for endless tasks created without a completion mode.
    pub doing_hourly_rate: f64,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            impact: 5.0,
            effort: 1.0,
            not_doing_hourly_rate: 0.1,
            doing_hourly_rate: 0.1,
        }
    }
}

/// Tracing subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

impl Settings {
    /// Checks every value and converts the domain-facing parts.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] naming the first offending
    /// setting.
    pub fn lifecycle_policy(&self) -> Result<LifecyclePolicy, SettingsError> {
        Ok(LifecyclePolicy {
            defaults: self.defaults.resolve()?,
            priority: self.ranking.priority_model()?,
        })
    }

    /// Validates the settings without converting them.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::lifecycle_policy`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.lifecycle_policy().map(|_| ())
    }
}

impl RankingSettings {
    /// Builds the priority model.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] when a floor is not a finite
    /// positive number.
    pub fn priority_model(&self) -> Result<PriorityModel, SettingsError> {
        positive("ranking.effort_floor", self.effort_floor)?;
        positive("ranking.deadline_floor_days", self.deadline_floor_days)?;
        Ok(PriorityModel::new(self.effort_floor, self.deadline_floor_days))
    }
}

impl TaskDefaults {
    /// Converts the raw defaults into validated domain values.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] when a default would be
    /// rejected as user input.
    pub fn resolve(&self) -> Result<CreationDefaults, SettingsError> {
        Ok(CreationDefaults {
            impact: Impact::new(self.impact).map_err(invalid("defaults.impact"))?,
            effort: Effort::new(self.effort).map_err(invalid("defaults.effort"))?,
            not_doing_hourly_rate: HourlyRate::new(self.not_doing_hourly_rate)
                .map_err(invalid("defaults.not_doing_hourly_rate"))?,
            doing_hourly_rate: HourlyRate::new(self.doing_hourly_rate)
                .map_err(invalid("defaults.doing_hourly_rate"))?,
        })
    }
}

fn positive(key: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(SettingsError::InvalidValue {
        key,
        reason: format!("expected a finite positive number, got {value}"),
    })
}

fn invalid<E: std::fmt::Display>(key: &'static str) -> impl Fn(E) -> SettingsError {
    move |err| SettingsError::InvalidValue {
        key,
        reason: err.to_string(),
    }
}
