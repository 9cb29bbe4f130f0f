//! Settings loading from file and environment.

use super::{Settings, SettingsError};
use std::path::Path;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "BUSYNESS_";

/// Environment variable naming an optional JSON settings file.
pub const SETTINGS_PATH_ENV: &str = "BUSYNESS_SETTINGS";

/// Loads settings from the process environment.
///
/// # Errors
///
/// Returns [`SettingsError`] when the settings file cannot be read or parsed,
/// an override is malformed, or the result fails validation.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_with(|key| std::env::var(key).ok())
}

/// Loads settings resolving environment variables through `lookup`.
///
/// # Errors
///
/// Same as [`load_settings`].
pub fn load_settings_with(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let mut settings = match lookup(SETTINGS_PATH_ENV) {
        Some(path) => read_settings_file(Path::new(&path))?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings, &lookup)?;
    settings.validate()?;
    Ok(settings)
}

/// Loads and validates settings from a JSON file without env overrides.
///
/// # Errors
///
/// Returns [`SettingsError`] when the file cannot be read or parsed, or the
/// result fails validation.
pub fn load_settings_from_path(path: &Path) -> Result<Settings, SettingsError> {
    let settings = read_settings_file(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Parses settings from JSON; omitted fields keep their defaults.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] for malformed JSON and
/// [`SettingsError::InvalidValue`] when validation fails.
pub fn settings_from_json(json: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = serde_json::from_str(json)?;
    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded settings file");
    Ok(serde_json::from_str(&contents)?)
}

fn apply_env_overrides(
    settings: &mut Settings,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    let float_targets: [(&str, &mut f64); 6] = [
        ("EFFORT_FLOOR", &mut settings.ranking.effort_floor),
        ("DEADLINE_FLOOR_DAYS", &mut settings.ranking.deadline_floor_days),
        ("DEFAULT_IMPACT", &mut settings.defaults.impact),
        ("DEFAULT_EFFORT", &mut settings.defaults.effort),
        (
            "DEFAULT_NOT_DOING_RATE",
            &mut settings.defaults.not_doing_hourly_rate,
        ),
        ("DEFAULT_DOING_RATE", &mut settings.defaults.doing_hourly_rate),
    ];
    for (suffix, target) in float_targets {
        let key = format!("{ENV_PREFIX}{suffix}");
        if let Some(raw) = lookup(&key) {
            *target = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| SettingsError::InvalidOverride {
                    key: key.clone(),
                    value: raw.clone(),
                })?;
            tracing::debug!(key = %key, "applied settings override");
        }
    }

    if let Some(filter) = lookup(&format!("{ENV_PREFIX}LOG")) {
        settings.logging.filter = filter;
    }
    let json_key = format!("{ENV_PREFIX}LOG_JSON");
    if let Some(raw) = lookup(&json_key) {
        settings.logging.json = parse_flag(&raw).ok_or(SettingsError::InvalidOverride {
            key: json_key,
            value: raw,
        })?;
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
