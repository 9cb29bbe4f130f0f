//! Layered runtime settings.
//!
//! Settings are resolved from three layers, later layers winning:
//!
//! 1. Compiled defaults ([`Settings::default`]).
//! 2. A JSON file named by `BUSYNESS_SETTINGS`, deep enough to override
//!    single fields (missing fields keep their defaults).
//! 3. `BUSYNESS_*` environment variables.
//!
//! Every layer is validated before the result is handed out.

mod error;
mod loader;
mod settings;

pub use error::SettingsError;
pub use loader::{
    ENV_PREFIX, SETTINGS_PATH_ENV, load_settings, load_settings_from_path, load_settings_with,
    settings_from_json,
};
pub use settings::{LoggingSettings, RankingSettings, Settings, TaskDefaults};
