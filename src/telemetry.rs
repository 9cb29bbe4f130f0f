//! Tracing subscriber setup.

use crate::config::LoggingSettings;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`LoggingSettings::filter`]. Returns
/// `false` without touching the existing subscriber when one is already
/// installed.
#[must_use]
pub fn init_tracing(settings: &LoggingSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if settings.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    match installed {
        Ok(()) => {
            tracing::info!(
                filter = %settings.filter,
                json = settings.json,
                "tracing initialised"
            );
            true
        }
        Err(err) => {
            tracing::debug!(error = %err, "global tracing subscriber already set");
            false
        }
    }
}
