//! Tracing integration for structured logging
//!
//! The engine logs through the `tracing` macros but never installs a
//! global subscriber on its own. Embedders (and tests chasing a layout
//! bug) can call [`init`] to get an env-filtered fmt subscriber; the
//! `TERMPANES_LOG` variable overrides the default filter.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable consulted for the log filter.
pub const LOG_ENV_VAR: &str = "TERMPANES_LOG";

/// Errors that can occur during tracing initialization.
#[derive(Debug, thiserror::Error)]
pub enum TraceInitError {
    /// A global subscriber is already installed.
    #[error("tracing has already been initialized")]
    AlreadyInitialized,
}

/// Installs a global fmt subscriber filtered by [`LOG_ENV_VAR`].
///
/// `default_filter` applies when the environment variable is unset or
/// unparsable (e.g. `"termpanes_core=debug"`).
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), TraceInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|_| TraceInitError::AlreadyInitialized)
}
