//! # Usertour Configuration Crate
//!
//! Strongly-typed settings for the tour binary and the database client.
//! Values come from an optional `config.toml`, then `APP_`-prefixed
//! environment variables (`__` separates nested keys), then `DATABASE_URL`.

use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use settings::ConfigOverrides;
pub use settings::{Config, DatabaseSettings, LoggingSettings, TourSettings};

/// Loads the application configuration.
///
/// A missing `config.toml` is not an error: every section has defaults, and the
/// connection string normally arrives through `DATABASE_URL`. The result is not
/// validated here, so command-line overrides can still fix it; call
/// [`validate`] once they have been applied.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(app_environment(), std::env::var("DATABASE_URL").ok())
}

/// `APP_DATABASE__MAX_CONNECTIONS` sets `database.max_connections`.
fn app_environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_from(
    environment: config::Environment,
    database_url: Option<String>,
) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(environment)
        .set_override_option("database.url", database_url)?
        .build()?
        .try_deserialize::<Config>()?;
    Ok(config)
}

/// Rejects settings that could never produce a working tour.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be at least 1".to_string(),
        ));
    }
    let email = config.tour.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ConfigError::ValidationError(format!(
            "tour.email `{}` is not an email address",
            config.tour.email
        )));
    }
    Ok(())
}
