//! Service settings
//!
//! Layered with the `config` crate, later sources winning:
//! 1. Built-in defaults
//! 2. A TOML file (`commander.toml` in the working directory, or an
//!    explicit path)
//! 3. Environment variables prefixed `COMMANDER__`, using `__` between
//!    keys (`COMMANDER__SERVER__PORT=8080`)
//!
//! A `.env` file is loaded into the environment first, if present. A `.env`
//! that exists but cannot be parsed is an error.

use std::path::Path;

use ::config::{Config, Environment, File};
use commander_core::logging_facility::Profile;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerSettings {
    /// `host:port` for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Record store
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:`
    pub connection_string: String,
    pub backend: Backend,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            connection_string: "commander.db".to_string(),
            backend: Backend::Sqlite,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub profile: Profile,
}

impl Settings {
    /// Load settings from every layer
    ///
    /// With `path` the file must exist; without it `commander.toml` is
    /// optional.
    ///
    /// # Errors
    /// `EnvFile` when a `.env` file is present but unreadable; `Load` when
    /// a source cannot be read or parsed; `Invalid` when a value is out of
    /// range.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        accept_env_file(dotenvy::dotenv().map(|_| ()))?;
        Self::load_from(path, Environment::with_prefix("COMMANDER").separator("__"))
    }

    fn load_from(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.connection_string", defaults.database.connection_string)?
            .set_default("database.backend", "sqlite")?
            .set_default("logging.profile", "development")?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("commander").required(false)),
        };

        let settings: Settings = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no server can start with
    ///
    /// # Errors
    /// `Invalid` naming the offending key.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.server.port == 0 {
            return Err(SettingsError::Invalid {
                key: "server.port",
                reason: "port cannot be 0".to_string(),
            });
        }

        if self.server.host.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "server.host",
                reason: "host cannot be empty".to_string(),
            });
        }

        if self.database.backend == Backend::Sqlite
            && self.database.connection_string.trim().is_empty()
        {
            return Err(SettingsError::Invalid {
                key: "database.connection_string",
                reason: "connection string cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// A missing `.env` is fine; any other failure is reported
fn accept_env_file(result: dotenvy::Result<()>) -> Result<(), SettingsError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => {
            tracing::debug!("no .env file found");
            Ok(())
        }
        Err(err) => Err(SettingsError::EnvFile(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> Environment {
        Environment::with_prefix("COMMANDER_UNIT_TEST_UNSET").separator("__")
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.server.addr(), "127.0.0.1:5000");
        assert_eq!(settings.database.connection_string, "commander.db");
        assert_eq!(settings.database.backend, Backend::Sqlite);
        assert_eq!(settings.logging.profile, Profile::Development);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 8080").unwrap();
        writeln!(file, "[database]\nbackend = \"memory\"").unwrap();
        writeln!(file, "[logging]\nprofile = \"production\"").unwrap();

        let settings = Settings::load_from(Some(file.path()), no_env()).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.backend, Backend::Memory);
        assert_eq!(settings.logging.profile, Profile::Production);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let missing = Path::new("/nonexistent/commander.toml");
        let result = Settings::load_from(Some(missing), no_env());

        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let mut settings = Settings::default();
        settings.server.port = 0;

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { key: "server.port", .. })
        ));
    }

    #[test]
    fn test_empty_connection_string_is_rejected_for_sqlite() {
        let mut settings = Settings::default();
        settings.database.connection_string = "  ".to_string();
        assert!(settings.validate().is_err());

        settings.database.backend = Backend::Memory;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_env_file_is_accepted() {
        let result = dotenvy::from_path("/nonexistent/commander/.env");

        assert!(accept_env_file(result).is_ok());
    }

    #[test]
    fn test_unparsable_env_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "COMMANDER_TEST_NOT A VALID LINE").unwrap();

        let result = dotenvy::from_path(file.path());

        assert!(matches!(
            accept_env_file(result),
            Err(SettingsError::EnvFile(_))
        ));
    }
}
