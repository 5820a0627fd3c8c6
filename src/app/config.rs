//! Runtime configuration loaded from the environment.
//!
//! Every variable is checked and all problems are reported together, so a
//! misconfigured deployment shows the full list on the first failed start.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use secrecy::SecretString;

use crate::domain::ConfigError;

const DEFAULT_PORT: u16 = 9999;
const MIN_DATABASE_URL_LENGTH: usize = 5;

/// Deployment environment, read from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "expected 'development' | 'test' | 'production', received '{other}'"
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log verbosity, read from `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Silent,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter_directive(&self) -> &'static str {
        match self {
            Self::Fatal | Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Silent => "off",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fatal" => Ok(Self::Fatal),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "silent" => Ok(Self::Silent),
            other => Err(format!(
                "expected one of fatal, error, warn, info, debug, trace, silent; received '{other}'"
            )),
        }
    }
}

/// Application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub log_level: LogLevel,
    pub database_url: String,
    pub database_auth_token: Option<SecretString>,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match read("NODE_ENV") {
            Some(raw) => raw
                .parse::<Environment>()
                .map_err(|message| invalid("NODE_ENV", message))
                .unwrap_or_else(|e| {
                    errors.push(e);
                    Environment::default()
                }),
            None => Environment::default(),
        };

        let port = match read("PORT") {
            Some(raw) => parse_port(&raw).unwrap_or_else(|e| {
                errors.push(e);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let log_level = match read("LOG_LEVEL") {
            Some(raw) => raw
                .parse::<LogLevel>()
                .map_err(|message| invalid("LOG_LEVEL", message))
                .unwrap_or_else(|e| {
                    errors.push(e);
                    LogLevel::default()
                }),
            None => LogLevel::default(),
        };

        let database_url = match read("DATABASE_URL") {
            Some(url) if url.len() >= MIN_DATABASE_URL_LENGTH => url,
            Some(_) => {
                errors.push(invalid(
                    "DATABASE_URL",
                    format!("must contain at least {MIN_DATABASE_URL_LENGTH} character(s)"),
                ));
                String::new()
            }
            None => {
                errors.push(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
                String::new()
            }
        };

        let database_auth_token = read("DATABASE_AUTH_TOKEN").map(SecretString::from);
        if environment.is_production() && database_auth_token.is_none() {
            errors.push(invalid(
                "DATABASE_AUTH_TOKEN",
                "required when NODE_ENV is 'production'",
            ));
        }

        match errors.len() {
            0 => Ok(Self {
                environment,
                port,
                log_level,
                database_url,
                database_auth_token,
            }),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::Multiple(errors)),
        }
    }

    /// Loads `.env.test` when `NODE_ENV=test`, otherwise `.env`.
    ///
    /// Variables already set in the process environment win.
    ///
    /// # Errors
    ///
    /// Returns the dotenvy error when the file exists but cannot be read or
    /// parsed. A missing file is not an error.
    pub fn load_dotenv() -> Result<(), dotenvy::Error> {
        let file = match std::env::var("NODE_ENV").as_deref() {
            Ok("test") => ".env.test",
            _ => ".env",
        };
        load_env_file(file)
    }
}

fn load_env_file(path: impl AsRef<Path>) -> Result<(), dotenvy::Error> {
    match dotenvy::from_filename(path) {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("PORT", format!("expected a number, received '{raw}'")))?;
    match u16::try_from(value) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(invalid("PORT", "PORT should be > 0 and < 65536")),
    }
}
