//! # Settings
//!
//! Layered service configuration.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. `config/limo-quote.{toml,yaml,json}` if present, or an explicit file
//! 3. `LIMO__<SECTION>__<KEY>` environment variables, e.g. `LIMO__SERVER__PORT`
//! 4. Hosting platform variables: `GMAIL_USER`, `GMAIL_CLIENT_ID`,
//!    `GMAIL_CLIENT_SECRET`, `GMAIL_REFRESH_TOKEN`, `GMAIL_APP_PASSWORD`
//!    (or `GMAIL_PASSWORD`), `BUSINESS_EMAIL` and `PORT`
//!
//! The environment is read once while loading. Everything downstream gets
//! explicit settings structs.
//!
//! # Examples
//!
//! ```
//! use limo_quote::config::Settings;
//!
//! let settings = Settings::default();
//! assert_eq!(settings.bind_address(), "0.0.0.0:3000");
//! assert_eq!(settings.booking.id_prefix, "EZL");
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::{BusinessProfile, DEFAULT_BOOKING_PREFIX};
use crate::infrastructure::mail::MailConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file looked up when no explicit path is given.
const DEFAULT_CONFIG_FILE: &str = "config/limo-quote";

/// Prefix of structured environment overrides.
const ENV_PREFIX: &str = "LIMO";

/// Hosting platform variables and the keys they override.
const PLATFORM_OVERRIDES: [(&str, &str); 7] = [
    ("GMAIL_USER", "mail.sender_address"),
    ("GMAIL_CLIENT_ID", "mail.oauth2.client_id"),
    ("GMAIL_CLIENT_SECRET", "mail.oauth2.client_secret"),
    ("GMAIL_REFRESH_TOKEN", "mail.oauth2.refresh_token"),
    ("GMAIL_PASSWORD", "mail.app_password"),
    ("GMAIL_APP_PASSWORD", "mail.app_password"),
    ("BUSINESS_EMAIL", "mail.business_mailbox"),
];

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Fallback store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON file holding undelivered requests.
    pub fallback_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            fallback_path: PathBuf::from("data/pending-quotes.json"),
        }
    }
}

/// Booking ID settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    /// Prefix of every issued booking ID.
    pub id_prefix: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_BOOKING_PREFIX.to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line human-readable output.
    #[default]
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP listener.
    pub server: ServerSettings,
    /// Public business contact details.
    pub business: BusinessProfile,
    /// Mail provider.
    pub mail: MailConfig,
    /// Fallback store.
    pub storage: StorageSettings,
    /// Booking IDs.
    pub booking: BookingSettings,
    /// Logging.
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from all sources using the process environment.
    ///
    /// # Arguments
    ///
    /// * `path` - Explicit config file. When `None`, `config/limo-quote.*`
    ///   is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be read
    /// or the result is invalid.
    pub fn load(path: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_with_env(path, std::env::vars().collect())
    }

    /// Loads settings using the given variables instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be read
    /// or the result is invalid.
    pub fn load_with_env(
        path: Option<&Path>,
        env: HashMap<String, String>,
    ) -> ApplicationResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(env.clone())),
            );

        for (var, key) in PLATFORM_OVERRIDES {
            builder = builder.set_override_option(key, non_blank(&env, var))?;
        }
        builder = builder.set_override_option("server.port", non_blank(&env, "PORT"))?;

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values that would only fail later at runtime.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the first bad key.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(ApplicationError::configuration("server.host must not be empty"));
        }
        if self.booking.id_prefix.trim().is_empty() {
            return Err(ApplicationError::configuration(
                "booking.id_prefix must not be empty",
            ));
        }
        if self.mail.sender_address.trim().is_empty() {
            return Err(ApplicationError::configuration(
                "mail.sender_address must not be empty",
            ));
        }
        if self.mail.business_mailbox.trim().is_empty() {
            return Err(ApplicationError::configuration(
                "mail.business_mailbox must not be empty",
            ));
        }
        if self.mail.connect_timeout_ms == 0 || self.mail.send_timeout_ms == 0 {
            return Err(ApplicationError::configuration(
                "mail timeouts must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Returns `host:port` for the HTTP listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Returns true if XOAUTH2 credentials are complete.
    #[must_use]
    pub fn has_oauth2(&self) -> bool {
        self.mail.oauth2.credentials().is_some()
    }

    /// Returns true if an app password is configured.
    #[must_use]
    pub fn has_app_password(&self) -> bool {
        self.mail.app_password().is_some()
    }
}

fn non_blank(env: &HashMap<String, String>, var: &str) -> Option<String> {
    env.get(var)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let settings =
            Settings::load_with_env(Some(toml_file("").path()), HashMap::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.has_oauth2());
        assert!(!settings.has_app_password());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = toml_file(
            r#"
            [server]
            port = 8080

            [business]
            phone = "(301) 555-0100"

            [storage]
            fallback_path = "/var/lib/limo/pending.json"
            "#,
        );

        let settings = Settings::load_with_env(Some(file.path()), HashMap::new()).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.business.phone, "(301) 555-0100");
        assert_eq!(settings.business.name, "EZ Airport Limo");
        assert_eq!(
            settings.storage.fallback_path,
            PathBuf::from("/var/lib/limo/pending.json")
        );
    }

    #[test]
    fn structured_env_overrides_file() {
        let file = toml_file("[booking]\nid_prefix = \"FILE\"\n");
        let settings = Settings::load_with_env(
            Some(file.path()),
            env(&[
                ("LIMO__BOOKING__ID_PREFIX", "ENV"),
                ("LIMO__MAIL__SEND_TIMEOUT_MS", "2500"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.booking.id_prefix, "ENV");
        assert_eq!(settings.mail.send_timeout_ms, 2500);
    }

    #[test]
    fn numeric_looking_strings_are_kept_verbatim() {
        let settings = Settings::load_with_env(
            Some(toml_file("").path()),
            env(&[
                ("LIMO__BUSINESS__PHONE", "0123456789"),
                ("LIMO__MAIL__APP_PASSWORD", "1e3"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.business.phone, "0123456789");
        assert_eq!(settings.mail.app_password(), Some("1e3"));
    }

    #[test]
    fn platform_variables_win() {
        let settings = Settings::load_with_env(
            Some(toml_file("[server]\nport = 8080\n").path()),
            env(&[
                ("PORT", "9090"),
                ("GMAIL_USER", "bookings@example.com"),
                ("GMAIL_CLIENT_ID", "id"),
                ("GMAIL_CLIENT_SECRET", "secret"),
                ("GMAIL_REFRESH_TOKEN", "refresh"),
                ("GMAIL_PASSWORD", "legacy"),
                ("GMAIL_APP_PASSWORD", "app-pass"),
                ("BUSINESS_EMAIL", "ops@example.com"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.mail.sender_address, "bookings@example.com");
        assert_eq!(settings.mail.business_mailbox, "ops@example.com");
        assert_eq!(settings.mail.app_password(), Some("app-pass"));
        assert!(settings.has_oauth2());
    }

    #[test]
    fn blank_platform_variables_are_ignored() {
        let settings = Settings::load_with_env(
            Some(toml_file("").path()),
            env(&[("GMAIL_USER", "  "), ("PORT", "")]),
        )
        .unwrap();

        assert_eq!(settings.mail.sender_address, "reservation@ezairportlimo.com");
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let err = Settings::load_with_env(
            Some(Path::new("/nonexistent/limo-quote.toml")),
            HashMap::new(),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Settings::load_with_env(
            Some(toml_file("[booking]\nid_prefix = \"  \"\n").path()),
            HashMap::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("booking.id_prefix"));

        let err = Settings::load_with_env(
            Some(toml_file("[mail]\nsend_timeout_ms = 0\n").path()),
            HashMap::new(),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn debug_hides_mail_secrets() {
        let mut settings = Settings::default();
        settings.mail = settings.mail.with_app_password("hunter2");
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
