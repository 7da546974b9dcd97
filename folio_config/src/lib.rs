use std::{fmt::Display, net::IpAddr, path::Path, str::FromStr};

use anyhow::Context;
use config::{Environment, File, FileFormat};
pub use duration::Duration;
use folio_models::email_address::EmailAddress;
use serde::{Deserialize, Deserializer};
use url::Url;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variable containing a `:` separated list of config files.
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

const ENV_PREFIX: &str = "FOLIO";

/// Loads the config from the files listed in `FOLIO_CONFIG` (or the default
/// config file) and applies `FOLIO_*` environment overrides.
pub fn load() -> anyhow::Result<Config> {
    let paths = config_paths(std::env::var(CONFIG_PATH_ENV).ok().as_deref());
    load_with_override(&paths, &[])
}

/// Loads the config from the given files. Each entry of `overrides` is a
/// TOML snippet applied after the files, but before environment variables.
pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    overrides
        .iter()
        .fold(builder, |builder, &snippet| {
            builder.add_source(File::from_str(snippet, FileFormat::Toml))
        })
        .add_source(environment())
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn config_paths(env: Option<&str>) -> Vec<String> {
    match env {
        Some(paths) if !paths.trim().is_empty() => paths
            .split(':')
            .filter(|p| !p.is_empty())
            .map(Into::into)
            .collect(),
        _ => vec![DEFAULT_CONFIG_PATH.into()],
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("http.allowed_origins")
        .try_parsing(true)
        .ignore_empty(true)
}

/// Deserializes an optional value, treating a blank string as absent.
fn non_blank<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub health: HealthConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    #[serde(default, deserialize_with = "non_blank")]
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub sender: Option<EmailAddress>,
    pub endpoint_override: Option<Url>,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    #[serde(default, deserialize_with = "non_blank")]
    pub email: Option<EmailAddress>,
}

impl Config {
    /// The address notifications are sent from, if any.
    pub fn email_sender(&self) -> Option<&EmailAddress> {
        self.email.sender.as_ref().or(self.contact.email.as_ref())
    }

    /// The operator address notifications are sent to, if any.
    pub fn contact_recipient(&self) -> Option<&EmailAddress> {
        self.contact.email.as_ref().or(self.email.sender.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASE_URL: &str = r#"database.url = "postgres://folio@localhost/folio""#;

    #[test]
    fn load_default_config() {
        let config = load_with_override(&[Path::new(DEFAULT_CONFIG_PATH)], &[DATABASE_URL]).unwrap();

        assert_eq!(config.http.port, 5000);
        assert_eq!(*config.email.timeout, std::time::Duration::from_secs(10));
        assert!(config.email.api_key.is_none());
        assert!(config.contact_recipient().is_none());
    }

    #[test]
    fn database_url_is_required() {
        let result = load_with_override(&[Path::new(DEFAULT_CONFIG_PATH)], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn address_fallbacks() {
        let config = load_with_override(
            &[Path::new(DEFAULT_CONFIG_PATH)],
            &[DATABASE_URL, r#"contact.email = "me@example.com""#],
        )
        .unwrap();

        assert_eq!(config.email_sender().unwrap().as_str(), "me@example.com");
        assert_eq!(config.contact_recipient().unwrap().as_str(), "me@example.com");

        let config = load_with_override(
            &[Path::new(DEFAULT_CONFIG_PATH)],
            &[
                DATABASE_URL,
                r#"email.sender = "noreply@example.com""#,
                r#"contact.email = "me@example.com""#,
            ],
        )
        .unwrap();

        assert_eq!(config.email_sender().unwrap().as_str(), "noreply@example.com");
        assert_eq!(config.contact_recipient().unwrap().as_str(), "me@example.com");
    }

    #[test]
    fn invalid_contact_email() {
        let result = load_with_override(
            &[Path::new(DEFAULT_CONFIG_PATH)],
            &[DATABASE_URL, r#"contact.email = "not an email""#],
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_values_are_absent() {
        let config = load_with_override(
            &[Path::new(DEFAULT_CONFIG_PATH)],
            &[
                DATABASE_URL,
                r#"email.api_key = """#,
                r#"email.sender = "  ""#,
                r#"contact.email = """#,
            ],
        )
        .unwrap();

        assert!(config.email.api_key.is_none());
        assert!(config.email_sender().is_none());
        assert!(config.contact_recipient().is_none());
    }

    #[test]
    fn empty_env_vars_are_ignored() {
        let env = environment().source(Some(
            [
                ("FOLIO_EMAIL__API_KEY".to_owned(), String::new()),
                ("FOLIO_CONTACT__EMAIL".to_owned(), String::new()),
            ]
            .into_iter()
            .collect(),
        ));

        let config = config::Config::builder()
            .add_source(File::from_str(
                "[email]\napi_key = \"secret\"\n[contact]\nemail = \"me@example.com\"\n",
                FileFormat::Toml,
            ))
            .add_source(env)
            .build()
            .unwrap();

        assert_eq!(config.get_string("email.api_key").unwrap(), "secret");
        assert_eq!(config.get_string("contact.email").unwrap(), "me@example.com");
    }

    #[test]
    fn paths_from_env() {
        assert_eq!(config_paths(None), [DEFAULT_CONFIG_PATH]);
        assert_eq!(config_paths(Some("")), [DEFAULT_CONFIG_PATH]);
        assert_eq!(config_paths(Some("a.toml:b.toml")), ["a.toml", "b.toml"]);
    }
}
