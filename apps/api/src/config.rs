use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

const DEFAULT_SECRETS_FILE: &str = "secrets.toml";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration, resolved once at startup and shared through `AppState`.
///
/// Secrets are looked up in the process environment first, then in the local
/// TOML secret file. A missing Gemini API key is fatal.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    /// `None` when any of the `PG_*` keys is missing; saves then report it.
    pub database: Option<DatabaseConfig>,
    pub port: u16,
    pub rust_log: String,
}

/// Credentials for the per-submission PostgreSQL connection.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConfig {
    /// Connection options with TLS required.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(PgSslMode::Require)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let secrets_path =
            env_var("SECRETS_FILE").unwrap_or_else(|| DEFAULT_SECRETS_FILE.to_string());
        let secrets = SecretFile::load(Path::new(&secrets_path))?;

        let mut config = Self::from_lookup(layered_lookup(env_var, &secrets))?;
        config.apply_env_overrides(env_var)?;
        Ok(config)
    }

    /// Process settings that only ever come from the environment.
    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = env("PORT") {
            self.port = port
                .parse::<u16>()
                .context("PORT must be a valid port number")?;
        }
        if let Some(filter) = env("RUST_LOG") {
            self.rust_log = filter;
        }
        if let Some(base) = env("GEMINI_API_BASE") {
            self.gemini_api_base = base;
        }
        Ok(())
    }

    /// Builds the secret-backed part of the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gemini_api_key = match lookup("GEMINI_API_KEY") {
            Some(key) if !key.trim().is_empty() => key,
            _ => bail!("API key not found: set GEMINI_API_KEY in the environment, .env or the secrets file"),
        };

        Ok(Config {
            gemini_api_key,
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            database: database_from_lookup(&lookup)?,
            port: 8080,
            rust_log: "info".to_string(),
        })
    }
}

fn database_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<DatabaseConfig>> {
    let (Some(host), Some(port), Some(name), Some(user), Some(password)) = (
        lookup("PG_HOST"),
        lookup("PG_PORT"),
        lookup("PG_DB"),
        lookup("PG_USER"),
        lookup("PG_PASSWORD"),
    ) else {
        return Ok(None);
    };

    let port = port
        .trim()
        .parse::<u16>()
        .with_context(|| format!("PG_PORT must be a valid port number, got '{port}'"))?;

    Ok(Some(DatabaseConfig {
        host,
        port,
        name,
        user,
        password,
    }))
}

/// Environment first, then the secret file.
fn layered_lookup<'a>(
    env: impl Fn(&str) -> Option<String> + 'a,
    secrets: &'a SecretFile,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| env(key).or_else(|| secrets.get(key))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Flat key/value secrets read from a local TOML file.
#[derive(Debug, Default)]
pub struct SecretFile {
    values: HashMap<String, String>,
}

impl SecretFile {
    /// Reads the file at `path`. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read secrets file '{}'", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid secrets file '{}'", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let table: toml::Table = raw.parse()?;
        let values = table
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    _ => return None,
                };
                Some((key, value))
            })
            .collect();
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        ("GEMINI_API_KEY", "test-key"),
        ("PG_HOST", "db.internal"),
        ("PG_PORT", "5432"),
        ("PG_DB", "jobs"),
        ("PG_USER", "writer"),
        ("PG_PASSWORD", "hunter2"),
    ];

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("PG_HOST", "localhost")])).unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        assert!(Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_full_lookup_builds_database_config() {
        let config = Config::from_lookup(lookup_from(FULL)).unwrap();
        assert_eq!(config.gemini_api_key, "test-key");
        assert_eq!(config.gemini_api_base, DEFAULT_GEMINI_API_BASE);
        assert_eq!(
            config.database,
            Some(DatabaseConfig {
                host: "db.internal".to_string(),
                port: 5432,
                name: "jobs".to_string(),
                user: "writer".to_string(),
                password: "hunter2".to_string(),
            })
        );
    }

    #[test]
    fn test_partial_database_keys_disable_persistence() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "test-key"),
            ("PG_HOST", "db.internal"),
            ("PG_PORT", "5432"),
        ]))
        .unwrap();
        assert!(config.database.is_none());
    }

    #[test]
    fn test_invalid_pg_port_is_rejected() {
        let mut pairs = FULL.to_vec();
        pairs[2] = ("PG_PORT", "not-a-port");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("PG_PORT"));
    }

    #[test]
    fn test_secret_file_accepts_strings_and_integers() {
        let secrets = SecretFile::parse(
            r#"
            GEMINI_API_KEY = "from-file"
            PG_PORT = 6543
            nested = { ignored = true }
            "#,
        )
        .unwrap();
        assert_eq!(secrets.get("GEMINI_API_KEY").as_deref(), Some("from-file"));
        assert_eq!(secrets.get("PG_PORT").as_deref(), Some("6543"));
        assert!(secrets.get("nested").is_none());
    }

    #[test]
    fn test_environment_wins_over_secret_file() {
        let secrets = SecretFile::parse(
            "GEMINI_API_KEY = \"from-file\"\nPG_HOST = \"file-host\"\nPG_PORT = 6543\n\
             PG_DB = \"filedb\"\nPG_USER = \"file-user\"\nPG_PASSWORD = \"file-pass\"",
        )
        .unwrap();
        let env = lookup_from(&[("GEMINI_API_KEY", "from-env"), ("PG_DB", "envdb")]);

        let config = Config::from_lookup(layered_lookup(env, &secrets)).unwrap();

        assert_eq!(config.gemini_api_key, "from-env");
        let database = config.database.unwrap();
        assert_eq!(database.name, "envdb");
        assert_eq!(database.host, "file-host");
        assert_eq!(database.port, 6543);
    }

    #[test]
    fn test_secret_file_fills_keys_missing_from_environment() {
        let secrets = SecretFile::parse("GEMINI_API_KEY = \"from-file\"").unwrap();
        let config = Config::from_lookup(layered_lookup(lookup_from(&[]), &secrets)).unwrap();
        assert_eq!(config.gemini_api_key, "from-file");
        assert!(config.database.is_none());
    }

    #[test]
    fn test_env_overrides_port_log_and_api_base() {
        let mut config = Config::from_lookup(lookup_from(FULL)).unwrap();
        config
            .apply_env_overrides(lookup_from(&[
                ("PORT", "9090"),
                ("RUST_LOG", "jobgen=debug"),
                ("GEMINI_API_BASE", "http://127.0.0.1:4010"),
            ]))
            .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.rust_log, "jobgen=debug");
        assert_eq!(config.gemini_api_base, "http://127.0.0.1:4010");
    }

    #[test]
    fn test_absent_overrides_keep_defaults() {
        let mut config = Config::from_lookup(lookup_from(FULL)).unwrap();
        config.apply_env_overrides(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.gemini_api_base, DEFAULT_GEMINI_API_BASE);
    }

    #[test]
    fn test_invalid_port_override_is_rejected() {
        let mut config = Config::from_lookup(lookup_from(FULL)).unwrap();
        let err = config
            .apply_env_overrides(lookup_from(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_secret_file_load_missing_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = SecretFile::load(&dir.path().join("absent.toml")).unwrap();
        assert!(secrets.get("GEMINI_API_KEY").is_none());
    }

    #[test]
    fn test_secret_file_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PG_HOST = \"file-host\"").unwrap();
        let secrets = SecretFile::load(file.path()).unwrap();
        assert_eq!(secrets.get("PG_HOST").as_deref(), Some("file-host"));
    }

    #[test]
    fn test_malformed_secret_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is = = not toml").unwrap();
        assert!(SecretFile::load(file.path()).is_err());
    }
}
