//! # Application Configuration
//!
//! Where the ledger lives and the constants it runs with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     shelfbook --db ./shop.db list                                      │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     SHELFBOOK_DB_PATH=/srv/shelfbook.db                                │
//! │     SHELFBOOK_TAX_RATE_BPS=750                                         │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/shelfbook/shelfbook.toml (Linux)                         │
//! │     ~/Library/Application Support/com.shelfbook.shelfbook/ (macOS)     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     7.5% VAT, low stock under 5, 10 rows per page, ₦                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # shelfbook.toml
//! [database]
//! path = "/srv/shelfbook/shelfbook.db"
//!
//! [ledger]
//! tax_rate_bps = 750
//! low_stock_threshold = 5
//! page_size = 10
//! expiry_window_days = 30
//! currency_symbol = "₦"
//!
//! [demo_login]
//! username = "admin"
//! password = "password"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use shelfbook_core::validation::validate_tax_rate_bps;
use shelfbook_core::{
    DemoCredentials, LedgerSettings, TaxRate, DEFAULT_CURRENCY_SYMBOL,
    DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PAGE_SIZE,
    DEFAULT_TAX_RATE_BPS,
};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "shelfbook.toml";

/// File name used in the platform data directory.
pub const DATABASE_FILE_NAME: &str = "shelfbook.db";

/// Longest accepted expiry window, about a century.
pub const MAX_EXPIRY_WINDOW_DAYS: i64 = 36_500;

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No data directory available; pass --db or set SHELFBOOK_DB_PATH")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[database]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file. Falls back to the platform data directory.
    pub path: Option<PathBuf>,
}

/// `[ledger]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    pub tax_rate_bps: u32,
    pub low_stock_threshold: u32,
    pub page_size: usize,
    pub expiry_window_days: i64,
    pub currency_symbol: String,
}

impl Default for LedgerSection {
    fn default() -> Self {
        LedgerSection {
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// `[demo_login]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoLoginSection {
    pub username: String,
    pub password: String,
}

impl Default for DemoLoginSection {
    fn default() -> Self {
        let creds = DemoCredentials::default();
        DemoLoginSection {
            username: creds.username,
            password: creds.password,
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub ledger: LedgerSection,
    pub demo_login: DemoLoginSection,
}

impl AppConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// A missing file is not an error. An explicit `--config` path that does
    /// not exist is.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let explicit = config_path.is_some();
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if explicit || path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses one TOML file. Absent keys keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `SHELFBOOK_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from any variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SHELFBOOK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("SHELFBOOK_TAX_RATE_BPS") {
            self.ledger.tax_rate_bps = parse_env("SHELFBOOK_TAX_RATE_BPS", &value)?;
        }

        if let Some(value) = lookup("SHELFBOOK_LOW_STOCK_THRESHOLD") {
            self.ledger.low_stock_threshold = parse_env("SHELFBOOK_LOW_STOCK_THRESHOLD", &value)?;
        }

        if let Some(value) = lookup("SHELFBOOK_PAGE_SIZE") {
            self.ledger.page_size = parse_env("SHELFBOOK_PAGE_SIZE", &value)?;
        }

        if let Some(value) = lookup("SHELFBOOK_EXPIRY_WINDOW_DAYS") {
            self.ledger.expiry_window_days = parse_env("SHELFBOOK_EXPIRY_WINDOW_DAYS", &value)?;
        }

        if let Some(symbol) = lookup("SHELFBOOK_CURRENCY_SYMBOL") {
            self.ledger.currency_symbol = symbol;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tax_rate_bps(self.ledger.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.ledger.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be greater than 0".into(),
            ));
        }

        if !(0..=MAX_EXPIRY_WINDOW_DAYS).contains(&self.ledger.expiry_window_days) {
            return Err(ConfigError::Invalid(format!(
                "expiry_window_days must be between 0 and {}",
                MAX_EXPIRY_WINDOW_DAYS
            )));
        }

        if self.demo_login.username.is_empty() {
            warn!("Demo login username is empty; login will only accept an empty name");
        }

        Ok(())
    }

    /// Default config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Settings handed to the ledger.
    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            tax_rate: TaxRate::from_bps(self.ledger.tax_rate_bps),
            low_stock_threshold: self.ledger.low_stock_threshold,
            page_size: self.ledger.page_size,
            expiry_window_days: self.ledger.expiry_window_days,
            currency_symbol: self.ledger.currency_symbol.clone(),
        }
    }

    /// The pair the `login` command checks against.
    pub fn credentials(&self) -> DemoCredentials {
        DemoCredentials::new(&self.demo_login.username, &self.demo_login.password)
    }

    /// Resolves the database file: `--db`, then config/env, then the data dir.
    ///
    /// Creates the parent directory of the data-dir default.
    pub fn database_path(&self, cli_override: Option<&Path>) -> ConfigResult<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::Read {
            path: data_dir.to_path_buf(),
            source,
        })?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "shelfbook", "shelfbook")
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        let settings = config.ledger_settings();
        assert_eq!(settings, LedgerSettings::default());
        assert!(config.credentials().verify("admin", "password"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelfbook.toml");
        std::fs::write(
            &path,
            "[ledger]\ncurrency_symbol = \"$\"\npage_size = 25\n\n[database]\npath = \"/tmp/shop.db\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.ledger.currency_symbol, "$");
        assert_eq!(config.ledger.page_size, 25);
        assert_eq!(config.ledger.tax_rate_bps, 750);
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.demo_login, DemoLoginSection::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = AppConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelfbook.toml");
        std::fs::write(&path, "[ledger]\npage_size = \"ten\"\n").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("SHELFBOOK_DB_PATH", "/srv/ledger.db"),
            ("SHELFBOOK_TAX_RATE_BPS", "1000"),
            ("SHELFBOOK_PAGE_SIZE", "20"),
            ("SHELFBOOK_CURRENCY_SYMBOL", "GH₵"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.database.path, Some(PathBuf::from("/srv/ledger.db")));
        let settings = config.ledger_settings();
        assert_eq!(settings.tax_rate.bps(), 1000);
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.currency_symbol, "GH₵");
        assert_eq!(settings.low_stock_threshold, 5);
    }

    #[test]
    fn test_env_garbage_rejected() {
        let vars = env(&[("SHELFBOOK_PAGE_SIZE", "lots")]);
        let mut config = AppConfig::default();
        let err = config.apply_overrides(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.ledger.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ledger.tax_rate_bps = 20_000;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ledger.expiry_window_days = -1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ledger.expiry_window_days = MAX_EXPIRY_WINDOW_DAYS;
        assert!(config.validate().is_ok());
        config.ledger.expiry_window_days = 10_000_000_000_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_database_path_priority() {
        let mut config = AppConfig::default();
        config.database.path = Some(PathBuf::from("from-config.db"));

        let cli = PathBuf::from("from-cli.db");
        assert_eq!(config.database_path(Some(&cli)).unwrap(), cli);
        assert_eq!(
            config.database_path(None).unwrap(),
            PathBuf::from("from-config.db")
        );
    }
}
