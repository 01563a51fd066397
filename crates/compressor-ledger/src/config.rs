//! Configuration management for compressor-ledger.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "compressor-ledger";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "compressor.db";

/// Default export directory name.
const EXPORT_DIR_NAME: &str = "exports";

/// Prefix of environment variable overrides.
const ENV_PREFIX: &str = "COMPRESSOR_LEDGER_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COMPRESSOR_LEDGER_`, `__` between sections)
/// 2. TOML config file at `~/.config/compressor-ledger/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Export configuration.
    pub export: ExportConfig,
    /// Static billing details printed on invoices.
    pub invoice: InvoiceConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Show error details in responses and log verbosely.
    pub debug: bool,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/compressor-ledger/compressor.db`
    pub database_path: Option<PathBuf>,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving the latest CSV and PDF exports.
    /// Defaults to `~/.local/share/compressor-ledger/exports`
    pub directory: Option<PathBuf>,
    /// Keep a copy of each export on disk in addition to streaming it.
    pub persist: bool,
}

/// Billing constants for generated invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// Issuing company.
    pub company_name: String,
    /// Line printed under the company name.
    pub company_tagline: String,
    /// Billed party name.
    pub customer_name: String,
    /// Billed party address.
    pub customer_address: String,
    /// Amount in words. Printed verbatim regardless of the total.
    pub amount_words: String,
    /// Terms printed at the bottom of the invoice.
    pub terms: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None, // Will be resolved to default at runtime
            persist: true,
        }
    }
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            company_name: "CareLab Diagnostics".to_string(),
            company_tagline: "Precision in Every Report".to_string(),
            customer_name: "Patient Name".to_string(),
            customer_address: "Patient Address".to_string(),
            amount_words: "One Thousand Rupees Only".to_string(),
            terms: "Reports delivered digitally. No refunds.".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading `config_path` or the
    /// default config file.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server.host must not be empty".to_string(),
            });
        }

        if self.invoice.company_name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "invoice.company_name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(EXPORT_DIR_NAME))
    }

    /// Get the socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| Error::ConfigValidation {
            message: format!("invalid listen address: {addr}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 5000);
        assert!(!server.debug);
    }

    #[test]
    fn test_default_export_config() {
        let export = ExportConfig::default();

        assert!(export.directory.is_none());
        assert!(export.persist);
    }

    #[test]
    fn test_default_invoice_config() {
        let invoice = InvoiceConfig::default();

        assert_eq!(invoice.company_name, "CareLab Diagnostics");
        assert_eq!(invoice.company_tagline, "Precision in Every Report");
        assert_eq!(invoice.amount_words, "One Thousand Rupees Only");
        assert_eq!(invoice.terms, "Reports delivered digitally. No refunds.");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.host"));
    }

    #[test]
    fn test_validate_empty_company_name() {
        let mut config = Config::default();
        config.invoice.company_name = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("company_name"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("compressor.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_export_dir_default() {
        let config = Config::default();
        assert!(config.export_dir().ends_with("compressor-ledger/exports"));
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_bind_addr_invalid_host() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("compressor-ledger"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080
debug = true

[invoice]
company_name = "Acme Compressors"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.server.debug);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.invoice.company_name, "Acme Compressors");
        assert_eq!(config.invoice.terms, InvoiceConfig::default().terms);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = \"eighty\"\n").unwrap();

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigLoad(_))));
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("company_name"));
        assert!(json.contains("persist"));
    }
}
