//! Configuration loading and config file resolution
//!
//! Every value is resolved with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment handling belongs to each binary (clap with
//! `env`), which passes the winners in as [`ConfigOverrides`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "WFA_CONFIG";

/// Compiled defaults used when no other source provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub bind_address: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub skip_failed_pdf_pages: bool,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 10 << 20,
            skip_failed_pdf_pages: true,
            log_level: "info".to_string(),
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// `[pdf]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PdfConfig {
    /// Drop pages whose text cannot be extracted instead of failing the upload
    pub skip_failed_pages: Option<bool>,
}

/// On-disk TOML configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the file if one was resolved, falling back to an empty config
    ///
    /// A missing or malformed file never stops startup; it is logged and
    /// compiled defaults take over.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("No config file found, using compiled defaults");
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => {
                debug!("Loaded config file {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} (using compiled defaults)", e);
                Self::default()
            }
        }
    }
}

/// Values supplied on the command line or via environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    pub skip_failed_pdf_pages: Option<bool>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub skip_failed_pdf_pages: bool,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::resolve(ConfigOverrides::default(), TomlConfig::default())
    }
}

impl ServiceConfig {
    /// Merge overrides and TOML over the compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Self {
        let defaults = CompiledDefaults::default();

        Self {
            bind_address: overrides
                .bind_address
                .or(toml.bind_address)
                .unwrap_or(defaults.bind_address),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            max_upload_bytes: overrides
                .max_upload_bytes
                .or(toml.max_upload_bytes)
                .unwrap_or(defaults.max_upload_bytes),
            skip_failed_pdf_pages: overrides
                .skip_failed_pdf_pages
                .or(toml.pdf.skip_failed_pages)
                .unwrap_or(defaults.skip_failed_pdf_pages),
            log_level: overrides
                .log_level
                .or(toml.logging.level)
                .unwrap_or(defaults.log_level),
        }
    }

    /// `bind_address:port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Reject values that cannot work at runtime
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than 0".to_string()));
        }
        if self.bind_address.trim().is_empty() {
            return Err(Error::Config("bind_address must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Locates the config file for a service
///
/// Search order: explicit path (CLI) → `WFA_CONFIG` → user config dir →
/// `/etc/wfa` (Linux only). Only files that exist are returned, except an
/// explicit path, which is returned as given so a typo surfaces as a warning.
pub struct ConfigFileResolver {
    module_name: String,
}

impl ConfigFileResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    pub fn resolve(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_path {
            return Some(path.to_path_buf());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config locations
        self.candidate_paths().into_iter().find(|p| p.exists())
    }

    fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("wfa").join(format!("{}.toml", self.module_name)));
            paths.push(dir.join("wfa").join("config.toml"));
        }
        if cfg!(target_os = "linux") {
            paths.push(PathBuf::from("/etc/wfa").join(format!("{}.toml", self.module_name)));
            paths.push(PathBuf::from("/etc/wfa/config.toml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_defaults_match_service_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.skip_failed_pdf_pages);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides_beat_toml() {
        let toml = TomlConfig {
            port: Some(9000),
            bind_address: Some("0.0.0.0".to_string()),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            port: Some(9100),
            ..Default::default()
        };

        let config = ServiceConfig::resolve(overrides, toml);
        assert_eq!(config.port, 9100);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.listen_address(), "0.0.0.0:9100");
    }

    #[test]
    fn test_validate_rejects_zero_upload_limit() {
        let config = ServiceConfig {
            max_upload_bytes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(ServiceConfig::default().validate().is_ok());
    }
}
