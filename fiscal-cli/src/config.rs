//! `fiscal.toml` configuration.
//!
//! Every section is optional. A missing file yields the defaults: `info`
//! logging, the standard rates, the built-in bracket table, `logo_smm.png`
//! and `MSM.jpg` as logos, and the built-in users. Relative paths inside the
//! file are resolved against the directory that holds it.
//!
//! An explicitly empty `[users]` table opens the login to any user name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use fiscal_core::{FiscalRates, FiscalRatesError, TaxBracketTable};
use fiscal_data::{DEFAULT_ISR_TABLE, parse_bracket_table};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Rates(#[from] FiscalRatesError),

    #[error("failed to read bracket table '{}': {source}", path.display())]
    BracketFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive.
    pub level: String,
    /// Log file, opened in append mode.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Where the bracket table comes from. `file` wins over `table`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BracketsConfig {
    pub file: Option<PathBuf>,
    pub table: Option<String>,
}

pub const DEFAULT_COMPANY_LOGO: &str = "logo_smm.png";
pub const DEFAULT_DEVELOPER_LOGO: &str = "MSM.jpg";

/// Built-in credentials used when the file has no `[users]` table.
const DEFAULT_USERS: [(&str, &str); 2] = [("admin", "1234"), ("miguel", "smm")];

/// Logos drawn on PDF reports. `set-logo` writes to `company_logo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub company_logo: Option<PathBuf>,
    pub developer_logo: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            company_logo: Some(PathBuf::from(DEFAULT_COMPANY_LOGO)),
            developer_logo: Some(PathBuf::from(DEFAULT_DEVELOPER_LOGO)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub rates: FiscalRates,
    pub brackets: BracketsConfig,
    pub report: ReportConfig,
    /// User name to password.
    pub users: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            rates: FiscalRates::default(),
            brackets: BracketsConfig::default(),
            report: ReportConfig::default(),
            users: DEFAULT_USERS
                .iter()
                .map(|(user, password)| (user.to_string(), password.to_string()))
                .collect(),
        }
    }
}

impl AppConfig {
    /// Loads and validates the file at `path`.
    ///
    /// A missing file is not an error; the defaults are returned and a
    /// warning is logged.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }
        config.validate()?;

        debug!(path = %path.display(), users = config.users.len(), "loaded config");
        Ok(config)
    }

    /// Parses TOML text without touching the filesystem. Paths stay as
    /// written.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rates.validate()?;
        Ok(())
    }

    /// Raw text of the configured bracket table.
    pub fn bracket_text(&self) -> Result<String, ConfigError> {
        if let Some(path) = &self.brackets.file {
            return fs::read_to_string(path).map_err(|source| ConfigError::BracketFile {
                path: path.clone(),
                source,
            });
        }
        Ok(self
            .brackets
            .table
            .clone()
            .unwrap_or_else(|| DEFAULT_ISR_TABLE.to_string()))
    }

    /// The configured bracket table, parsed leniently.
    pub fn bracket_table(&self) -> Result<TaxBracketTable, ConfigError> {
        let text = self.bracket_text()?;
        let table = parse_bracket_table(&text);

        let candidate_lines = text.lines().filter(|l| !l.trim().is_empty()).count();
        let skipped = candidate_lines.saturating_sub(table.len());
        if table.is_empty() {
            warn!("bracket table has no usable rows; individual ISR will be zero");
        } else if skipped > 0 {
            warn!(skipped, "skipped malformed bracket table lines");
        }
        info!(rows = table.len(), "bracket table ready");

        Ok(table)
    }

    fn resolve_paths(
        &mut self,
        base_dir: &Path,
    ) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base_dir.join(&*p);
            }
        };
        if let Some(p) = self.logging.file.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.brackets.file.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.report.company_logo.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.report.developer_logo.as_mut() {
            resolve(p);
        }
    }
}
