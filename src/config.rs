use crate::tables::TableSettings;
use serde::Deserialize;
use std::{fs, path::Path};

/// Environment variable that may point at a TOML config file.
pub const CONFIG_ENV: &str = "INVOICE_ANALYZER_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tables: TableSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_analyze_timeout_secs")]
    pub analyze_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_log_filter() -> String {
    "invoice_analyzer=info,tower_http=info".to_string()
}

fn default_analyze_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
            log_filter: default_log_filter(),
            analyze_timeout_secs: default_analyze_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(toml::from_str(content)?)
    }

    /// Load from the given path (or `INVOICE_ANALYZER_CONFIG`), falling back
    /// to defaults when neither names an existing file. Also returns the
    /// path actually read, if any.
    pub fn resolve(
        path: Option<String>,
    ) -> Result<(Self, Option<String>), Box<dyn std::error::Error>> {
        match path.or_else(|| std::env::var(CONFIG_ENV).ok()) {
            Some(p) if Path::new(&p).exists() => Ok((Self::load(&p)?, Some(p))),
            _ => Ok((Self::default(), None)),
        }
    }
}
