use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variables accepted for the quote API key, highest precedence first.
pub const API_KEY_ENV_VARS: [&str; 4] = [
    "BARCHART_API_KEY",
    "BARCHART_APIKEY",
    "BARCHART_ONDEMAND_API_KEY",
    "NEXT_PUBLIC_BARCHART_API_KEY",
];

pub const DEFAULT_SNAPSHOT_PATH: &str = "public/data/futures.json";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EcbProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BarchartProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub ecb: Option<EcbProviderConfig>,
    pub barchart: Option<BarchartProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            ecb: Some(EcbProviderConfig {
                base_url: "https://www.ecb.europa.eu".to_string(),
            }),
            barchart: Some(BarchartProviderConfig {
                base_url: "https://ondemand.websol.barchart.com".to_string(),
                api_key: None,
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScraperConfig {
    #[serde(default = "default_scraper_base_url")]
    pub base_url: String,
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_scraper_base_url() -> String {
    "https://www.barchart.com".to_string()
}

fn default_wait_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; TS-FuturesBot/1.0; +https://trade-solution.eu/)".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            base_url: default_scraper_base_url(),
            wait_timeout_secs: default_wait_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_pairs() -> Vec<String> {
    ["EURUSD", "EURGBP", "EURPLN"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_snapshot_path() -> String {
    DEFAULT_SNAPSHOT_PATH.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_pairs")]
    pub pairs: Vec<String>,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            pairs: default_pairs(),
            snapshot_path: default_snapshot_path(),
            providers: ProvidersConfig::default(),
            scraper: ScraperConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("eu", "trade-solution", "tsquotes")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn ecb_base_url(&self) -> &str {
        self.providers
            .ecb
            .as_ref()
            .map_or("https://www.ecb.europa.eu", |p| &p.base_url)
    }

    pub fn barchart_base_url(&self) -> &str {
        self.providers
            .barchart
            .as_ref()
            .map_or("https://ondemand.websol.barchart.com", |p| &p.base_url)
    }

    /// The quote API key from the file or the process environment.
    pub fn api_key(&self) -> Option<String> {
        let configured = self
            .providers
            .barchart
            .as_ref()
            .and_then(|p| p.api_key.as_deref());
        resolve_api_key(configured, |name| std::env::var(name).ok())
    }
}

/// Resolves the quote API key.
///
/// Precedence: the configured value, then each of [`API_KEY_ENV_VARS`] in
/// order. Blank values are skipped; the first non-blank one wins.
pub fn resolve_api_key<F>(configured: Option<&str>, lookup_env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = configured.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    API_KEY_ENV_VARS.iter().find_map(|name| {
        lookup_env(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}
