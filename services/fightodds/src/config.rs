use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub odds_source: SourceConfig,
    #[serde(default)]
    pub fight_source: FightSourceConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// HTTP settings for one remote site
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_odds_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// HTTP settings for the fight record site; same keys as `SourceConfig`
/// with their own defaults
#[derive(Debug, Clone, Deserialize)]
pub struct FightSourceConfig {
    #[serde(default = "default_fight_base_url")]
    pub base_url: String,
    #[serde(default = "default_fight_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_fight_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_true")]
    pub fuzzy_enabled: bool,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_placeholder_tokens")]
    pub placeholder_tokens: Vec<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content)
            .context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odds_source: SourceConfig::default(),
            fight_source: FightSourceConfig::default(),
            resolver: ResolverConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl SourceConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_odds_base_url(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl FightSourceConfig {
    pub fn source(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.base_url.clone(),
            request_delay_ms: self.request_delay_ms,
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for FightSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_fight_base_url(),
            request_delay_ms: default_fight_request_delay_ms(),
            timeout_secs: default_fight_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_enabled: true,
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            placeholder_tokens: default_placeholder_tokens(),
        }
    }
}

fn default_odds_base_url() -> String {
    "https://www.bestfightodds.com".to_string()
}

fn default_fight_base_url() -> String {
    "http://ufcstats.com".to_string()
}

fn default_fight_request_delay_ms() -> u64 {
    1000
}

fn default_fight_timeout_secs() -> u64 {
    30
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_fuzzy_threshold() -> f64 {
    90.0
}

fn default_placeholder_tokens() -> Vec<String> {
    vec!["View".to_string()]
}
