use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that relocates the data directory
pub const HOME_ENV: &str = "BUCKETSWEEP_HOME";

/// Environment variable that overrides `supabase_url`
pub const URL_ENV: &str = "SUPABASE_URL";

/// Global bucketsweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which storage backend to talk to
    #[serde(default)]
    pub backend: BackendKind,

    /// Project URL, e.g. https://xyzcompany.supabase.co
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Name of the environment variable holding the API key.
    /// The key itself is never written to disk.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Root directory for the local backend (one sub-directory per bucket)
    #[serde(default)]
    pub local_root: Option<PathBuf>,

    /// Bucket used when none is given on the command line
    #[serde(default)]
    pub default_bucket: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size sent with list requests unless overridden
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,

    /// Also write logs to ~/.bucketsweep/logs
    #[serde(default)]
    pub log_to_file: bool,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Supabase,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_api_key_env() -> String {
    "SUPABASE_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_list_limit() -> u32 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            supabase_url: None,
            api_key_env: default_api_key_env(),
            local_root: None,
            default_bucket: None,
            request_timeout_secs: default_timeout_secs(),
            list_limit: default_list_limit(),
            log_to_file: false,
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the bucketsweep data directory (~/.bucketsweep, or $BUCKETSWEEP_HOME)
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".bucketsweep")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from an explicit file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize all bucketsweep directories
    pub fn init_dirs() -> Result<()> {
        for dir in [Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Environment wins over the file for the project URL
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                self.supabase_url = Some(url);
            }
        }
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Apply a `config set KEY VALUE` assignment
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backend" => {
                self.backend = match value {
                    "supabase" => BackendKind::Supabase,
                    "local" => BackendKind::Local,
                    _ => anyhow::bail!("Unknown backend: {} (expected supabase or local)", value),
                }
            }
            "supabase_url" => self.supabase_url = Some(value.trim_end_matches('/').to_string()),
            "api_key_env" => self.api_key_env = value.to_string(),
            "local_root" => self.local_root = Some(PathBuf::from(value)),
            "default_bucket" => self.default_bucket = Some(value.to_string()),
            "request_timeout_secs" => self.request_timeout_secs = value.parse()?,
            "list_limit" => self.list_limit = value.parse()?,
            "log_to_file" => self.log_to_file = value.parse()?,
            "output_format" => {
                self.output_format = match value {
                    "human" => OutputFormat::Human,
                    "json" => OutputFormat::Json,
                    "quiet" => OutputFormat::Quiet,
                    _ => anyhow::bail!("Unknown output format: {} (expected human, json or quiet)", value),
                }
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}
