use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main agentdeck configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub paths: PathsConfig,
    pub reply: ReplyConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding custom agent definitions
    pub agents: PathBuf,
    /// Preferences file (theme)
    pub preferences: PathBuf,
}

/// Which reply generator backs the chat
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyBackend {
    /// Canned answer after `delay_ms`
    #[default]
    Placeholder,
    /// OpenAI-compatible chat completions endpoint
    Http,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplyConfig {
    pub backend: ReplyBackend,
    pub delay_ms: u64,
    pub endpoint: Option<String>,
    pub model: String,
    /// Name of the env var holding the API key
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            paths: PathsConfig::default(),
            reply: ReplyConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let dir = Config::agentdeck_dir();

        Self {
            agents: dir.join("agents"),
            preferences: dir.join("preferences.yaml"),
        }
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            backend: ReplyBackend::Placeholder,
            delay_ms: 1000,
            endpoint: None,
            model: "gpt-4o-mini".to_string(),
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("AGENTDECK_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from AGENTDECK_CONFIG: {}", e);
                    }
                }
            }
        }

        // AGENTDECK_DIR/agentdeck.yaml, falling back to ~/.config/agentdeck/agentdeck.yaml
        let path = Self::agentdeck_dir().join("agentdeck.yaml");
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        // Try ./agentdeck.yaml (for development)
        let local_config = PathBuf::from("agentdeck.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Write to `<agentdeck_dir>/agentdeck.yaml`, returning the path
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::agentdeck_dir().join("agentdeck.yaml");
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml_str = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(&config_path, yaml_str).context("Failed to write config file")?;
        Ok(config_path)
    }

    /// Get the agentdeck directory (config, preferences, custom agents)
    pub fn agentdeck_dir() -> PathBuf {
        std::env::var("AGENTDECK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("agentdeck"))
    }

    pub fn agents_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.agents)
    }

    pub fn preferences_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.preferences)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
