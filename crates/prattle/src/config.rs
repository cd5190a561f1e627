//! Application configuration.
//!
//! Configuration is resolved in three layers: coded defaults, an optional
//! TOML file, and environment variables with the `PRATTLE` prefix and `__`
//! separator (e.g. `PRATTLE__UPSTREAM__API_KEY`). Later layers win.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "prattle";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub limits: LimitsConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            limits: LimitsConfig::default(),
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed by CORS. Empty means localhost defaults.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_origins: Vec::new(),
        }
    }
}

/// Upstream completion API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Bearer credential for the upstream API. Empty means unconfigured;
    /// requests fail with a configuration error until one is provided.
    pub api_key: String,
    /// Base endpoint of the OpenAI-compatible API.
    pub base_url: String,
    /// Default text model identifier.
    pub text_model: String,
    /// Vision-capable model identifier, used when a turn carries an image.
    pub vision_model: String,
    /// Sampling temperature sent with every request.
    pub temperature: f32,
    /// Completion token cap sent with every request.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            text_model: "llama-3.3-70b-versatile".to_string(),
            vision_model: "llama-3.2-90b-vision-preview".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            timeout_secs: 30,
        }
    }
}

/// Request-size limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum attachment size in megabytes.
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
        }
    }
}

impl LimitsConfig {
    /// Maximum attachment size in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

/// Conversation behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Serialize concurrent turns per session. Off by default: the baseline
    /// design tolerates interleaved appends from concurrent turns on the
    /// same session identifier.
    pub serialize_turns: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            serialize_turns: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Default config file location: `<config_dir>/prattle/config.toml`.
pub fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("config.toml")
}

/// Environment variable prefix derived from the app name.
fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Load configuration from defaults, the given file (optional) and the
/// environment.
pub fn load_config(config_file: &Path) -> Result<AppConfig> {
    let built = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(
            File::from(config_file)
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(Environment::with_prefix(env_prefix().as_str()).separator("__"))
        .build()?;

    let mut config: AppConfig = built.try_deserialize()?;

    if let Some(ref file) = config.logging.file {
        let expanded = shellexpand::full(file)
            .with_context(|| format!("expanding log file path {file}"))?;
        config.logging.file = Some(expanded.into_owned());
    }

    Ok(config)
}

/// Write a commented default config file, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {parent:?}"))?;
    }

    let config = AppConfig::default();
    let toml = toml::to_string_pretty(&config).context("serializing default config to TOML")?;
    let mut body = format!(
        "# Configuration for {APP_NAME}\n# Environment variables with the {} prefix override these values.\n\n",
        env_prefix()
    );
    body.push_str(&toml);
    std::fs::write(path, body).with_context(|| format!("writing config file to {}", path.display()))
}
