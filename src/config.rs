use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ── Providers ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "local-engine")]
    LocalEngine,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "gemini")]
    Gemini,
}

impl Provider {
    pub fn label(&self) -> &str {
        match self {
            Provider::LocalEngine => "Local engine (Ollama)",
            Provider::OpenAi => "OpenAI",
            Provider::DeepSeek => "DeepSeek",
            Provider::Gemini => "Gemini Studio",
        }
    }

    pub fn all() -> Vec<Provider> {
        vec![
            Provider::LocalEngine,
            Provider::OpenAi,
            Provider::DeepSeek,
            Provider::Gemini,
        ]
    }

    /// Cloud providers take an API key and a free-form model name; the local
    /// engine takes a base URL and a model picked from the installed list.
    pub fn is_cloud(&self) -> bool {
        *self != Provider::LocalEngine
    }

    pub fn default_model(&self) -> &str {
        match self {
            Provider::LocalEngine => "tinyllama",
            Provider::OpenAi => "gpt-3.5-turbo",
            Provider::DeepSeek => "deepseek-chat",
            Provider::Gemini => "gemini-pro",
        }
    }

    /// Fixed chat endpoint for cloud providers. The local engine's endpoint
    /// is derived from the configured base URL instead.
    pub fn api_url(&self) -> &str {
        match self {
            Provider::LocalEngine => "",
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions",
            Provider::DeepSeek => "https://api.deepseek.com/v1/chat/completions",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/models",
        }
    }

    /// Placeholder shown in the settings model field while it is empty.
    pub fn model_hint(&self) -> &str {
        match self {
            Provider::LocalEngine => "",
            Provider::OpenAi => "e.g. gpt-3.5-turbo",
            Provider::DeepSeek => "e.g. deepseek-chat",
            Provider::Gemini => "e.g. gemini-pro",
        }
    }
}

// ── Persisted configuration ───────────────────────────────────────────────────

pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_LOCAL_MODEL: &str = "tinyllama";

fn default_provider() -> Provider {
    Provider::LocalEngine
}

fn default_local_base_url() -> String {
    DEFAULT_LOCAL_BASE_URL.to_string()
}

fn default_local_model() -> String {
    DEFAULT_LOCAL_MODEL.to_string()
}

fn default_auto_check() -> bool {
    true
}

/// The single persisted record shared by every surface. Fields irrelevant to
/// the active provider are kept as-is and never validated; the per-field
/// serde defaults fill in anything missing from a record saved by an older
/// version, so loads always produce a complete record.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_provider")]
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_model: Option<String>,
    #[serde(default = "default_local_base_url")]
    pub local_base_url: String,
    #[serde(default = "default_local_model")]
    pub local_model: String,
    #[serde(default = "default_auto_check")]
    pub auto_check_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: default_provider(),
            api_key: None,
            provider_model: None,
            local_base_url: default_local_base_url(),
            local_model: default_local_model(),
            auto_check_enabled: default_auto_check(),
        }
    }
}

impl Config {
    /// Model name sent to the active provider: the configured model for the
    /// local engine, the typed model (or the provider default when the field
    /// is empty) for cloud providers.
    pub fn active_model(&self) -> String {
        match self.provider {
            Provider::LocalEngine => self.local_model.clone(),
            p => self
                .provider_model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| p.default_model().to_string()),
        }
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Persistence seam for the configuration record. The record is always read
/// and written whole; there are no partial updates.
pub trait ConfigStore {
    fn load(&self) -> Result<Config>;
    fn save(&self, config: &Config) -> Result<()>;
}

/// Production store: one JSON file under the platform config directory.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }

    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().context("No config directory on this platform")?;
        Ok(JsonFileStore::new(dir.join("purgify").join("config.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config at {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed config at {}", self.path.display()))
    }

    fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))
    }
}
