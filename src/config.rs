//! Configuration loading for the summary service.
//!
//! Everything comes from the process environment (optionally seeded from a
//! `.env` file in `main`). Provider keys are only read here and never logged.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Credentials shorter than this are treated as absent.
pub const MIN_API_KEY_LEN: usize = 10;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// One OpenAI-compatible chat-completions provider.
#[derive(Clone)]
pub struct ProviderConfig {
    pub id: String,
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub extra_headers: Vec<(String, String)>,
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            api_url: api_url.into(),
            api_key: None,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 4096,
            extra_headers: Vec::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// The credential, if it is long enough and not a template placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        let key = self.api_key.as_deref()?.trim();
        let placeholder = key.starts_with("your_") && key.ends_with("_here");
        (key.len() >= MIN_API_KEY_LEN && !placeholder).then_some(key)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("id", &self.id)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Zero disables the cache
    pub capacity: usize,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Providers in priority order
    pub providers: Vec<ProviderConfig>,
    pub request_timeout: Duration,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut openrouter = ProviderConfig::new(
            "openrouter",
            var("OPENROUTER_API_URL").unwrap_or_else(|| OPENROUTER_URL.to_string()),
            var("OPENROUTER_MODEL").unwrap_or_else(|| OPENROUTER_MODEL.to_string()),
        )
        .with_api_key(var("OPENROUTER_API_KEY"));
        if let Some(referer) = var("OPENROUTER_REFERER") {
            openrouter
                .extra_headers
                .push(("HTTP-Referer".to_string(), referer));
        }
        if let Some(title) = var("OPENROUTER_TITLE") {
            openrouter.extra_headers.push(("X-Title".to_string(), title));
        }

        let gemini_key = var("GEMINI_API_KEY")
            .or_else(|| var("GOOGLE_API_KEY"))
            .or_else(|| var("GOOGLE_AI_API_KEY"));
        let gemini = ProviderConfig::new(
            "gemini",
            var("GEMINI_API_URL").unwrap_or_else(|| GEMINI_URL.to_string()),
            var("GEMINI_MODEL").unwrap_or_else(|| GEMINI_MODEL.to_string()),
        )
        .with_api_key(gemini_key);

        let timeout_secs: u64 = parse_var(&var, "PROVIDER_TIMEOUT_SECS", 60)?;
        let capacity: usize = parse_var(&var, "SUMMARY_CACHE_CAPACITY", 128)?;
        let ttl_secs: u64 = parse_var(&var, "SUMMARY_CACHE_TTL_SECS", 3600)?;

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            providers: vec![openrouter, gemini],
            request_timeout: Duration::from_secs(timeout_secs),
            cache: CacheConfig {
                capacity,
                ttl: Duration::from_secs(ttl_secs),
            },
        })
    }
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
