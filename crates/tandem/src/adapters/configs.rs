use anyhow::Result;
use std::env;

pub const DEFAULT_MAX_TOKENS: i32 = 8000;

/// Helper to read environment variables with error handling
fn get_env(key: &str, required: bool, default: Option<&str>) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) if !required => Ok(default.map(str::to_string)),
        Err(env::VarError::NotPresent) => Err(anyhow::anyhow!(
            "Environment variable '{}' is required but not set.",
            key
        )),
        Err(e) => Err(e.into()),
    }
}

pub struct AnthropicAdapterConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: i32,
}

impl AnthropicAdapterConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = get_env("ANTHROPIC_API_KEY", true, None)?
            .ok_or_else(|| anyhow::anyhow!("Anthropic API key should be present"))?;
        let host = get_env("ANTHROPIC_HOST", false, Some("https://api.anthropic.com"))?
            .unwrap_or_else(|| "https://api.anthropic.com".to_string());
        let model = get_env(
            "ANTHROPIC_MODEL",
            false,
            Some("claude-3-5-sonnet-20241022"),
        )?
        .unwrap_or_else(|| "claude-3-5-sonnet-20241022".to_string());

        Ok(Self {
            host,
            api_key,
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }
}

pub struct OpenAiAdapterConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: i32,
}

impl OpenAiAdapterConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = get_env("OPENAI_API_KEY", true, None)?
            .ok_or_else(|| anyhow::anyhow!("OpenAI API key should be present"))?;
        let host = get_env("OPENAI_API_HOST", false, Some("https://api.openai.com"))?
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let model = get_env("OPENAI_MODEL", false, Some("gpt-4.1"))?
            .unwrap_or_else(|| "gpt-4.1".to_string());

        Ok(Self {
            host,
            api_key,
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }
}

/// Unified enum to wrap the adapter configurations
pub enum AdapterConfig {
    Anthropic(AnthropicAdapterConfig),
    OpenAi(OpenAiAdapterConfig),
}
