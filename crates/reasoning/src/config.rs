use std::sync::Arc;

use relief_common::{ReliefError, Result};
use serde::{Deserialize, Serialize};

use crate::client::ReasoningClient;
use crate::gemini::GeminiClient;
use crate::retry::{RetryConfig, RetryingClient};

/// Configuration for the reasoning collaborator. Passed explicitly at
/// construction time; there is no ambient credential cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Prefer the GEMINI_API_KEY environment variable over storing the
    /// key in a config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the API base URL (proxies, test servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_provider() -> String {
    "gemini".into()
}

fn default_model() -> String {
    "gemini-3-flash-preview".into()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    500
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            api_url: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            retry: RetryConfig::default(),
        }
    }
}

impl ReasoningConfig {
    /// Resolve the API key: explicit config value first, then the
    /// provider's environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }

        let env_var = match self.provider.as_str() {
            "gemini" => "GEMINI_API_KEY",
            _ => return None,
        };

        std::env::var(env_var).ok()
    }
}

/// Build the configured reasoning client, wrapped in the retry
/// decorator.
pub fn build_reasoning_client(config: &ReasoningConfig) -> Result<Arc<dyn ReasoningClient>> {
    let base_client: Box<dyn ReasoningClient> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                ReliefError::Config(
                    "Gemini requires an API key (config api_key or GEMINI_API_KEY)".to_string(),
                )
            })?;
            let mut client = GeminiClient::new(config.model.clone(), api_key)
                .with_generation_limits(config.temperature, config.max_output_tokens);
            if let Some(ref url) = config.api_url {
                client = client.with_api_base(url.clone());
            }
            Box::new(client)
        }
        other => {
            return Err(ReliefError::Config(format!(
                "Unknown reasoning provider: {other}"
            )));
        }
    };

    Ok(Arc::new(RetryingClient::new(
        base_client,
        config.retry.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_CONFIG: &str = r#"
provider = "gemini"
model = "gemini-3-flash-preview"
api_key = "test-key"
max_output_tokens = 800

[retry]
max_retries = 5
initial_delay_ms = 1000
max_delay_ms = 60000
backoff_multiplier = 3.0
"#;

    #[test]
    fn deserialize_config_from_toml() {
        let config: ReasoningConfig = toml::from_str(TOML_CONFIG).unwrap();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.max_output_tokens, 800);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_delay_ms, 1000);
    }

    #[test]
    fn deserialize_config_defaults() {
        let config: ReasoningConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_output_tokens, 500);
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn explicit_api_key_wins() {
        let config = ReasoningConfig {
            api_key: Some("explicit".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("explicit"));
    }

    #[test]
    fn build_gemini_client() {
        let config = ReasoningConfig {
            api_key: Some("test-key".into()),
            ..Default::default()
        };
        let client = build_reasoning_client(&config).unwrap();
        assert_eq!(client.model_name(), "gemini-3-flash-preview");
    }

    #[test]
    fn build_unknown_provider_fails() {
        let config = ReasoningConfig {
            provider: "oracle".into(),
            api_key: Some("key".into()),
            ..Default::default()
        };
        assert!(build_reasoning_client(&config).is_err());
    }
}
