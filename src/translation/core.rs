/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which turns a single
 * payload into one provider request and returns the provider's answer.
 * Each call is a single attempt; retry policy is left to the caller.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;
use std::time::Instant;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::{Provider, TranslationBackend};

/// Upper bound of generated tokens for one dialogue line
const MAX_RESPONSE_TOKENS: u32 = 1024;

/// Log entry for capturing translation process logs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

impl LogEntry {
    /// Entry with the given level
    pub fn new(level: &str, message: impl Into<String>) -> Self {
        Self {
            level: level.to_string(),
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new("WARN", message)
    }
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        /// Client instance (OpenAI-compatible)
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Translation service backed by one configured provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::OpenAI => {
                let api_key = config.get_api_key();
                if api_key.is_empty() {
                    return Err(anyhow!("Translation API key is required for OpenAI provider"));
                }
                TranslationProviderImpl::OpenAI {
                    client: OpenAI::new_with_config(api_key, config.get_endpoint(), timeout_secs)?,
                }
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio often doesn't require an API key; use a default if empty
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };
                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new_with_config(api_key, config.get_endpoint(), timeout_secs)?,
                }
            },
            ConfigTranslationProvider::Anthropic => {
                let api_key = config.get_api_key();
                if api_key.is_empty() {
                    return Err(anyhow!("Translation API key is required for Anthropic provider"));
                }
                TranslationProviderImpl::Anthropic {
                    client: Anthropic::new_with_config(api_key, config.get_endpoint(), timeout_secs)?,
                }
            },
        };

        Ok(Self { provider, config })
    }

    /// Render the system prompt for a language pair
    pub fn system_prompt(&self, source_language: &str, target_language: &str) -> String {
        render_prompt(&self.config.common.system_prompt, "", source_language, target_language)
    }

    /// Render the user message carrying the payload
    pub fn user_prompt(&self, text: &str, source_language: &str, target_language: &str) -> String {
        render_prompt(&self.config.common.user_prompt, text, source_language, target_language)
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        let result = match &self.provider {
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                client.test_connection().await
            },
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
        };

        result.map_err(|e| anyhow!("Failed to connect to {}: {}", self.config.provider.display_name(), e))
    }
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError> {
        // Nothing to send for an empty value
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let start_time = Instant::now();
        let system_prompt = self.system_prompt(source_language, target_language);
        let user_prompt = self.user_prompt(text, source_language, target_language);
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;

        let translated_text = match &self.provider {
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(model)
                    .add_message("system", system_prompt)
                    .add_message("user", user_prompt)
                    .temperature(temperature)
                    .max_tokens(MAX_RESPONSE_TOKENS);
                let response = client.complete(request).await?;
                OpenAI::extract_text(&response)
            },
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, MAX_RESPONSE_TOKENS)
                    .system(system_prompt)
                    .add_message("user", user_prompt)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Anthropic::extract_text(&response)
            },
        };

        debug!("{} response received in {:?}", self.config.provider.display_name(), start_time.elapsed());

        if translated_text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(translated_text)
    }
}

/// Substitute `{source_language}`, `{target_language}` and `{text}` in a template
pub fn render_prompt(template: &str, text: &str, source_language: &str, target_language: &str) -> String {
    template
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{text}", text)
}
