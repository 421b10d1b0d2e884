/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use dmtranslate::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};
use dmtranslate::errors::ConfigError;
use dmtranslate::line_classifier::FormatErrorPolicy;

use crate::common::{self, test_config};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "English");
    assert_eq!(config.target_language, "Korean");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.translation.get_model(), "gpt-4o-mini");
    assert_eq!(config.translation.get_concurrent_requests(), 10);
    assert_eq!(config.translation.get_timeout_secs(), 30);
    assert_eq!(config.classifier.translate_marker, "UI_DM");
    assert_eq!(config.classifier.exclusion_marker, "--");
    assert_eq!(config.classifier.sentinel, Some(','));
    assert_eq!(config.classifier.format_error_policy, FormatErrorPolicy::Skip);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.target_language, created.target_language);
    assert_eq!(reloaded.translation.available_providers.len(), 3);
    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "target_language": "ja",
            "translation": {
                "provider": "lmstudio",
                "available_providers": [
                    { "type": "lmstudio", "model": "qwen", "concurrent_requests": 2 }
                ]
            },
            "classifier": { "format_error_policy": "abort" }
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.source_language, "English");
    assert_eq!(config.target_language, "ja");
    assert_eq!(config.translation.provider, TranslationProvider::LMStudio);
    assert_eq!(config.translation.get_model(), "qwen");
    assert_eq!(config.translation.get_concurrent_requests(), 2);
    assert_eq!(config.translation.get_endpoint(), "http://localhost:1234/v1");
    assert_eq!(config.classifier.translate_marker, "UI_DM");
    assert_eq!(config.classifier.format_error_policy, FormatErrorPolicy::Abort);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withoutApiKey_shouldFail() {
    let config = Config::default();
    assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey(_))));
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let config = test_config(0);
    assert!(matches!(config.validate(), Err(ConfigError::InvalidConcurrency(0))));
}

#[test]
fn test_validate_withConcurrencyAboveSemaphoreLimit_shouldFail() {
    let config = test_config(usize::MAX);
    assert!(matches!(config.validate(), Err(ConfigError::InvalidConcurrency(usize::MAX))));
}

#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let mut config = test_config(4);
    config.target_language = "Klingonese".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::UnknownLanguage(_))));
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let mut config = test_config(4);
    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidEndpoint { .. })));
}

#[test]
fn test_validate_withEmptyMarker_shouldFail() {
    let mut config = test_config(4);
    config.classifier.translate_marker.clear();
    assert!(matches!(config.validate(), Err(ConfigError::EmptyMarker("translate_marker"))));
}

#[test]
fn test_activeProviderConfigMut_withMissingEntry_shouldInsertDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Anthropic;

    config.translation.active_provider_config_mut().api_key = "key".to_string();

    let provider: &ProviderConfig = config.translation.get_active_provider_config().unwrap();
    assert_eq!(provider.provider_type, "anthropic");
    assert_eq!(provider.api_key, "key");
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
}
