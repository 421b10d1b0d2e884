/*!
 * # dmtranslate - AI translation of UI dialogue files
 *
 * A Rust library for translating the values of UI dialogue entries in
 * line-oriented key/value text files using AI providers.
 *
 * ## Features
 *
 * - Selects `KEY = "value",` lines carrying the dialogue marker (`UI_DM`)
 *   and skips commented-out lines (`--`)
 * - Translates values through a bounded pool of concurrent requests:
 *   - OpenAI API
 *   - Anthropic API
 *   - LM Studio (OpenAI-compatible local server)
 * - Keeps every other line byte-for-byte and the original line order
 * - Falls back to the original value when a request fails
 *
 * ## Architecture
 *
 * - `line_classifier`: line selection and payload extraction
 * - `translation`: translation service and bounded parallel translator
 * - `providers`: client implementations for the supported providers
 * - `app_config`: configuration management
 * - `app_controller`: end-to-end file translation
 * - `file_utils`: file system operations
 * - `language_utils`: ISO language code and name utilities
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod line_classifier;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunReport};
pub use errors::{ConfigError, FormatError, ProviderError};
pub use line_classifier::{ClassifiedLine, LineClassifier};
pub use providers::TranslationBackend;
pub use translation::{BoundedParallelTranslator, TranslationService};
