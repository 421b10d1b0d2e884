/*!
 * Translation of classified lines using AI providers.
 *
 * - `core`: translation service wrapping the configured provider
 * - `parallel`: bounded parallel translation with order preservation
 */

// Re-export main types for easier usage
pub use self::core::{LogEntry, TranslationService};
pub use self::parallel::{
    BoundedParallelTranslator, OutputLine, RunSummary, TranslationOutcome, TranslationResult,
    TranslationRun,
};

// Submodules
pub mod core;
pub mod parallel;
