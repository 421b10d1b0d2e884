/*!
 * Bounded parallel translation of classified lines.
 *
 * Every translatable line becomes an independent unit of work tagged with its
 * line index. Units run on a pool of at most `concurrency` concurrent requests,
 * finish in any order, and are merged back with the passthrough lines by index.
 * A failed unit keeps its original payload; it never aborts the run.
 */

use futures::stream::{self, StreamExt};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use crate::errors::ConfigError;
use crate::line_classifier::{ClassifiedLine, LineEnding};
use crate::providers::TranslationBackend;

use super::core::LogEntry;

/// Default size of the worker pool
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Largest worker pool a semaphore can represent
pub const MAX_CONCURRENCY: usize = Semaphore::MAX_PERMITS;

/// Check that a pool size is usable
pub fn check_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::InvalidConcurrency(concurrency));
    }
    Ok(())
}

/// How a translation unit ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// The provider answered
    Translated,
    /// The provider failed and the original payload was kept
    Fallback {
        /// Provider error summary
        reason: String,
    },
}

/// Result of one translatable line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    /// Index of the originating line
    pub line_index: usize,
    /// Translated payload, or the original one on failure
    pub payload: String,
    /// Whether the payload is a translation or a fallback
    pub outcome: TranslationOutcome,
}

/// Final text of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    /// Index of the line in the input
    pub line_index: usize,
    /// Line text including its terminator
    pub text: String,
}

/// Counters for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines in the document
    pub total_lines: usize,
    /// Lines sent to the provider
    pub translatable: usize,
    /// Units that came back translated
    pub translated: usize,
    /// Units that fell back to the original payload
    pub failed: usize,
}

/// Output of [`BoundedParallelTranslator::run`]
#[derive(Debug, Clone, Default)]
pub struct TranslationRun {
    /// Output lines ordered by line index
    pub lines: Vec<OutputLine>,
    /// Counters
    pub summary: RunSummary,
}

impl TranslationRun {
    /// Concatenate all output lines into the output file content
    pub fn to_text(&self) -> String {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }
}

/// Rebuild a translatable declaration with its new payload
pub fn render_translatable(key: &str, payload: &str, ending: LineEnding) -> String {
    format!("{} = \"{}\",{}", key, payload, ending.as_str())
}

/// Normalize a provider answer so it fits in a single quoted value
pub fn clean_translation(text: &str) -> String {
    text.replace('"', "")
        .lines()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Translates classified lines through a bounded pool of concurrent requests
pub struct BoundedParallelTranslator<B: TranslationBackend + ?Sized> {
    /// Backend used for every unit
    backend: Arc<B>,

    /// Maximum number of units in flight
    concurrency: usize,
}

impl<B: TranslationBackend + ?Sized> BoundedParallelTranslator<B> {
    /// Create a translator; a pool size of zero or above [`MAX_CONCURRENCY`] is rejected
    pub fn new(backend: Arc<B>, concurrency: usize) -> Result<Self, ConfigError> {
        check_concurrency(concurrency)?;
        Ok(Self { backend, concurrency })
    }

    /// Size of the worker pool
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Translate all translatable lines and return every line ordered by index
    pub async fn run(
        &self,
        lines: &[ClassifiedLine],
        source_language: &str,
        target_language: &str,
        log_capture: Arc<Mutex<Vec<LogEntry>>>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> TranslationRun {
        let units: Vec<(usize, &str)> = lines.iter()
            .filter_map(|line| match line {
                ClassifiedLine::Translatable { line_index, payload, .. } => Some((*line_index, payload.as_str())),
                ClassifiedLine::Passthrough { .. } => None,
            })
            .collect();

        let total_units = units.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let completed_units = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(units)
            .map(|(line_index, payload)| {
                let backend = Arc::clone(&self.backend);
                let semaphore = Arc::clone(&semaphore);
                let log_capture = Arc::clone(&log_capture);
                let completed_units = Arc::clone(&completed_units);
                let progress_callback = progress_callback.clone();

                async move {
                    // The semaphore is never closed, so acquisition only fails on shutdown
                    let _permit = semaphore.acquire().await.ok();

                    let result = match backend.translate(payload, source_language, target_language).await {
                        Ok(text) => TranslationResult {
                            line_index,
                            payload: clean_translation(&text),
                            outcome: TranslationOutcome::Translated,
                        },
                        Err(e) => {
                            debug!("Line {} kept untranslated: {}", line_index + 1, e);
                            log_capture.lock().push(LogEntry::warn(format!(
                                "Line {}: failed to translate \"{}\": {}",
                                line_index + 1, payload, e
                            )));
                            TranslationResult {
                                line_index,
                                payload: payload.to_string(),
                                outcome: TranslationOutcome::Fallback { reason: e.to_string() },
                            }
                        }
                    };

                    let current = completed_units.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_units);

                    result
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Self::merge(lines, results)
    }

    /// Splice results into their lines and order everything by line index
    fn merge(lines: &[ClassifiedLine], results: Vec<TranslationResult>) -> TranslationRun {
        let mut summary = RunSummary {
            total_lines: lines.len(),
            translatable: results.len(),
            ..RunSummary::default()
        };

        let mut by_index: HashMap<usize, TranslationResult> = HashMap::with_capacity(results.len());
        for result in results {
            match result.outcome {
                TranslationOutcome::Translated => summary.translated += 1,
                TranslationOutcome::Fallback { .. } => summary.failed += 1,
            }
            by_index.insert(result.line_index, result);
        }

        let mut output: Vec<OutputLine> = lines.iter()
            .map(|line| match line {
                ClassifiedLine::Passthrough { raw, line_index } => OutputLine {
                    line_index: *line_index,
                    text: raw.clone(),
                },
                ClassifiedLine::Translatable { key, payload, line_index, ending } => {
                    let payload = by_index.get(line_index).map_or(payload.as_str(), |r| r.payload.as_str());
                    OutputLine {
                        line_index: *line_index,
                        text: render_translatable(key, payload, *ending),
                    }
                }
            })
            .collect();

        output.sort_by_key(|line| line.line_index);

        TranslationRun { lines: output, summary }
    }
}
