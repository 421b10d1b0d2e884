use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::line_classifier::ClassifiedDocument;
use crate::providers::TranslationBackend;
use crate::translation::{BoundedParallelTranslator, LogEntry, RunSummary, TranslationService};

// @module: Application controller for file translation

/// Name of the diagnostics file written next to the output
pub const ISSUES_LOG_FILE: &str = "dmtranslate.issues.log";

/// Outcome of a finished translation run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the translated file was written
    pub output_path: PathBuf,
    /// Unit counters
    pub summary: RunSummary,
    /// Marked lines without `=` that were passed through
    pub format_errors: usize,
    /// Diagnostics captured during the run
    pub logs: Vec<LogEntry>,
    /// Wall time of the translation stage
    pub elapsed: Duration,
}

/// Main application controller for file translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Configuration used by this controller
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate `input_file` into `output_file` with the configured provider
    pub async fn run(&self, input_file: &Path, output_file: &Path) -> Result<RunReport> {
        self.config.validate().context("Configuration validation failed")?;

        let service = TranslationService::new(self.config.translation.clone())?;
        info!("dmtranslate: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model());

        self.run_with_backend(input_file, output_file, Arc::new(service)).await
    }

    /// Translate `input_file` into `output_file` with an explicit backend
    ///
    /// Every configuration problem is reported before the first request is sent.
    pub async fn run_with_backend<B: TranslationBackend + ?Sized>(
        &self,
        input_file: &Path,
        output_file: &Path,
        backend: Arc<B>,
    ) -> Result<RunReport> {
        let translator = BoundedParallelTranslator::new(backend, self.config.translation.get_concurrent_requests())?;
        let source_language = language_utils::resolve_language_name(&self.config.source_language)?;
        let target_language = language_utils::resolve_language_name(&self.config.target_language)?;

        let raw_lines = FileManager::read_lines(input_file)?;
        FileManager::ensure_writable(output_file)?;

        let document = self.classify(&raw_lines)?;
        let log_capture = Arc::new(Mutex::new(Vec::new()));
        for skipped in &document.skipped {
            warn!("{}", skipped);
            log_capture.lock().push(LogEntry::warn(skipped.to_string()));
        }

        let translatable = document.translatable_count();
        info!("{} of {} lines selected for translation ({} -> {}, {} workers)",
            translatable, raw_lines.len(), source_language, target_language, translator.concurrency());

        let progress_bar = ProgressBar::new(translatable as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let start_time = Instant::now();
        let pb = progress_bar.clone();
        let run = translator.run(
            &document.lines,
            &source_language,
            &target_language,
            Arc::clone(&log_capture),
            move |completed, _total| {
                pb.set_position(completed as u64);
            },
        ).await;
        let elapsed = start_time.elapsed();

        // Diagnostics are printed only once the bar is gone
        progress_bar.finish_and_clear();

        FileManager::write_to_file(output_file, &run.to_text())?;

        let logs = log_capture.lock().clone();
        self.report_issues(&logs, output_file);

        if run.summary.failed > 0 {
            info!("Translation completed with {} untranslated lines.", run.summary.failed);
        }
        info!("Translated {} lines in {}.", run.summary.translated, Self::format_duration(elapsed));
        info!("Success: {}", output_file.display());

        Ok(RunReport {
            output_path: output_file.to_path_buf(),
            summary: run.summary,
            format_errors: document.skipped.len(),
            logs,
            elapsed,
        })
    }

    /// Classify the input without translating anything
    pub fn dry_run(&self, input_file: &Path) -> Result<ClassifiedDocument> {
        let raw_lines = FileManager::read_lines(input_file)?;
        let document = self.classify(&raw_lines)?;

        for skipped in &document.skipped {
            warn!("{}", skipped);
        }
        info!("{} of {} lines would be translated, {} malformed lines passed through",
            document.translatable_count(), raw_lines.len(), document.skipped.len());

        Ok(document)
    }

    fn classify(&self, raw_lines: &[String]) -> Result<ClassifiedDocument> {
        self.config.classifier.validate()?;
        let classifier = self.config.classifier.build();
        let document = classifier
            .classify_all(raw_lines, self.config.classifier.format_error_policy)
            .context("Input contains a malformed translatable line")?;
        Ok(document)
    }

    fn report_issues(&self, logs: &[LogEntry], output_file: &Path) {
        if logs.is_empty() {
            return;
        }

        let error_logs = logs.iter().filter(|log| log.level == "ERROR").count();
        let warning_logs = logs.iter().filter(|log| log.level == "WARN").count();
        info!("{} errors and {} warnings during translation.", error_logs, warning_logs);

        if log::max_level() >= log::LevelFilter::Debug {
            for log in logs {
                match log.level.as_str() {
                    "ERROR" => error!("{}", log.message),
                    "WARN" => warn!("{}", log.message),
                    _ => debug!("{}", log.message),
                }
            }
        }

        let log_file_path = output_file
            .parent()
            .unwrap_or(Path::new(""))
            .join(ISSUES_LOG_FILE);
        let context = format!("{} - {} ({})",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

        if let Err(e) = Self::write_logs_to_file(logs, &log_file_path, &context) {
            warn!("Failed to write logs to file: {}", e);
        } else {
            info!("Logs written to {}", log_file_path.display());
        }
    }

    /// Write translation logs to a log file
    fn write_logs_to_file(logs: &[LogEntry], file_path: &Path, translation_context: &str) -> Result<()> {
        let mut log_content = String::new();

        log_content.push_str(&format!("Translation Log - {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
        log_content.push_str(&format!("Context: {}\n\n", translation_context));

        for entry in logs {
            log_content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        FileManager::write_to_file(file_path, &log_content)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
