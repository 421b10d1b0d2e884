// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use dmtranslate::app_config::{self, Config, TranslationProvider};
use dmtranslate::app_controller::Controller;
use dmtranslate::file_utils::FileManager;
use dmtranslate::language_utils;
use dmtranslate::line_classifier::FormatErrorPolicy;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for FormatErrorPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFormatErrorPolicy {
    Skip,
    Abort,
}

impl From<CliFormatErrorPolicy> for FormatErrorPolicy {
    fn from(policy: CliFormatErrorPolicy) -> Self {
        match policy {
            CliFormatErrorPolicy::Skip => FormatErrorPolicy::Skip,
            CliFormatErrorPolicy::Abort => FormatErrorPolicy::Abort,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the dialogue entries of a file (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for dmtranslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input key/value text file
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file (default: next to the input, named after the target language)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language, code or English name (e.g. 'en', 'English')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language, code or English name (e.g. 'ko', 'Korean')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Number of concurrent translation requests
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// API key for the provider
    #[arg(long, env = "DMTRANSLATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// What to do with marked lines that have no '='
    #[arg(long, value_enum)]
    on_format_error: Option<CliFormatErrorPolicy>,

    /// Classify the input and report counts without translating
    #[arg(long)]
    dry_run: bool,
}

/// dmtranslate - translate UI dialogue entries with AI
///
/// Reads a key/value text file, translates every `UI_DM` entry that is not
/// commented out, and writes the file back with all other lines untouched.
#[derive(Parser, Debug)]
#[command(name = "dmtranslate")]
#[command(version)]
#[command(about = "AI-powered translation of UI dialogue files")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "dmtranslate translates the values of UI dialogue entries (KEY = \"value\",) using AI providers.

EXAMPLES:
    dmtranslate UI_EN.txt                         # Writes UI_KO.txt using conf.json
    dmtranslate UI_EN.txt -o out/UI_JA.txt -t ja  # Translate to Japanese
    dmtranslate -p anthropic -j 5 UI_EN.txt       # Use Anthropic with 5 workers
    dmtranslate --dry-run UI_EN.txt               # Only count translatable lines
    dmtranslate completions bash > dmtranslate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. API keys can be given with --api-key,
    DMTRANSLATE_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Colored stderr logger
struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(StderrLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install the logger at the most verbose level; the effective level is set after loading config
    StderrLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dmtranslate", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(policy) = &options.on_format_error {
        config.classifier.format_error_policy = policy.clone().into();
    }

    let provider_env = match config.translation.provider {
        TranslationProvider::OpenAI => Some("OPENAI_API_KEY"),
        TranslationProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
        TranslationProvider::LMStudio => None,
    };

    let provider_config = config.translation.active_provider_config_mut();
    if let Some(model) = &options.model {
        provider_config.model = model.clone();
    }
    if let Some(concurrency) = options.concurrency {
        provider_config.concurrent_requests = concurrency;
    }
    if let Some(api_key) = &options.api_key {
        provider_config.api_key = api_key.clone();
    } else if provider_config.api_key.is_empty() {
        if let Some(key) = provider_env.and_then(|name| std::env::var(name).ok()) {
            provider_config.api_key = key;
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let input_path = options.input_path.clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required"))?;

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if options.dry_run {
        controller.dry_run(&input_path)?;
        return Ok(());
    }

    let output_path = match &options.output {
        Some(path) => path.clone(),
        None => {
            let config = controller.config();
            let source_code = language_utils::file_code(&config.source_language)
                .unwrap_or_else(|| config.source_language.clone());
            let target_code = language_utils::file_code(&config.target_language)
                .unwrap_or_else(|| config.target_language.clone());
            FileManager::generate_output_path(&input_path, &source_code, &target_code)
        }
    };

    let report = controller.run(&input_path, &output_path).await?;
    info!("{} translated, {} kept untranslated, {} malformed lines passed through",
        report.summary.translated, report.summary.failed, report.format_errors);

    Ok(())
}
