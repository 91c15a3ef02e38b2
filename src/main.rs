// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::media::pexels::Pexels;
use crate::media::resolver::ResolverOptions;
use crate::pipeline::ScenePipeline;
use crate::providers::ModelClient;
use crate::providers::gemini::{Gemini, GenerationConfig};

mod analysis;
mod app_config;
mod errors;
mod media;
mod pipeline;
mod providers;
mod script_processor;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a script file and resolve stock media for each scene (default command)
    Analyze(AnalyzeArgs),

    /// Generate shell completions for scenestock
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Script JSON file to process
    #[arg(value_name = "SCRIPT_PATH")]
    script_path: PathBuf,

    /// Model name to use for analysis
    #[arg(short, long)]
    model: Option<String>,

    /// Write the result JSON to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the result JSON
    #[arg(long)]
    pretty: bool,

    /// Result count requested per media query
    #[arg(long)]
    per_query_limit: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Only test the model connection and exit
    #[arg(long)]
    check: bool,
}

/// scenestock - Scene Analysis & Stock Media Resolution
///
/// Analyzes a structured video script with a generative model and resolves
/// each scene's media suggestions into stock photos and videos.
#[derive(Parser, Debug)]
#[command(name = "scenestock")]
#[command(version = "1.0.0")]
#[command(about = "AI scene analysis and stock media resolution")]
#[command(long_about = "scenestock reads a script JSON document (an ordered list of scenes), derives
per-scene keywords and media suggestions with a generative model, and resolves
the suggestions into concrete stock media items.

EXAMPLES:
    scenestock script.json                      # Analyze using default config
    scenestock -m gemini-2.0-flash script.json  # Use a specific model
    scenestock -o result.json --pretty script.json
    scenestock --log-level debug script.json
    scenestock completions bash > scenestock.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. API keys can also come from the GEMINI_API_KEY
    and PEXELS_API_KEY environment variables.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script JSON file to process
    #[arg(value_name = "SCRIPT_PATH")]
    script_path: Option<PathBuf>,

    /// Model name to use for analysis
    #[arg(short, long)]
    model: Option<String>,

    /// Write the result JSON to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the result JSON
    #[arg(long)]
    pretty: bool,

    /// Result count requested per media query
    #[arg(long)]
    per_query_limit: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Only test the model connection and exit
    #[arg(long)]
    check: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "scenestock", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Analyze(args)) => run_analyze(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let script_path = cli
                .script_path
                .ok_or_else(|| anyhow!("SCRIPT_PATH is required when no subcommand is specified"))?;

            let analyze_args = AnalyzeArgs {
                script_path,
                model: cli.model,
                output: cli.output,
                pretty: cli.pretty,
                per_query_limit: cli.per_query_limit,
                config_path: cli.config_path,
                log_level: cli.log_level,
                check: cli.check,
            };
            run_analyze(analyze_args).await
        }
    }
}

async fn run_analyze(options: AnalyzeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    let mut config = load_config(&options)?;

    config.resolve_credentials();
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Construct the collaborators
    let model: Arc<dyn ModelClient> = Arc::new(
        Gemini::new(
            &config.model.api_key,
            &config.model.model,
            &config.model.endpoint,
            config.model.timeout_secs,
        )
        .with_generation_config(GenerationConfig {
            temperature: Some(config.model.temperature),
            max_output_tokens: Some(config.model.max_output_tokens),
        }),
    );

    if options.check {
        model
            .test_connection()
            .await
            .map_err(|e| anyhow!("Model connection test failed: {}", e))?;
        println!("Model connection OK ({})", config.model.model);
        return Ok(());
    }

    let media_provider = Arc::new(Pexels::new(
        &config.media.api_key,
        &config.media.endpoint,
        config.media.timeout_secs,
    ));

    let resolver_options = ResolverOptions {
        concurrent_requests: config.pipeline.concurrent_requests,
        per_query_limit: config.media.per_query_limit,
        resolve_timeout: std::time::Duration::from_secs(config.pipeline.resolve_timeout_secs),
    };

    let pipeline = ScenePipeline::new(model, media_provider, resolver_options);

    // Read the script and run the pipeline
    let script_bytes = std::fs::read(&options.script_path)
        .context(format!("Failed to read script file: {:?}", options.script_path))?;

    let result = match pipeline.run(&script_bytes).await {
        Ok(result) => result,
        Err(e) => {
            // Distinct exit codes: bad input vs upstream failure
            let code = match &e {
                AppError::Validation(_) => 2,
                _ => 1,
            };
            log::error!("{}", e);
            std::process::exit(code);
        }
    };

    let json = if options.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match &options.output {
        Some(path) => {
            std::fs::write(path, &json)
                .context(format!("Failed to write output file: {:?}", path))?;
            log::info!("Result written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Load the configuration file, creating a default one when absent, and
/// apply CLI overrides.
fn load_config(options: &AnalyzeArgs) -> Result<Config> {
    let config_path = &options.config_path;

    let mut config = if Path::new(config_path).exists() {
        let content = std::fs::read_to_string(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        serde_json::from_str::<Config>(&content)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.model.model = model.clone();
    }

    if let Some(limit) = options.per_query_limit {
        config.media.per_query_limit = limit;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
