// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::markdown::StripPolicy;
use crate::segmenter::SegmentPolicy;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod markdown;
mod media;
mod numbers;
mod segmenter;
mod synth;
mod timeline;

/// CLI wrapper for StripPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStripPolicy {
    Flatten,
    PreserveLines,
}

impl From<CliStripPolicy> for StripPolicy {
    fn from(cli: CliStripPolicy) -> Self {
        match cli {
            CliStripPolicy::Flatten => StripPolicy::Flatten,
            CliStripPolicy::PreserveLines => StripPolicy::PreserveLines,
        }
    }
}

/// CLI wrapper for SegmentPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSegmentPolicy {
    Punctuation,
    Lines,
}

impl From<CliSegmentPolicy> for SegmentPolicy {
    fn from(cli: CliSegmentPolicy) -> Self {
        match cli {
            CliSegmentPolicy::Punctuation => SegmentPolicy::Punctuation,
            CliSegmentPolicy::Lines => SegmentPolicy::Lines,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
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
    /// Narrate a Markdown document into audio and subtitles (default command)
    #[command(alias = "narrate")]
    Narrate(NarrateArgs),

    /// Generate shell completions for vorleser
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct NarrateArgs {
    /// Input document file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Voice identifier for the synthesis engine
    #[arg(short, long)]
    voice: Option<String>,

    /// Markdown stripping policy
    #[arg(long, value_enum)]
    strip_policy: Option<CliStripPolicy>,

    /// Sentence segmentation policy
    #[arg(long, value_enum)]
    segment_policy: Option<CliSegmentPolicy>,

    /// Also render a fixed-background video
    #[arg(long)]
    video: bool,

    /// Directory artifacts are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Custom output base name (default: first heading + timestamp)
    #[arg(short, long)]
    base_name: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// vorleser - read your Markdown out loud
///
/// Turns a Markdown document into a narrated German audio track, a SubRip
/// subtitle file timed to the rendered audio, and plain-text sidecars for
/// proofreading.
#[derive(Parser, Debug)]
#[command(name = "vorleser")]
#[command(version = "0.1.0")]
#[command(about = "Markdown narration with synchronized subtitles")]
#[command(long_about = "vorleser strips Markdown structure, expands numerals into German words,
hands the normalized text to a speech-synthesis engine, and times a SubRip
subtitle file against the measured audio duration.

EXAMPLES:
    vorleser text.md                          # Narrate using default config
    vorleser -f text.md                       # Force overwrite existing files
    vorleser --video text.md                  # Also render a black-background MP4
    vorleser --strip-policy preserve-lines --segment-policy lines text.md
    vorleser -v de -o out/ text.md            # Pick voice and output directory
    vorleser --log-level debug docs/          # Narrate a whole directory
    vorleser completions bash > vorleser.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input document file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Voice identifier for the synthesis engine
    #[arg(short, long)]
    voice: Option<String>,

    /// Markdown stripping policy
    #[arg(long, value_enum)]
    strip_policy: Option<CliStripPolicy>,

    /// Sentence segmentation policy
    #[arg(long, value_enum)]
    segment_policy: Option<CliSegmentPolicy>,

    /// Also render a fixed-background video
    #[arg(long)]
    video: bool,

    /// Directory artifacts are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Custom output base name (default: first heading + timestamp)
    #[arg(short, long)]
    base_name: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
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
    // Initialize the logger once with info level by default; the level is
    // updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vorleser", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Narrate(args)) => run_narrate(args).await,
        None => {
            // Default behavior - use top-level args for direct invocation
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let narrate_args = NarrateArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                voice: cli.voice,
                strip_policy: cli.strip_policy,
                segment_policy: cli.segment_policy,
                video: cli.video,
                output_dir: cli.output_dir,
                base_name: cli.base_name,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_narrate(narrate_args).await
        }
    }
}

async fn run_narrate(options: NarrateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader)
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
    if let Some(voice) = &options.voice {
        config.voice = voice.clone();
    }
    if let Some(strip_policy) = &options.strip_policy {
        config.strip_policy = strip_policy.clone().into();
    }
    if let Some(segment_policy) = &options.segment_policy {
        config.segment_policy = segment_policy.clone().into();
    }
    if options.video {
        config.video.enabled = true;
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller
            .run(
                options.input_path.clone(),
                options.base_name.as_deref(),
                options.force_overwrite,
            )
            .await
    } else if options.input_path.is_dir() {
        controller
            .run_folder(options.input_path.clone(), options.force_overwrite)
            .await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
