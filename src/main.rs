// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subburn::app_config::{Config, LogLevel};
use subburn::file_utils::{FileManager, FileType};
use subburn::job::Job;
use subburn::overlay::{FrameSize, StyleRequest};
use subburn::transcript::Transcript;
use subburn::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Caption style presets. Unknown values fall back to defaults.
#[derive(Args, Debug, Clone, Default)]
struct StyleArgs {
    /// Caption size: small, medium or large
    #[arg(long)]
    font_size: Option<String>,

    /// Outline colour (e.g. black, white, red, blue)
    #[arg(long)]
    stroke_color: Option<String>,

    /// Outline width in pixels
    #[arg(long)]
    stroke_width: Option<String>,

    /// Render captions half transparent
    #[arg(long)]
    transparent: bool,

    /// Letter spacing: normal, wide, wider or widest
    #[arg(long)]
    letter_spacing: Option<String>,

    /// Line spacing: normal, wide, wider or widest
    #[arg(long)]
    line_spacing: Option<String>,

    /// Font file to render with
    #[arg(long)]
    font: Option<String>,
}

impl From<StyleArgs> for StyleRequest {
    fn from(args: StyleArgs) -> Self {
        StyleRequest {
            font_size: args.font_size,
            stroke_color: args.stroke_color,
            stroke_width: args.stroke_width,
            transparent: args.transparent,
            letter_spacing: args.letter_spacing,
            line_spacing: args.line_spacing,
            font: args.font,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe a video (or every video in a directory) into a new job
    Process {
        /// Input video file or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Burn the captions in right after segmentation
        #[arg(short, long)]
        render: bool,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Cut a transcript JSON file into a cue file
    Segment {
        /// Word-timed transcript JSON
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        /// Output cue file (defaults to the transcript path with .srt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum cue duration in seconds
        #[arg(long)]
        max_duration: Option<f64>,
    },

    /// Print the overlay plan of a cue file as JSON
    Plan {
        /// Cue file to plan
        #[arg(value_name = "CUE_FILE")]
        cue_file: PathBuf,

        /// Frame width in pixels
        #[arg(long)]
        width: u32,

        /// Frame height in pixels
        #[arg(long)]
        height: u32,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Burn the captions of an existing job into output_video.mp4
    Render {
        /// Job directory created by `process`
        #[arg(value_name = "JOB_DIR")]
        job_dir: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Generate shell completions for subburn
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subburn - burned-in captions from word-level transcripts
#[derive(Parser, Debug)]
#[command(name = "subburn")]
#[command(version)]
#[command(about = "Transcribe videos and burn styled captions into them")]
#[command(long_about = "subburn transcribes a video with word timestamps, cuts the words into short caption cues and renders them into a new video.

EXAMPLES:
    subburn process clip.mp4                          # Transcribe and write subtitles.srt in a new job
    subburn process -r --font-size large clip.mp4     # Transcribe and render in one go
    subburn render videos/<job-id> --transparent      # Re-render an existing job with another style
    subburn segment transcript.json -o clip.srt       # Cue file from a transcript
    subburn plan clip.srt --width 1080 --height 1920  # Inspect the overlay plan
    subburn completions bash > subburn.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
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
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI colour code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
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
    // Info by default; the config or --log-level may change it below
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subburn", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Process { input_path, render, style } => {
            let controller = Controller::with_config(config)?;
            let style = controller.resolve_style(&style.into());

            if input_path.is_dir() {
                let summary = controller.run_folder(&input_path, render.then_some(&style)).await?;
                if !summary.failures.is_empty() {
                    return Err(anyhow!("{} of {} videos failed", summary.failures.len(), summary.failures.len() + summary.jobs.len()));
                }
            } else if input_path.is_file() {
                let job = controller.process_video(&input_path).await?;
                info!("Job directory: {}", job.dir.display());
                if render {
                    let output = controller.render_job(&job, &style).await?;
                    info!("Success: {}", output.display());
                }
            } else {
                return Err(anyhow!("Input path does not exist: {:?}", input_path));
            }
        }
        Commands::Segment { transcript, output, max_duration } => {
            if let Some(max_duration) = max_duration {
                config.segmentation.max_segment_duration = max_duration;
            }
            if FileManager::detect_file_type(&transcript)? != FileType::Transcript {
                return Err(anyhow!("Not a transcript JSON file: {:?}", transcript));
            }

            let controller = Controller::with_config(config)?;
            let output = output.unwrap_or_else(|| transcript.with_extension("srt"));
            let parsed = Transcript::from_file(&transcript)?;
            let cue_file = controller.write_cues(&parsed, &output)?;
            info!("Success: {} ({} cues)", output.display(), cue_file.cues.len());
        }
        Commands::Plan { cue_file, width, height, style } => {
            let controller = Controller::with_config(config)?;
            let style = controller.resolve_style(&style.into());
            let plan = controller.plan_cue_file(&cue_file, FrameSize::new(width, height), &style)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Render { job_dir, style } => {
            let controller = Controller::with_config(config)?;
            let style = controller.resolve_style(&style.into());
            let job = Job::open(&job_dir)?;
            let output = controller.render_job(&job, &style).await?;
            info!("Success: {}", output.display());
        }
        Commands::Completions { .. } => unreachable!("handled before configuration is loaded"),
    }

    Ok(())
}
