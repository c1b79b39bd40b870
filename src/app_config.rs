use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::overlay::{StyleRequest, DEFAULT_FONT_FILE};
use crate::segmenter::DEFAULT_MAX_SEGMENT_DURATION;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Cue segmentation settings
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Speech-to-text settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// ffmpeg / ffprobe settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Caption style used when the command line gives none
    #[serde(default)]
    pub default_style: StyleRequest,

    /// Root directory holding one sub-directory per job
    #[serde(default = "default_jobs_dir")]
    pub jobs_dir: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Cue segmentation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SegmentationConfig {
    /// Upper bound of a cue's span in seconds
    #[serde(default = "default_max_segment_duration")]
    pub max_segment_duration: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_segment_duration: default_max_segment_duration(),
        }
    }
}

/// Speech-to-text settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    // @field: Whisper executable
    #[serde(default = "default_whisper_command")]
    pub command: String,

    // @field: Whisper model name
    #[serde(default = "default_whisper_model")]
    pub model: String,

    // @field: Spoken language, detected when absent
    #[serde(default)]
    pub language: Option<String>,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            command: default_whisper_command(),
            model: default_whisper_model(),
            language: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Video tool settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    // @field: ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    // @field: Font used when the style selects none
    #[serde(default = "default_font")]
    pub default_font: PathBuf,

    // @field: Output frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            default_font: default_font(),
            fps: default_fps(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_max_segment_duration() -> f64 {
    DEFAULT_MAX_SEGMENT_DURATION
}

fn default_whisper_command() -> String {
    "whisper".to_string()
}

fn default_whisper_model() -> String {
    "base".to_string()
}

fn default_timeout_secs() -> u64 {
    3600
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_font() -> PathBuf {
    PathBuf::from(DEFAULT_FONT_FILE)
}

fn default_fps() -> u32 {
    30
}

fn default_jobs_dir() -> PathBuf {
    PathBuf::from("videos")
}

impl Config {
    /// Load the configuration at `path`, or write and return the defaults
    /// when the file does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let max = self.segmentation.max_segment_duration;
        if !max.is_finite() || max <= 0.0 {
            return Err(anyhow!("max_segment_duration must be a positive number of seconds, got {}", max));
        }

        if self.transcription.command.trim().is_empty() {
            return Err(anyhow!("Transcription command must not be empty"));
        }

        if self.render.ffmpeg_path.trim().is_empty() || self.render.ffprobe_path.trim().is_empty() {
            return Err(anyhow!("ffmpeg and ffprobe paths must not be empty"));
        }

        if self.render.fps == 0 {
            return Err(anyhow!("Output fps must be greater than zero"));
        }

        if self.jobs_dir.as_os_str().is_empty() {
            return Err(anyhow!("jobs_dir must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            segmentation: SegmentationConfig::default(),
            transcription: TranscriptionConfig::default(),
            render: RenderConfig::default(),
            default_style: StyleRequest::default(),
            jobs_dir: default_jobs_dir(),
            log_level: LogLevel::default(),
        }
    }
}
