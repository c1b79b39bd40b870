use async_trait::async_trait;
use log::{debug, error, info};
use serde_json::{from_str, Value};
use std::ffi::OsString;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::RenderConfig;
use crate::errors::MediaError;
use crate::overlay::{FrameSize, OverlayCue};

// @module: Video/audio collaborator driven through ffmpeg and ffprobe

/// Name of the filter script written next to the rendered video
pub const FILTER_SCRIPT_NAME: &str = "overlays.filter";

/// Average advance of an upper-case bold glyph relative to its font size
const AVERAGE_GLYPH_WIDTH: f64 = 0.6;

/// Operations the caption pipeline needs from a media toolkit
#[async_trait]
pub trait MediaBackend: Send + Sync + Debug {
    /// Write the audio track of `video` to `audio_out`
    async fn extract_audio(&self, video: &Path, audio_out: &Path) -> Result<(), MediaError>;

    /// Report the frame size of the first video stream
    async fn probe_frame_size(&self, video: &Path) -> Result<FrameSize, MediaError>;

    /// Composite the overlays over `video`, in plan order, and encode to `output`
    async fn burn_captions(&self, video: &Path, plan: &[OverlayCue], output: &Path) -> Result<(), MediaError>;
}

/// ffmpeg / ffprobe implementation of [`MediaBackend`]
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg_path: String,
    ffprobe_path: String,
    fps: u32,
    timeout: Duration,
}

impl FfmpegBackend {
    pub fn new(ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>, fps: u32, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            fps,
            timeout,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.ffmpeg_path.clone(),
            config.ffprobe_path.clone(),
            config.fps,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

/// Run an external tool, failing on timeout or non-zero exit
pub(crate) async fn run_external(tool: &str, args: Vec<OsString>, timeout: Duration) -> Result<Output, MediaError> {
    debug!("Running {} {:?}", tool, args);

    let future = Command::new(tool).args(&args).kill_on_drop(true).output();

    let output = tokio::select! {
        result = future => {
            result.map_err(|e| MediaError::SpawnFailed {
                tool: tool.to_string(),
                message: e.to_string(),
            })?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(MediaError::Timeout {
                tool: tool.to_string(),
                secs: timeout.as_secs(),
            });
        }
    };

    if !output.status.success() {
        let stderr = filter_ffmpeg_stderr(&String::from_utf8_lossy(&output.stderr));
        error!("{} failed: {}", tool, stderr);
        return Err(MediaError::ProcessError {
            tool: tool.to_string(),
            stderr,
        });
    }

    Ok(output)
}

fn require_input(path: &Path) -> Result<(), MediaError> {
    if !path.exists() {
        return Err(MediaError::InputNotFound(path.display().to_string()));
    }
    Ok(())
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn extract_audio(&self, video: &Path, audio_out: &Path) -> Result<(), MediaError> {
        require_input(video)?;

        let args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(), video.into(),
            "-vn".into(),
            "-acodec".into(), "libmp3lame".into(),
            "-q:a".into(), "2".into(),
            audio_out.into(),
        ];
        run_external(&self.ffmpeg_path, args, self.timeout).await?;

        info!("Audio extracted to {}", audio_out.display());
        Ok(())
    }

    async fn probe_frame_size(&self, video: &Path) -> Result<FrameSize, MediaError> {
        require_input(video)?;

        let args: Vec<OsString> = vec![
            "-v".into(), "quiet".into(),
            "-print_format".into(), "json".into(),
            "-show_streams".into(),
            "-select_streams".into(), "v:0".into(),
            video.into(),
        ];
        let output = run_external(&self.ffprobe_path, args, self.timeout).await?;

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn burn_captions(&self, video: &Path, plan: &[OverlayCue], output: &Path) -> Result<(), MediaError> {
        require_input(video)?;

        let script_dir = output.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        let script_path = script_dir.join(FILTER_SCRIPT_NAME);
        tokio::fs::write(&script_path, build_filter_graph(plan)).await?;

        let args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(), video.into(),
            "-filter_script:v".into(), script_path.into(),
            "-map".into(), "0:v:0".into(),
            "-map".into(), "0:a?".into(),
            "-r".into(), self.fps.to_string().into(),
            "-c:v".into(), "libx264".into(),
            "-pix_fmt".into(), "yuv420p".into(),
            "-c:a".into(), "aac".into(),
            output.into(),
        ];
        run_external(&self.ffmpeg_path, args, self.timeout).await?;

        info!("Rendered {} captions into {}", plan.len(), output.display());
        Ok(())
    }
}

/// Extract the frame size from `ffprobe -print_format json -show_streams`
pub fn parse_probe_output(stdout: &str) -> Result<FrameSize, MediaError> {
    let json: Value = from_str(stdout).map_err(|e| MediaError::ProbeParse(e.to_string()))?;

    let stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| streams.first())
        .ok_or_else(|| MediaError::ProbeParse("no video stream found".to_string()))?;

    let dimension = |key: &str| {
        stream
            .get(key)
            .and_then(|v| v.as_u64())
            .filter(|v| *v > 0)
            .map(|v| v as u32)
            .ok_or_else(|| MediaError::ProbeParse(format!("missing stream {}", key)))
    };

    Ok(FrameSize::new(dimension("width")?, dimension("height")?))
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Escape a value for a filter option (`key=value` level)
fn escape_option_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '\'' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape an already option-escaped value for the filtergraph level
fn escape_graph_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '\'' | '[' | ']' | ',' | ';') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Both escaping levels a drawtext argument passes through
pub fn escape_filter_arg(raw: &str) -> String {
    escape_graph_value(&escape_option_value(raw))
}

/// Greedy word wrap on an estimated glyph advance. drawtext neither wraps nor
/// tracks letters, so letter spacing only widens the estimate.
pub fn wrap_text(text: &str, font_size_px: u32, letter_spacing: f64, max_width_px: u32) -> Vec<String> {
    let advance = font_size_px as f64 * AVERAGE_GLYPH_WIDTH + letter_spacing;
    let max_chars = if advance > 0.0 {
        ((max_width_px as f64 / advance).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// One drawtext filter per wrapped line, each horizontally centred and shown
/// only inside its cue's window. Filters are chained in plan order so later
/// captions stack above earlier ones.
pub fn build_filter_graph(plan: &[OverlayCue]) -> String {
    let mut filters = Vec::new();

    for overlay in plan {
        let lines = wrap_text(
            &overlay.text,
            overlay.font_size_px,
            overlay.letter_spacing,
            overlay.position.max_width_px,
        );
        let line_advance = overlay.font_size_px as f64 + overlay.line_spacing;
        let enable = format!(
            "between(t,{:.3},{:.3})",
            overlay.start_seconds, overlay.end_seconds
        );

        for (i, line) in lines.iter().enumerate() {
            let y = overlay.position.top_px + i as f64 * line_advance;
            filters.push(format!(
                "drawtext=fontfile={}:text={}:expansion=none:fontsize={}:fontcolor={}:borderw={}:bordercolor={}:x=(w-text_w)/2:y={:.2}:enable={}",
                escape_filter_arg(&overlay.font_file.to_string_lossy()),
                escape_filter_arg(line),
                overlay.font_size_px,
                escape_filter_arg(&overlay.color),
                overlay.stroke_width_px,
                escape_filter_arg(&overlay.stroke_color),
                y,
                escape_filter_arg(&enable),
            ));
        }
    }

    if filters.is_empty() {
        return "null".to_string();
    }
    filters.join(",")
}
