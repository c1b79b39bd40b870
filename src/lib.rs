/*!
 * # subburn - burned-in captions from word-level transcripts
 *
 * A Rust library that turns a video into a new video with styled captions
 * burned into the picture.
 *
 * ## Features
 *
 * - Extract the audio track and transcribe it with word timestamps (Whisper)
 * - Cut the word stream into short, duration-bounded caption cues
 * - Write and read cues in the numbered `HH:MM:SS,mmm --> HH:MM:SS,mmm` format
 * - Resolve loose style presets (size, stroke, spacing, font) into exact
 *   per-caption overlay parameters
 * - Composite the captions with ffmpeg
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timestamp`: Seconds to `HH:MM:SS,mmm` and back
 * - `transcript`: Word-timed transcript model
 * - `segmenter`: Transcript segments to caption cues
 * - `cue_file`: Cue file reading and writing
 * - `overlay`: Caption style resolution and overlay planning
 * - `media`: ffmpeg / ffprobe backend
 * - `transcriber`: Speech-to-text backend
 * - `job`: Per-job working directory layout
 * - `app_config`: Configuration management
 * - `app_controller`: Pipeline orchestration
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cue_file;
pub mod errors;
pub mod file_utils;
pub mod job;
pub mod media;
pub mod overlay;
pub mod segmenter;
pub mod timestamp;
pub mod transcriber;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use cue_file::{Cue, CueFile};
pub use errors::{AppError, CaptionError, MediaError, TranscriptionError};
pub use overlay::{FrameSize, OverlayCue, OverlayPlanner, StyleConfig, StyleRequest};
pub use segmenter::{CueCounter, Segmenter};
pub use transcript::{Transcript, TranscriptSegment, Word};
