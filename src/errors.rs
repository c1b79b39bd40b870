/*!
 * Error types for the subburn application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while decoding timestamps and cue files
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    /// A timestamp is not of the form `HH:MM:SS,mmm`
    #[error("Malformed timestamp: '{0}'")]
    MalformedTimestamp(String),

    /// A cue file does not follow the four-line block layout
    #[error("Malformed cue file at line {line}: {reason}")]
    MalformedCueFile {
        /// 1-based line number where the problem was detected
        line: usize,
        /// Human readable description
        reason: String,
    },
}

/// Errors that can occur when driving ffmpeg / ffprobe
#[derive(Error, Debug)]
pub enum MediaError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    /// The external tool could not be started
    #[error("Failed to execute {tool}: {message}")]
    SpawnFailed {
        /// Binary that failed to start
        tool: String,
        /// Underlying error message
        message: String,
    },

    /// The external tool exited with a non-zero status
    #[error("{tool} exited with error: {stderr}")]
    ProcessError {
        /// Binary that failed
        tool: String,
        /// Filtered stderr output
        stderr: String,
    },

    /// The external tool did not finish in time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        /// Binary that timed out
        tool: String,
        /// Timeout that was applied
        secs: u64,
    },

    /// ffprobe output could not be interpreted
    #[error("Failed to parse probe output: {0}")]
    ProbeParse(String),

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during transcription
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Audio file not found
    #[error("Audio file not found: {0}")]
    AudioNotFound(String),

    /// The transcription engine failed
    #[error("Transcription failed: {0}")]
    EngineFailed(String),

    /// The engine output could not be parsed
    #[error("Failed to parse transcript: {0}")]
    ParseError(String),

    /// Error from the external process layer
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error decoding captions
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from the media backend
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
