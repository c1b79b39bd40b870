use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// @module: Word-timed transcript model consumed by the segmenter

/// A single recognised word with its timing in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Token text exactly as the engine produced it, leading space included
    #[serde(rename = "word")]
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A contiguous run of words as grouped by the recognition engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment start in seconds
    pub start: f64,

    /// Ordered words of the segment
    #[serde(default)]
    pub words: Vec<Word>,
}

impl TranscriptSegment {
    pub fn new(start: f64, words: Vec<Word>) -> Self {
        Self { start, words }
    }
}

/// Full transcription result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Plain text of the whole recording
    #[serde(default)]
    pub text: String,

    /// Detected or requested language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Ordered segments
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Parse engine JSON output; unknown fields are ignored
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse transcript JSON")
    }

    /// Load a transcript JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid transcript file: {}", path.display()))
    }

    /// Plain text of the transcript. Falls back to joining the word tokens when
    /// the engine did not report a top-level text.
    pub fn full_text(&self) -> String {
        if !self.text.trim().is_empty() {
            return self.text.trim().to_string();
        }

        self.segments
            .iter()
            .flat_map(|segment| segment.words.iter())
            .map(|word| word.text.as_str())
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Total number of words across all segments
    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|segment| segment.words.len()).sum()
    }
}
