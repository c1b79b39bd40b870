use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::CaptionError;
use crate::timestamp;

// @module: Numbered cue file reading and writing

/// Separator between the two timestamps of a timing line
pub const TIMING_SEPARATOR: &str = " --> ";

/// Every cue occupies exactly this many lines: index, timing, text, blank
const LINES_PER_CUE: usize = 4;

// @struct: Single caption cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    // @field: 1-based position in the file
    pub index: usize,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Caption text, one line
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the display window in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Start time as a cue file timestamp
    pub fn format_start_time(&self) -> String {
        timestamp::encode(self.start)
    }

    /// End time as a cue file timestamp
    pub fn format_end_time(&self) -> String {
        timestamp::encode(self.end)
    }

    /// Text as it is written to the file: trimmed, with any embedded line
    /// breaks folded into spaces so the block stays four lines long
    fn file_text(&self) -> String {
        self.text
            .trim()
            .split(&['\r', '\n'][..])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}{}{}", self.format_start_time(), TIMING_SEPARATOR, self.format_end_time())?;
        writeln!(f, "{}", self.file_text())?;
        writeln!(f)
    }
}

/// Serialize cues in order, four lines per cue
pub fn encode_cues(cues: &[Cue]) -> String {
    let mut output = String::new();
    for cue in cues {
        output.push_str(&cue.to_string());
    }
    output
}

/// Parse the four-line block format back into cues.
///
/// The text line is taken verbatim. Any presentation transform (upper-casing)
/// belongs to the overlay planner.
pub fn decode_cues(content: &str) -> Result<Vec<Cue>, CaptionError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() % LINES_PER_CUE != 0 {
        return Err(CaptionError::MalformedCueFile {
            line: lines.len(),
            reason: format!(
                "expected a multiple of {} lines, found {}",
                LINES_PER_CUE,
                lines.len()
            ),
        });
    }

    let mut cues = Vec::with_capacity(lines.len() / LINES_PER_CUE);

    for (block, window) in lines.chunks(LINES_PER_CUE).enumerate() {
        let first_line = block * LINES_PER_CUE + 1;

        let index = window[0].trim().parse::<usize>().map_err(|_| {
            CaptionError::MalformedCueFile {
                line: first_line,
                reason: format!("invalid cue index '{}'", window[0]),
            }
        })?;

        let (start, end) = window[1].split_once(TIMING_SEPARATOR).ok_or_else(|| {
            CaptionError::MalformedCueFile {
                line: first_line + 1,
                reason: format!("timing line lacks '{}': '{}'", TIMING_SEPARATOR.trim(), window[1]),
            }
        })?;

        let start = timestamp::decode(start)?;
        let end = timestamp::decode(end)?;

        if !window[3].trim().is_empty() {
            warn!("Cue {} is not followed by a blank line", index);
        }

        cues.push(Cue::new(index, start, end, window[2]));
    }

    debug!("Decoded {} cues", cues.len());
    Ok(cues)
}

/// Collection of cues tied to the file they live in
#[derive(Debug, Clone)]
pub struct CueFile {
    /// Location on disk
    pub source_file: PathBuf,

    /// Cues in file order
    pub cues: Vec<Cue>,
}

impl CueFile {
    /// Create an empty cue file
    pub fn new(source_file: PathBuf) -> Self {
        CueFile {
            source_file,
            cues: Vec::new(),
        }
    }

    /// Create a cue file from already segmented cues
    pub fn from_cues(source_file: PathBuf, cues: Vec<Cue>) -> Self {
        CueFile { source_file, cues }
    }

    /// Read and parse a cue file from disk
    pub fn read_from_srt<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cue file: {}", path.display()))?;
        let cues = decode_cues(&content)
            .with_context(|| format!("Failed to parse cue file: {}", path.display()))?;

        Ok(CueFile {
            source_file: path.to_path_buf(),
            cues,
        })
    }

    /// Serialized form of the whole file
    pub fn to_srt_string(&self) -> String {
        encode_cues(&self.cues)
    }

    /// Write cues to `path`, replacing any previous file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create cue file: {}", path.display()))?;

        for cue in &self.cues {
            write!(file, "{}", cue)?;
        }

        debug!("Wrote {} cues to {}", self.cues.len(), path.display());
        Ok(())
    }

    /// Total time covered by the last cue
    pub fn total_duration(&self) -> f64 {
        self.cues.last().map_or(0.0, |cue| cue.end)
    }
}

impl fmt::Display for CueFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue File")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
