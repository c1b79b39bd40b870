use anyhow::{anyhow, Result};
use log::debug;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::file_utils::FileManager;

// @module: Per-job working directory

pub const INPUT_VIDEO: &str = "input_video.mp4";
pub const EXTRACTED_AUDIO: &str = "extracted_audio.mp3";
pub const TRANSCRIPTION_TEXT: &str = "transcription.txt";
pub const TRANSCRIPT_JSON: &str = "transcript.json";
pub const CUE_FILE: &str = "subtitles.srt";
pub const OUTPUT_VIDEO: &str = "output_video.mp4";

/// A job owns one directory for its whole lifetime; nothing else writes into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    // @field: Unique job identifier
    pub id: String,

    // @field: Job working directory
    pub dir: PathBuf,
}

impl Job {
    /// Create a fresh job directory below `jobs_root`
    pub fn create<P: AsRef<Path>>(jobs_root: P) -> Result<Self> {
        let id = Uuid::new_v4().to_string();
        let dir = jobs_root.as_ref().join(&id);
        FileManager::ensure_dir(&dir)?;

        debug!("Created job {} in {}", id, dir.display());
        Ok(Self { id, dir })
    }

    /// Reopen an existing job directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !FileManager::dir_exists(dir) {
            return Err(anyhow!("Job directory does not exist: {:?}", dir));
        }

        let id = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Job directory has no name: {:?}", dir))?;

        Ok(Self {
            id,
            dir: dir.to_path_buf(),
        })
    }

    pub fn input_video(&self) -> PathBuf {
        self.dir.join(INPUT_VIDEO)
    }

    pub fn extracted_audio(&self) -> PathBuf {
        self.dir.join(EXTRACTED_AUDIO)
    }

    pub fn transcription_text(&self) -> PathBuf {
        self.dir.join(TRANSCRIPTION_TEXT)
    }

    pub fn transcript_json(&self) -> PathBuf {
        self.dir.join(TRANSCRIPT_JSON)
    }

    pub fn cue_file(&self) -> PathBuf {
        self.dir.join(CUE_FILE)
    }

    pub fn output_video(&self) -> PathBuf {
        self.dir.join(OUTPUT_VIDEO)
    }
}
