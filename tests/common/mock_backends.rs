/*!
 * Mock backend implementations for testing
 *
 * These stand in for the whisper CLI and ffmpeg so the pipeline can run
 * without external tools. Every call is recorded so tests can assert on
 * what the controller asked for.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use subburn::errors::{MediaError, TranscriptionError};
use subburn::media::MediaBackend;
use subburn::overlay::{FrameSize, OverlayCue};
use subburn::transcriber::Transcriber;
use subburn::transcript::Transcript;

/// Records calls made against the mock backends
#[derive(Debug, Default)]
pub struct CallLog {
    /// Audio files passed to the transcriber
    pub transcribed: Vec<PathBuf>,
    /// Videos whose audio was extracted
    pub extracted: Vec<PathBuf>,
    /// Overlay plans handed to the renderer
    pub rendered: Vec<Vec<OverlayCue>>,
}

/// Transcriber returning a fixed transcript
#[derive(Debug)]
pub struct MockTranscriber {
    transcript: Transcript,
    should_fail: bool,
    log: Arc<Mutex<CallLog>>,
}

impl MockTranscriber {
    pub fn new(transcript: Transcript, log: Arc<Mutex<CallLog>>) -> Self {
        Self {
            transcript,
            should_fail: false,
            log,
        }
    }

    /// Make every transcription fail
    pub fn failing(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &Path, _work_dir: &Path) -> Result<Transcript, TranscriptionError> {
        self.log.lock().unwrap().transcribed.push(audio.to_path_buf());

        if self.should_fail {
            return Err(TranscriptionError::EngineFailed("mock engine failure".to_string()));
        }
        Ok(self.transcript.clone())
    }
}

/// Media backend that writes placeholder files instead of running ffmpeg
#[derive(Debug)]
pub struct MockMediaBackend {
    frame: FrameSize,
    fail_render: bool,
    log: Arc<Mutex<CallLog>>,
}

impl MockMediaBackend {
    pub fn new(frame: FrameSize, log: Arc<Mutex<CallLog>>) -> Self {
        Self {
            frame,
            fail_render: false,
            log,
        }
    }

    /// Make `burn_captions` fail like a crashed ffmpeg
    pub fn failing_render(mut self) -> Self {
        self.fail_render = true;
        self
    }
}

#[async_trait]
impl MediaBackend for MockMediaBackend {
    async fn extract_audio(&self, video: &Path, audio_out: &Path) -> Result<(), MediaError> {
        if !video.exists() {
            return Err(MediaError::InputNotFound(video.display().to_string()));
        }
        self.log.lock().unwrap().extracted.push(video.to_path_buf());
        std::fs::write(audio_out, b"mock audio")?;
        Ok(())
    }

    async fn probe_frame_size(&self, video: &Path) -> Result<FrameSize, MediaError> {
        if !video.exists() {
            return Err(MediaError::InputNotFound(video.display().to_string()));
        }
        Ok(self.frame)
    }

    async fn burn_captions(&self, _video: &Path, plan: &[OverlayCue], output: &Path) -> Result<(), MediaError> {
        self.log.lock().unwrap().rendered.push(plan.to_vec());

        if self.fail_render {
            return Err(MediaError::ProcessError {
                tool: "ffmpeg".to_string(),
                stderr: "mock render failure".to_string(),
            });
        }
        std::fs::write(output, b"mock video")?;
        Ok(())
    }
}
