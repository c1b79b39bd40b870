/*!
 * Speech-to-text collaborator.
 *
 * The pipeline only needs ordered segments of ordered, timed words. The
 * [`Transcriber`] trait is that seam; [`WhisperCliTranscriber`] fills it by
 * running the Whisper command line tool with word timestamps enabled and
 * reading back its JSON output.
 */

use async_trait::async_trait;
use log::{debug, info};
use std::ffi::OsString;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::TranscriptionConfig;
use crate::errors::TranscriptionError;
use crate::media::run_external;
use crate::transcript::Transcript;

/// Common trait for speech-to-text engines
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe `audio`, using `work_dir` for any intermediate files
    ///
    /// # Returns
    /// * `Result<Transcript, TranscriptionError>` - Word-timed transcript or an error
    async fn transcribe(&self, audio: &Path, work_dir: &Path) -> Result<Transcript, TranscriptionError>;
}

/// Runs the `whisper` CLI
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    command: String,
    model: String,
    language: Option<String>,
    timeout: Duration,
}

impl WhisperCliTranscriber {
    pub fn new(command: impl Into<String>, model: impl Into<String>, language: Option<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
            language,
            timeout,
        }
    }

    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self::new(
            config.command.clone(),
            config.model.clone(),
            config.language.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Arguments passed to the CLI for one audio file
    pub fn build_args(&self, audio: &Path, work_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            audio.into(),
            "--model".into(), self.model.clone().into(),
            "--word_timestamps".into(), "True".into(),
            "--output_format".into(), "json".into(),
            "--output_dir".into(), work_dir.into(),
            "--verbose".into(), "False".into(),
        ];
        if let Some(language) = &self.language {
            args.push("--language".into());
            args.push(language.clone().into());
        }
        args
    }

    /// Where the CLI writes its JSON result for `audio`
    pub fn output_path(audio: &Path, work_dir: &Path) -> PathBuf {
        let stem = audio.file_stem().unwrap_or_default().to_string_lossy();
        work_dir.join(format!("{}.json", stem))
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio: &Path, work_dir: &Path) -> Result<Transcript, TranscriptionError> {
        if !audio.exists() {
            return Err(TranscriptionError::AudioNotFound(audio.display().to_string()));
        }

        info!("Transcribing {} with whisper model '{}'", audio.display(), self.model);
        run_external(&self.command, self.build_args(audio, work_dir), self.timeout).await?;

        let json_path = Self::output_path(audio, work_dir);
        let content = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            TranscriptionError::EngineFailed(format!("missing output {}: {}", json_path.display(), e))
        })?;

        let transcript = Transcript::from_json_str(&content)
            .map_err(|e| TranscriptionError::ParseError(format!("{:#}", e)))?;

        debug!(
            "Transcript has {} segments and {} words",
            transcript.segments.len(),
            transcript.word_count()
        );
        Ok(transcript)
    }
}
