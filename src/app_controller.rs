use anyhow::{Result, Context, anyhow};
use log::{error, info, debug};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::cue_file::CueFile;
use crate::file_utils::FileManager;
use crate::job::Job;
use crate::media::{FfmpegBackend, MediaBackend};
use crate::overlay::{FrameSize, OverlayCue, OverlayPlanner, StyleConfig, StyleRequest};
use crate::segmenter::Segmenter;
use crate::transcriber::{Transcriber, WhisperCliTranscriber};
use crate::transcript::Transcript;

// @module: Application controller for the caption pipeline

/// Outcome of processing every video in a folder
#[derive(Debug, Default)]
pub struct FolderSummary {
    /// Jobs that completed
    pub jobs: Vec<Job>,

    /// Inputs that failed, with the error message
    pub failures: Vec<(PathBuf, String)>,
}

/// Main application controller: transcribe, segment, plan and render
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Speech-to-text engine
    transcriber: Box<dyn Transcriber>,

    // @field: Video toolkit
    media: Box<dyn MediaBackend>,
}

impl Controller {
    // @method: Create a controller backed by whisper and ffmpeg
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let transcriber = Box::new(WhisperCliTranscriber::from_config(&config.transcription));
        let media = Box::new(FfmpegBackend::from_config(&config.render));

        Ok(Self::with_backends(config, transcriber, media))
    }

    /// Create a controller with explicit collaborators
    pub fn with_backends(config: Config, transcriber: Box<dyn Transcriber>, media: Box<dyn MediaBackend>) -> Self {
        Self {
            config,
            transcriber,
            media,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segmenter configured from the segmentation section
    pub fn segmenter(&self) -> Segmenter {
        Segmenter::with_max_duration(self.config.segmentation.max_segment_duration)
    }

    /// Resolve a request style, falling back to the configured default style
    /// when the request carries no field at all
    pub fn resolve_style(&self, request: &StyleRequest) -> StyleConfig {
        if request.is_empty() {
            StyleConfig::from_request(&self.config.default_style)
        } else {
            StyleConfig::from_request(request)
        }
    }

    /// Segment a transcript and write the resulting cue file
    pub fn write_cues<P: AsRef<Path>>(&self, transcript: &Transcript, path: P) -> Result<CueFile> {
        let path = path.as_ref();
        let cues = self.segmenter().segment_transcript(transcript);
        let cue_file = CueFile::from_cues(path.to_path_buf(), cues);

        cue_file.write_to_srt(path)?;
        info!("Wrote {} cues to {}", cue_file.cues.len(), path.display());

        Ok(cue_file)
    }

    /// Read a cue file and plan its overlays for a frame size
    pub fn plan_cue_file<P: AsRef<Path>>(&self, path: P, frame: FrameSize, style: &StyleConfig) -> Result<Vec<OverlayCue>> {
        let cue_file = CueFile::read_from_srt(path)?;
        Ok(self.planner(style, frame).plan(&cue_file.cues))
    }

    fn planner(&self, style: &StyleConfig, frame: FrameSize) -> OverlayPlanner {
        OverlayPlanner::new(style.clone(), frame).with_default_font(self.config.render.default_font.clone())
    }

    /// Create a job for `input`: copy the video in, extract audio, transcribe,
    /// and write the transcript and cue file
    pub async fn process_video<P: AsRef<Path>>(&self, input: P) -> Result<Job> {
        let input = input.as_ref();
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let job = Job::create(&self.config.jobs_dir)?;
        info!("Processing {:?} as job {}", input, job.id);

        FileManager::copy_file(input, job.input_video())?;

        let spinner = Self::spinner("Extracting audio");
        let extracted = self.media.extract_audio(&job.input_video(), &job.extracted_audio()).await;
        spinner.finish_and_clear();
        extracted.context("Audio extraction failed")?;

        let spinner = Self::spinner("Transcribing");
        let transcribed = self.transcriber.transcribe(&job.extracted_audio(), &job.dir).await;
        spinner.finish_and_clear();
        let transcript = transcribed.context("Transcription failed")?;

        FileManager::write_to_file(job.transcription_text(), &transcript.full_text())?;
        let transcript_json = serde_json::to_string_pretty(&transcript)
            .context("Failed to serialize transcript")?;
        FileManager::write_to_file(job.transcript_json(), &transcript_json)?;

        self.write_cues(&transcript, job.cue_file())?;

        info!(
            "Job {} processed in {}.",
            job.id,
            Self::format_duration(start_time.elapsed())
        );
        Ok(job)
    }

    /// Burn the job's cue file into a new video. A failure leaves every
    /// earlier artifact of the job in place.
    pub async fn render_job(&self, job: &Job, style: &StyleConfig) -> Result<PathBuf> {
        let start_time = std::time::Instant::now();
        let input = job.input_video();
        let output = job.output_video();

        let cue_file = CueFile::read_from_srt(job.cue_file())?;
        let frame = self.media.probe_frame_size(&input).await
            .context("Failed to probe video frame size")?;
        debug!("Frame size {}x{}", frame.width, frame.height);

        let plan = self.planner(style, frame).plan(&cue_file.cues);

        let spinner = Self::spinner("Rendering captions");
        let rendered = self.media.burn_captions(&input, &plan, &output).await;
        spinner.finish_and_clear();
        rendered.context("Caption rendering failed")?;

        info!(
            "Rendered job {} in {}.",
            job.id,
            Self::format_duration(start_time.elapsed())
        );
        Ok(output)
    }

    /// Process every video below `input_dir`, optionally rendering each job.
    /// One failing video does not stop the others; failures are reported in
    /// the summary.
    pub async fn run_folder<P: AsRef<Path>>(&self, input_dir: P, render_style: Option<&StyleConfig>) -> Result<FolderSummary> {
        let input_dir = input_dir.as_ref();
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let videos = FileManager::find_videos(input_dir)?;
        info!("Found {} video files in {:?}", videos.len(), input_dir);

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(videos.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result);
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for video in videos {
            let result = match self.process_video(&video).await {
                Ok(job) => match render_style {
                    Some(style) => self.render_job(&job, style).await.map(|_| job),
                    None => Ok(job),
                },
                Err(e) => Err(e),
            };

            match result {
                Ok(job) => summary.jobs.push(job),
                Err(e) => {
                    error!("Error processing {:?}: {:#}", video, e);
                    summary.failures.push((video, format!("{:#}", e)));
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();
        info!(
            "Finished folder: {} succeeded, {} failed",
            summary.jobs.len(),
            summary.failures.len()
        );
        Ok(summary)
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    /// Format a duration as a short human readable string
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:01}s", seconds, duration.subsec_millis() / 100)
        }
    }
}
