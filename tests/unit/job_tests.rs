/*!
 * Tests for job directory bookkeeping
 */

use anyhow::Result;
use subburn::job::{Job, CUE_FILE, EXTRACTED_AUDIO, INPUT_VIDEO, OUTPUT_VIDEO, TRANSCRIPT_JSON, TRANSCRIPTION_TEXT};
use crate::common;

#[test]
fn test_create_shouldMakeUniqueDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let first = Job::create(temp_dir.path())?;
    let second = Job::create(temp_dir.path())?;

    assert_ne!(first.id, second.id);
    assert!(first.dir.is_dir());
    assert_eq!(first.dir, temp_dir.path().join(&first.id));
    assert!(uuid::Uuid::parse_str(&first.id).is_ok());
    Ok(())
}

#[test]
fn test_artifactPaths_shouldUseFixedNames() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let job = Job::create(temp_dir.path())?;

    assert_eq!(job.input_video(), job.dir.join(INPUT_VIDEO));
    assert_eq!(job.extracted_audio(), job.dir.join(EXTRACTED_AUDIO));
    assert_eq!(job.transcription_text(), job.dir.join(TRANSCRIPTION_TEXT));
    assert_eq!(job.transcript_json(), job.dir.join(TRANSCRIPT_JSON));
    assert_eq!(job.cue_file(), job.dir.join(CUE_FILE));
    assert_eq!(job.output_video(), job.dir.join(OUTPUT_VIDEO));
    assert_eq!(CUE_FILE, "subtitles.srt");
    Ok(())
}

#[test]
fn test_open_withExistingJob_shouldRecoverId() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let created = Job::create(temp_dir.path())?;

    let opened = Job::open(&created.dir)?;

    assert_eq!(opened, created);
    Ok(())
}

#[test]
fn test_open_withMissingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(Job::open(temp_dir.path().join("no-such-job")).is_err());
    Ok(())
}
