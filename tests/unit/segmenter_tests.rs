/*!
 * Tests for cutting word-timed segments into cues
 */

use subburn::cue_file::Cue;
use subburn::segmenter::{CueCounter, Segmenter, DEFAULT_MAX_SEGMENT_DURATION};
use subburn::transcript::{TranscriptSegment, Word};
use crate::common;

fn hi_there_friend(third: &str) -> TranscriptSegment {
    TranscriptSegment::new(0.0, vec![
        Word::new("Hi", 0.0, 0.4),
        Word::new("there", 0.5, 1.2),
        Word::new(third, 1.3, 2.6),
    ])
}

#[test]
fn test_segment_withLeadingSpaceToken_shouldKeepSpacingVerbatim() {
    let segmenter = Segmenter::new();
    let mut counter = CueCounter::new();

    let cues = segmenter.segment(&hi_there_friend(" friend"), &mut counter);

    assert_eq!(cues, vec![Cue::new(1, 0.0, 2.6, "Hithere friend")]);
}

#[test]
fn test_segment_withBareTokens_shouldConcatenateWithoutSpaces() {
    let segmenter = Segmenter::new();
    let mut counter = CueCounter::new();

    let cues = segmenter.segment(&hi_there_friend("friend"), &mut counter);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hitherefriend");
}

#[test]
fn test_segment_withShortSegment_shouldFlushRemainder() {
    let segmenter = Segmenter::new();
    let mut counter = CueCounter::new();
    let segment = TranscriptSegment::new(10.0, vec![
        Word::new(" Short", 10.0, 10.4),
        Word::new(" one", 10.5, 11.0),
    ]);

    let cues = segmenter.segment(&segment, &mut counter);

    assert_eq!(cues, vec![Cue::new(1, 10.0, 11.0, "Short one")]);
}

#[test]
fn test_segment_withLongSegment_shouldCutAtBoundAndFlushTail() {
    let segmenter = Segmenter::new();
    let mut counter = CueCounter::new();
    let segment = TranscriptSegment::new(0.0, vec![
        Word::new(" one", 0.0, 1.0),
        Word::new(" two", 1.0, 2.5),
        Word::new(" three", 2.5, 3.0),
        Word::new(" four", 3.0, 4.5),
        Word::new(" five", 4.5, 5.0),
    ]);

    let cues = segmenter.segment(&segment, &mut counter);

    assert_eq!(cues, vec![
        Cue::new(1, 0.0, 2.5, "one two"),
        Cue::new(2, 2.5, 4.5, "three four"),
        Cue::new(3, 4.5, 5.0, "five"),
    ]);
    assert_eq!(counter.emitted(), 3);
}

#[test]
fn test_segment_withEmptySegment_shouldNotPerturbIndices() {
    let segmenter = Segmenter::new();
    let segments = vec![
        TranscriptSegment::new(0.0, vec![Word::new(" first", 0.0, 0.5)]),
        TranscriptSegment::new(1.0, Vec::new()),
        TranscriptSegment::new(2.0, vec![Word::new(" second", 2.0, 2.5)]),
    ];

    let cues = segmenter.segment_all(&segments);

    let indices: Vec<usize> = cues.iter().map(|cue| cue.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(cues[1].start, 2.0);
}

#[test]
fn test_segmentAll_shouldNumberCuesAcrossSegments() {
    let segmenter = Segmenter::new();

    let cues = segmenter.segment_transcript(&common::sample_transcript());

    assert_eq!(cues, vec![
        Cue::new(1, 0.0, 2.1, "Hello there"),
        Cue::new(2, 2.1, 4.35, "general kenobi."),
        Cue::new(3, 5.0, 6.9, "You are a bold one."),
    ]);
}

#[test]
fn test_segment_withSharedCounter_shouldContinueNumbering() {
    let segmenter = Segmenter::new();
    let mut counter = CueCounter::new();
    let segment = TranscriptSegment::new(0.0, vec![Word::new(" again", 0.0, 0.3)]);

    let first = segmenter.segment(&segment, &mut counter);
    let second = segmenter.segment(&segment, &mut counter);

    assert_eq!(first[0].index, 1);
    assert_eq!(second[0].index, 2);
    assert_eq!(counter.next_index(), 3);
}

#[test]
fn test_withMaxDuration_shouldChangeCutPoint() {
    let segmenter = Segmenter::with_max_duration(1.0);
    let segment = TranscriptSegment::new(0.0, vec![
        Word::new(" a", 0.0, 0.6),
        Word::new(" b", 0.6, 1.0),
        Word::new(" c", 1.0, 1.4),
    ]);

    let cues = segmenter.segment_all(&[segment]);

    assert_eq!(segmenter.max_segment_duration(), 1.0);
    assert_eq!(Segmenter::default().max_segment_duration(), DEFAULT_MAX_SEGMENT_DURATION);
    assert_eq!(cues, vec![
        Cue::new(1, 0.0, 1.0, "a b"),
        Cue::new(2, 1.0, 1.4, "c"),
    ]);
}
