/*!
 * Word-timed transcript segmentation into caption cues.
 *
 * Each transcript segment is cut independently: words are appended to an
 * accumulator until the span from the accumulator start to the current word's
 * end reaches the maximum cue duration, at which point a cue is emitted and the
 * accumulator restarts at that word's end. Whatever remains after the last word
 * is flushed as a shorter trailing cue.
 *
 * Cue indices come from a [`CueCounter`] that the caller threads through every
 * segment of a file, so numbering runs across segment boundaries and only
 * advances when a cue is actually emitted.
 */

use log::debug;

use crate::cue_file::Cue;
use crate::transcript::{Transcript, TranscriptSegment};

/// Default upper bound for a cue's span, in seconds
pub const DEFAULT_MAX_SEGMENT_DURATION: f64 = 2.0;

/// Running 1-based cue index shared across transcript segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueCounter {
    next: usize,
}

impl CueCounter {
    /// Counter whose first emitted index is 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Index the next emitted cue will receive
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Number of cues emitted so far
    pub fn emitted(&self) -> usize {
        self.next - 1
    }

    fn take(&mut self) -> usize {
        let index = self.next;
        self.next += 1;
        index
    }
}

impl Default for CueCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cuts transcript segments into duration-bounded cues
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segmenter {
    max_segment_duration: f64,
}

impl Segmenter {
    /// Segmenter with the default two second bound
    pub fn new() -> Self {
        Self::with_max_duration(DEFAULT_MAX_SEGMENT_DURATION)
    }

    /// Segmenter with a custom bound in seconds
    pub fn with_max_duration(max_segment_duration: f64) -> Self {
        Self { max_segment_duration }
    }

    pub fn max_segment_duration(&self) -> f64 {
        self.max_segment_duration
    }

    /// Cut one transcript segment, drawing indices from `counter`.
    ///
    /// A cue may overrun the bound by the length of the word that crossed it;
    /// words are never split.
    pub fn segment(&self, segment: &TranscriptSegment, counter: &mut CueCounter) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut cue_start = segment.start;
        let mut cue_text = String::new();
        let mut last_word_end = segment.start;

        for word in &segment.words {
            cue_text.push_str(&word.text);
            last_word_end = word.end;

            if word.end - cue_start >= self.max_segment_duration {
                Self::emit(&mut cues, counter, cue_start, word.end, &cue_text);
                cue_start = word.end;
                cue_text.clear();
            }
        }

        // Remainder shorter than the bound
        Self::emit(&mut cues, counter, cue_start, last_word_end, &cue_text);

        cues
    }

    /// Cut every segment in order with one shared counter
    pub fn segment_all(&self, segments: &[TranscriptSegment]) -> Vec<Cue> {
        let mut counter = CueCounter::new();
        let cues: Vec<Cue> = segments
            .iter()
            .flat_map(|segment| self.segment(segment, &mut counter))
            .collect();

        debug!(
            "Segmented {} transcript segments into {} cues (max {:.2}s)",
            segments.len(),
            cues.len(),
            self.max_segment_duration
        );
        cues
    }

    /// Cut a whole transcript
    pub fn segment_transcript(&self, transcript: &Transcript) -> Vec<Cue> {
        self.segment_all(&transcript.segments)
    }

    fn emit(cues: &mut Vec<Cue>, counter: &mut CueCounter, start: f64, end: f64, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        cues.push(Cue::new(counter.take(), start, end, trimmed));
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}
