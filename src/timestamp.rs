/*!
 * Conversion between seconds and `HH:MM:SS,mmm` cue timestamps.
 *
 * Milliseconds are truncated on encode, never rounded, so a decoded value is
 * always at or below the original instant.
 */

use crate::errors::CaptionError;

/// Slack added before truncating to whole milliseconds. Absorbs binary
/// representation error so that `4.35` encodes as `,350` rather than `,349`.
const MILLIS_EPSILON: f64 = 1e-6;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Convert seconds to whole milliseconds, truncating the sub-millisecond part.
/// Negative and NaN inputs clamp to zero.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0 + MILLIS_EPSILON).floor() as u64
}

/// Format seconds as `HH:MM:SS,mmm`. Hours are zero-padded to two digits and
/// grow as needed.
pub fn encode(seconds: f64) -> String {
    let ms = seconds_to_millis(seconds);
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let secs = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse an `HH:MM:SS,mmm` timestamp back to seconds.
pub fn decode(text: &str) -> Result<f64, CaptionError> {
    let malformed = || CaptionError::MalformedTimestamp(text.to_string());
    let trimmed = text.trim();

    let fields: Vec<&str> = trimmed.split(':').collect();
    if fields.len() != 3 {
        return Err(malformed());
    }

    let (secs, millis) = fields[2].split_once(',').ok_or_else(malformed)?;

    let parse = |field: &str| -> Result<u64, CaptionError> {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        field.parse::<u64>().map_err(|_| malformed())
    };

    let hours = parse(fields[0])?;
    let minutes = parse(fields[1])?;
    let secs = parse(secs)?;
    let millis = parse(millis)?;

    let total_ms = hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|ms| ms.checked_add(minutes.checked_mul(MS_PER_MINUTE)?))
        .and_then(|ms| ms.checked_add(secs.checked_mul(MS_PER_SECOND)?))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(malformed)?;

    Ok(total_ms as f64 / 1000.0)
}
