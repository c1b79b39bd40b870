/*!
 * Tests for the cue timestamp codec
 */

use subburn::errors::CaptionError;
use subburn::timestamp::{decode, encode, seconds_to_millis};

#[test]
fn test_encode_withHoursMinutesSeconds_shouldPadEveryField() {
    assert_eq!(encode(3661.2345), "01:01:01,234");
    assert_eq!(encode(0.0), "00:00:00,000");
    assert_eq!(encode(59.999), "00:00:59,999");
}

#[test]
fn test_encode_withWhisperStyleFloat_shouldKeepMillisecond() {
    // 2.3 and 4.35 are not exactly representable
    assert_eq!(encode(2.3), "00:00:02,300");
    assert_eq!(encode(4.35), "00:00:04,350");
    assert_eq!(seconds_to_millis(1.001), 1001);
}

#[test]
fn test_encode_shouldTruncateNotRound() {
    assert_eq!(encode(1.9999), "00:00:01,999");
}

#[test]
fn test_decode_withValidTimestamp_shouldReturnSeconds() {
    let seconds = decode("01:02:03,456").unwrap();

    assert!((seconds - 3723.456).abs() < 1e-9);
}

#[test]
fn test_decode_withSurroundingWhitespace_shouldParse() {
    assert_eq!(decode(" 00:00:01,500 ").unwrap(), 1.5);
}

#[test]
fn test_decode_withDotSeparator_shouldFail() {
    let result = decode("00:00:01.000");

    assert!(matches!(result, Err(CaptionError::MalformedTimestamp(_))));
}

#[test]
fn test_decode_withNonNumericField_shouldFail() {
    assert!(decode("aa:00:01,000").is_err());
    assert!(decode("00:00:01,-10").is_err());
    assert!(decode("").is_err());
}

#[test]
fn test_roundTrip_withMillisecondValues_shouldBeExact() {
    for millis in [0_u64, 1, 999, 1_000, 61_234, 3_599_999, 3_600_000, 86_400_123] {
        let seconds = millis as f64 / 1000.0;
        let decoded = decode(&encode(seconds)).unwrap();

        assert_eq!(seconds_to_millis(decoded), millis, "round trip of {} ms", millis);
    }
}
