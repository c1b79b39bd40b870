/*!
 * Tests for caption style resolution and overlay planning
 */

use std::path::PathBuf;
use subburn::cue_file::Cue;
use subburn::overlay::{
    font_size_fraction, letter_spacing, line_spacing, FontSizeTier, FrameSize, OverlayPlanner,
    SpacingTier, StyleConfig, StyleRequest, DEFAULT_FONT_FILE, OPAQUE_TEXT_COLOR,
    TRANSLUCENT_TEXT_COLOR,
};

fn planner(request: StyleRequest, frame: FrameSize) -> OverlayPlanner {
    OverlayPlanner::new(StyleConfig::from_request(&request), frame)
}

#[test]
fn test_fontSizeTable_shouldMapTiersToFractions() {
    assert_eq!(font_size_fraction(Some(FontSizeTier::Small)), 0.04);
    assert_eq!(font_size_fraction(Some(FontSizeTier::Medium)), 0.06);
    assert_eq!(font_size_fraction(Some(FontSizeTier::Large)), 0.08);
}

#[test]
fn test_spacingTables_shouldMapTiersToValues() {
    assert_eq!(letter_spacing(Some(SpacingTier::Wide)), 2.0);
    assert_eq!(letter_spacing(Some(SpacingTier::Widest)), 6.0);
    assert_eq!(line_spacing(Some(SpacingTier::Wider)), 2.0);
    assert_eq!(line_spacing(Some(SpacingTier::Widest)), 2.5);
}

#[test]
fn test_fontSize_withUnknownTier_shouldUseSixPercentOfHeight() {
    let request = StyleRequest {
        font_size: Some("huge".to_string()),
        ..Default::default()
    };

    let planner = planner(request, FrameSize::new(1920, 1080));

    assert_eq!(planner.font_size_px(), 64);
}

#[test]
fn test_fontSize_withLargeTier_shouldTruncatePixels() {
    let request = StyleRequest {
        font_size: Some("Large".to_string()),
        ..Default::default()
    };

    let planner = planner(request, FrameSize::new(1080, 1920));

    assert_eq!(planner.font_size_px(), 153);
}

#[test]
fn test_planCue_withEmptyStyle_shouldUseDefaults() {
    let planner = planner(StyleRequest::default(), FrameSize::new(1080, 1920));

    let overlay = planner.plan_cue(&Cue::new(1, 1.0, 2.5, "hello there"));

    assert_eq!(overlay.text, "HELLO THERE");
    assert_eq!(overlay.start_seconds, 1.0);
    assert_eq!(overlay.end_seconds, 2.5);
    assert_eq!(overlay.color, OPAQUE_TEXT_COLOR);
    assert_eq!(overlay.stroke_color, "black");
    assert_eq!(overlay.stroke_width_px, 2.0);
    assert_eq!(overlay.letter_spacing, 0.0);
    assert_eq!(overlay.line_spacing, 0.0);
    assert_eq!(overlay.font_file, PathBuf::from(DEFAULT_FONT_FILE));
    assert_eq!(overlay.position.max_width_px, 864);
}

#[test]
fn test_planCue_withFullStyle_shouldApplyEveryField() {
    let request = StyleRequest {
        font_size: Some("small".to_string()),
        stroke_color: Some("red".to_string()),
        stroke_width: Some("4".to_string()),
        transparent: true,
        letter_spacing: Some("wide".to_string()),
        line_spacing: Some("widest".to_string()),
        font: Some("/fonts/Inter.ttf".to_string()),
    };

    let overlay = planner(request, FrameSize::new(1920, 1080)).plan_cue(&Cue::new(1, 0.0, 1.0, "x"));

    assert_eq!(overlay.font_size_px, 43);
    assert_eq!(overlay.color, TRANSLUCENT_TEXT_COLOR);
    assert_eq!(overlay.stroke_color, "red");
    assert_eq!(overlay.stroke_width_px, 4.0);
    assert_eq!(overlay.letter_spacing, 2.0);
    assert_eq!(overlay.line_spacing, 2.5);
    assert_eq!(overlay.font_file, PathBuf::from("/fonts/Inter.ttf"));
}

#[test]
fn test_planCue_withAbsentLetterSpacing_shouldBeZero() {
    let request = StyleRequest {
        line_spacing: Some("wide".to_string()),
        ..Default::default()
    };

    let overlay = planner(request, FrameSize::new(640, 360)).plan_cue(&Cue::new(1, 0.0, 1.0, "x"));

    assert_eq!(overlay.letter_spacing, 0.0);
    assert_eq!(overlay.line_spacing, 1.5);
}

#[test]
fn test_withDefaultFont_shouldReplaceFallbackOnly() {
    let frame = FrameSize::new(640, 360);
    let fallback = planner(StyleRequest::default(), frame).with_default_font("/srv/fonts/Bold.ttf");
    let explicit = planner(
        StyleRequest {
            font: Some("mine.ttf".to_string()),
            ..Default::default()
        },
        frame,
    )
    .with_default_font("/srv/fonts/Bold.ttf");

    let cue = Cue::new(1, 0.0, 1.0, "x");
    assert_eq!(fallback.plan_cue(&cue).font_file, PathBuf::from("/srv/fonts/Bold.ttf"));
    assert_eq!(explicit.plan_cue(&cue).font_file, PathBuf::from("mine.ttf"));
}

#[test]
fn test_plan_shouldPreserveCueOrder() {
    let cues = vec![
        Cue::new(1, 0.0, 1.0, "one"),
        Cue::new(2, 1.0, 2.0, "two"),
        Cue::new(3, 2.0, 3.0, "three"),
    ];

    let plan = planner(StyleRequest::default(), FrameSize::new(1280, 720)).plan(&cues);

    let texts: Vec<&str> = plan.iter().map(|overlay| overlay.text.as_str()).collect();
    assert_eq!(texts, vec!["ONE", "TWO", "THREE"]);
}

#[test]
fn test_styleRequest_isEmpty_shouldDetectAnyField() {
    assert!(StyleRequest::default().is_empty());
    assert!(!StyleRequest {
        transparent: true,
        ..Default::default()
    }
    .is_empty());
}

#[test]
fn test_fromRequest_withBlankValues_shouldTreatAsAbsent() {
    let request = StyleRequest {
        stroke_color: Some("  ".to_string()),
        font: Some(String::new()),
        ..Default::default()
    };

    let style = StyleConfig::from_request(&request);

    assert_eq!(style, StyleConfig::default());
}
