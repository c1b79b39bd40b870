/*!
 * Overlay planning: turns parsed cues plus a caption style into the fully
 * resolved, render-ready description of every caption on screen.
 *
 * Style values arrive as loose strings. Each lookup is an explicit table with a
 * named fallback, and an unrecognised value selects the fallback instead of
 * failing the request.
 */

use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cue_file::Cue;

/// Font bundled with the application, used when no font is selected
pub const DEFAULT_FONT_FILE: &str = "./ProximaNova-Bold.ttf";

/// Fraction of frame height used when the size tier is absent or unknown (medium)
pub const DEFAULT_FONT_SIZE_FRACTION: f64 = 0.06;

/// Letter spacing in pixels when the tier is absent or unknown
pub const DEFAULT_LETTER_SPACING: f64 = 0.0;

/// Line spacing when the tier is absent or unknown
pub const DEFAULT_LINE_SPACING: f64 = 0.0;

/// Stroke colour when the request leaves it empty
pub const DEFAULT_STROKE_COLOR: &str = "black";

/// Stroke width in pixels when the request leaves it empty or unparsable
pub const DEFAULT_STROKE_WIDTH_PX: f64 = 2.0;

/// Fill colour for captions
pub const OPAQUE_TEXT_COLOR: &str = "white";

/// Fill colour for captions with the transparent option set
pub const TRANSLUCENT_TEXT_COLOR: &str = "white@0.5";

/// Top edge of the caption box as a fraction of frame height
pub const VERTICAL_ANCHOR_FRACTION: f64 = 0.72;

/// Maximum caption box width as a fraction of frame width
pub const MAX_WIDTH_FRACTION: f64 = 0.8;

/// Named caption size preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSizeTier {
    Small,
    Medium,
    Large,
}

impl std::str::FromStr for FontSizeTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(anyhow!("Invalid font size tier: {}", s)),
        }
    }
}

/// Named spacing preset, shared by letter and line spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingTier {
    Normal,
    Wide,
    Wider,
    Widest,
}

impl std::str::FromStr for SpacingTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "wide" => Ok(Self::Wide),
            "wider" => Ok(Self::Wider),
            "widest" => Ok(Self::Widest),
            _ => Err(anyhow!("Invalid spacing tier: {}", s)),
        }
    }
}

/// Font size as a fraction of frame height
pub fn font_size_fraction(tier: Option<FontSizeTier>) -> f64 {
    match tier {
        Some(FontSizeTier::Small) => 0.04,
        Some(FontSizeTier::Medium) => 0.06,
        Some(FontSizeTier::Large) => 0.08,
        None => DEFAULT_FONT_SIZE_FRACTION,
    }
}

/// Extra pixels between glyphs
pub fn letter_spacing(tier: Option<SpacingTier>) -> f64 {
    match tier {
        Some(SpacingTier::Normal) => 0.0,
        Some(SpacingTier::Wide) => 2.0,
        Some(SpacingTier::Wider) => 4.0,
        Some(SpacingTier::Widest) => 6.0,
        None => DEFAULT_LETTER_SPACING,
    }
}

/// Extra spacing between wrapped lines
pub fn line_spacing(tier: Option<SpacingTier>) -> f64 {
    match tier {
        Some(SpacingTier::Normal) => 0.0,
        Some(SpacingTier::Wide) => 1.5,
        Some(SpacingTier::Wider) => 2.0,
        Some(SpacingTier::Widest) => 2.5,
        None => DEFAULT_LINE_SPACING,
    }
}

/// Style exactly as it arrives from a request: every field optional, free-form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleRequest {
    #[serde(default)]
    pub font_size: Option<String>,

    #[serde(default)]
    pub stroke_color: Option<String>,

    #[serde(default)]
    pub stroke_width: Option<String>,

    #[serde(default)]
    pub transparent: bool,

    #[serde(default)]
    pub letter_spacing: Option<String>,

    #[serde(default)]
    pub line_spacing: Option<String>,

    #[serde(default)]
    pub font: Option<String>,
}

impl StyleRequest {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Resolved caption style. A `None` tier means the request was absent or
/// unrecognised and the table fallback applies.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub font_size: Option<FontSizeTier>,
    pub stroke_color: String,
    pub stroke_width_px: f64,
    pub transparent: bool,
    pub letter_spacing: Option<SpacingTier>,
    pub line_spacing: Option<SpacingTier>,
    pub font: Option<PathBuf>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: None,
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width_px: DEFAULT_STROKE_WIDTH_PX,
            transparent: false,
            letter_spacing: None,
            line_spacing: None,
            font: None,
        }
    }
}

impl StyleConfig {
    /// Resolve a loose request. Never fails; unknown values are logged and
    /// replaced by their defaults.
    pub fn from_request(request: &StyleRequest) -> Self {
        Self {
            font_size: parse_tier(request.font_size.as_deref(), "font size"),
            stroke_color: non_empty(request.stroke_color.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_STROKE_COLOR.to_string()),
            stroke_width_px: parse_stroke_width(request.stroke_width.as_deref()),
            transparent: request.transparent,
            letter_spacing: parse_tier(request.letter_spacing.as_deref(), "letter spacing"),
            line_spacing: parse_tier(request.line_spacing.as_deref(), "line spacing"),
            font: non_empty(request.font.as_deref()).map(PathBuf::from),
        }
    }

    /// Fill colour for the text
    pub fn text_color(&self) -> &'static str {
        if self.transparent {
            TRANSLUCENT_TEXT_COLOR
        } else {
            OPAQUE_TEXT_COLOR
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_tier<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Option<T> {
    let value = non_empty(value)?;
    match value.parse::<T>() {
        Ok(tier) => Some(tier),
        Err(_) => {
            warn!("Unrecognized {} '{}', using default", what, value);
            None
        }
    }
}

fn parse_stroke_width(value: Option<&str>) -> f64 {
    let Some(value) = non_empty(value) else {
        return DEFAULT_STROKE_WIDTH_PX;
    };

    match value.trim_end_matches("px").trim().parse::<f64>() {
        Ok(width) if width.is_finite() && width >= 0.0 => width,
        _ => {
            warn!("Unrecognized stroke width '{}', using {}px", value, DEFAULT_STROKE_WIDTH_PX);
            DEFAULT_STROKE_WIDTH_PX
        }
    }
}

/// Dimensions of the target video frame in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Horizontal alignment of the caption box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Center,
}

/// Where the caption box sits in the frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSpec {
    pub horizontal: HorizontalAlign,

    /// Top edge of the box, pixels from the top of the frame
    pub top_px: f64,

    /// Width the text wraps within
    pub max_width_px: u32,

    /// `None` lets the box grow with the text
    pub max_height_px: Option<u32>,
}

impl PositionSpec {
    /// Centred box anchored at the caption baseline area of `frame`
    pub fn for_frame(frame: FrameSize) -> Self {
        Self {
            horizontal: HorizontalAlign::Center,
            top_px: frame.height as f64 * VERTICAL_ANCHOR_FRACTION,
            max_width_px: (frame.width as f64 * MAX_WIDTH_FRACTION) as u32,
            max_height_px: None,
        }
    }
}

/// Render-ready description of one caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayCue {
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub position: PositionSpec,
    pub font_size_px: u32,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width_px: f64,
    pub letter_spacing: f64,
    pub line_spacing: f64,
    pub font_file: PathBuf,
}

/// Computes overlay parameters for cues against one frame size and style
#[derive(Debug, Clone)]
pub struct OverlayPlanner {
    style: StyleConfig,
    frame: FrameSize,
    default_font: PathBuf,
}

impl OverlayPlanner {
    pub fn new(style: StyleConfig, frame: FrameSize) -> Self {
        Self {
            style,
            frame,
            default_font: PathBuf::from(DEFAULT_FONT_FILE),
        }
    }

    /// Replace the bundled fallback font
    pub fn with_default_font(mut self, font: impl Into<PathBuf>) -> Self {
        self.default_font = font.into();
        self
    }

    /// Text height in pixels for the configured tier
    pub fn font_size_px(&self) -> u32 {
        (self.frame.height as f64 * font_size_fraction(self.style.font_size)) as u32
    }

    fn font_file(&self) -> PathBuf {
        self.style
            .font
            .clone()
            .unwrap_or_else(|| self.default_font.clone())
    }

    /// Plan a single cue
    pub fn plan_cue(&self, cue: &Cue) -> OverlayCue {
        OverlayCue {
            text: cue.text.to_uppercase(),
            start_seconds: cue.start,
            end_seconds: cue.end,
            position: PositionSpec::for_frame(self.frame),
            font_size_px: self.font_size_px(),
            color: self.style.text_color().to_string(),
            stroke_color: self.style.stroke_color.clone(),
            stroke_width_px: self.style.stroke_width_px,
            letter_spacing: letter_spacing(self.style.letter_spacing),
            line_spacing: line_spacing(self.style.line_spacing),
            font_file: self.font_file(),
        }
    }

    /// Plan every cue, preserving order
    pub fn plan(&self, cues: &[Cue]) -> Vec<OverlayCue> {
        cues.iter().map(|cue| self.plan_cue(cue)).collect()
    }
}
