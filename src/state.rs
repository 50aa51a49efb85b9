//! Editor state for the raster compositor.
//!
//! [`CompositorState`] is the complete description of one render. Numeric
//! fields are kept inside their documented domains by the setters and by
//! [`CompositorState::clamped`]; color setters refuse values that do not parse
//! so the state always holds the last good color.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::{hex_to_rgb, is_valid_hex};

/// Logo scale, percent.
pub const LOGO_SIZE_RANGE: RangeInclusive<u32> = 30..=200;
/// Logo rotation, degrees clockwise.
pub const ROTATION_RANGE: RangeInclusive<u32> = 0..=360;
/// Logo opacity, percent.
pub const OPACITY_RANGE: RangeInclusive<u32> = 0..=100;
/// Caption font size, pixels.
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 24..=120;

/// Step used by the logo size nudge buttons.
pub const LOGO_SIZE_STEP: i32 = 10;

pub(crate) const FALLBACK_PRIMARY: &str = "#6366F1";
pub(crate) const FALLBACK_SECONDARY: &str = "#06B6D4";
const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

// ============================================================================
// Enumerations
// ============================================================================

/// Caption font families offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum FontFamily {
    #[default]
    Arial,
    Helvetica,
    Georgia,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    #[serde(rename = "Courier New")]
    CourierNew,
    Verdana,
    Impact,
}

impl FontFamily {
    pub const ALL: [FontFamily; 7] = [
        Self::Arial,
        Self::Helvetica,
        Self::Georgia,
        Self::TimesNewRoman,
        Self::CourierNew,
        Self::Verdana,
        Self::Impact,
    ];

    /// The family name as shown to the user.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arial => "Arial",
            Self::Helvetica => "Helvetica",
            Self::Georgia => "Georgia",
            Self::TimesNewRoman => "Times New Roman",
            Self::CourierNew => "Courier New",
            Self::Verdana => "Verdana",
            Self::Impact => "Impact",
        }
    }

    /// A font-family list with a generic fallback, suitable for SVG.
    pub fn css_stack(&self) -> &'static str {
        match self {
            Self::Arial => "Arial, Helvetica, sans-serif",
            Self::Helvetica => "Helvetica, Arial, sans-serif",
            Self::Georgia => "Georgia, serif",
            Self::TimesNewRoman => "'Times New Roman', Times, serif",
            Self::CourierNew => "'Courier New', Courier, monospace",
            Self::Verdana => "Verdana, sans-serif",
            Self::Impact => "Impact, sans-serif",
        }
    }

    /// Looks a family up by its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Horizontal placement of the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// The matching SVG `text-anchor` value.
    pub fn text_anchor(&self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

/// Surface fill: either the transparent sentinel or a hex color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CanvasBackground {
    #[default]
    Transparent,
    Color(String),
}

impl CanvasBackground {
    pub const TRANSPARENT: &'static str = "transparent";

    /// Returns true for the transparent sentinel.
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }
}

impl TryFrom<String> for CanvasBackground {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case(Self::TRANSPARENT) {
            Ok(Self::Transparent)
        } else if is_valid_hex(&value) {
            Ok(Self::Color(value))
        } else {
            Err(format!("invalid canvas background: {value:?}"))
        }
    }
}

impl From<CanvasBackground> for String {
    fn from(bg: CanvasBackground) -> Self {
        match bg {
            CanvasBackground::Transparent => CanvasBackground::TRANSPARENT.to_string(),
            CanvasBackground::Color(hex) => hex,
        }
    }
}

impl fmt::Display for CanvasBackground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transparent => f.write_str(Self::TRANSPARENT),
            Self::Color(hex) => f.write_str(hex),
        }
    }
}

// ============================================================================
// CompositorState
// ============================================================================

/// One complete rendering configuration of the logo editor.
///
/// Created from the brand when the editor opens, replaced wholesale on every
/// change and discarded when the editor closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompositorState {
    pub background_color: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,

    /// Percent, 30-200.
    pub logo_size: u32,
    /// Degrees clockwise, 0-360.
    pub rotation: u32,
    /// Percent, 0-100.
    pub opacity: u32,

    pub text: String,
    pub show_text: bool,
    /// Pixels, 24-120.
    pub font_size: u32,
    pub font_family: FontFamily,
    pub text_align: TextAlign,

    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub canvas_background: CanvasBackground,

    /// Alignment aid; drawn on the surface but carries no content.
    pub show_grid: bool,
}

impl Default for CompositorState {
    fn default() -> Self {
        Self::for_brand("", &[])
    }
}

impl CompositorState {
    pub const DEFAULT_LOGO_SIZE: u32 = 100;
    pub const DEFAULT_ROTATION: u32 = 0;
    pub const DEFAULT_OPACITY: u32 = 100;
    pub const DEFAULT_FONT_SIZE: u32 = 48;

    /// Builds the opening state for a brand.
    ///
    /// The first two palette colors seed the primary and secondary colors;
    /// the company name becomes the caption.
    pub fn for_brand(company_name: &str, palette: &[String]) -> Self {
        let primary = palette
            .first()
            .filter(|c| is_valid_hex(c))
            .cloned()
            .unwrap_or_else(|| FALLBACK_PRIMARY.to_string());
        let secondary = palette
            .get(1)
            .filter(|c| is_valid_hex(c))
            .cloned()
            .unwrap_or_else(|| FALLBACK_SECONDARY.to_string());

        Self {
            background_color: primary.clone(),
            primary_color: primary,
            secondary_color: secondary,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            logo_size: Self::DEFAULT_LOGO_SIZE,
            rotation: Self::DEFAULT_ROTATION,
            opacity: Self::DEFAULT_OPACITY,
            text: company_name.to_string(),
            show_text: true,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::Arial,
            text_align: TextAlign::Center,
            canvas_background: CanvasBackground::Transparent,
            show_grid: false,
        }
    }

    /// Returns a copy with every numeric field inside its domain.
    pub fn clamped(mut self) -> Self {
        self.logo_size = clamp_to(self.logo_size, &LOGO_SIZE_RANGE);
        self.rotation = clamp_to(self.rotation, &ROTATION_RANGE);
        self.opacity = clamp_to(self.opacity, &OPACITY_RANGE);
        self.font_size = clamp_to(self.font_size, &FONT_SIZE_RANGE);
        self
    }

    /// Returns a clamped copy whose unparsable colors are replaced by the
    /// corresponding colors of `last_good`.
    pub fn sanitized_against(self, last_good: &CompositorState) -> Self {
        let mut next = self.clamped();
        let keep = |which: &str, value: &mut String, previous: &str| {
            if !is_valid_hex(value) {
                warn!(field = which, rejected = %value, kept = previous, "ignoring malformed color");
                *value = previous.to_string();
            }
        };
        keep("backgroundColor", &mut next.background_color, &last_good.background_color);
        keep("primaryColor", &mut next.primary_color, &last_good.primary_color);
        keep("secondaryColor", &mut next.secondary_color, &last_good.secondary_color);
        keep("textColor", &mut next.text_color, &last_good.text_color);
        next
    }

    // ---- Presentation ----

    pub fn set_logo_size(&mut self, percent: u32) {
        self.logo_size = clamp_to(percent, &LOGO_SIZE_RANGE);
    }

    /// Adjusts the logo size by `delta` percent, staying inside the domain.
    pub fn nudge_logo_size(&mut self, delta: i32) {
        let next = (self.logo_size as i64 + delta as i64).max(0) as u32;
        self.set_logo_size(next);
    }

    pub fn set_rotation(&mut self, degrees: u32) {
        self.rotation = clamp_to(degrees, &ROTATION_RANGE);
    }

    pub fn set_opacity(&mut self, percent: u32) {
        self.opacity = clamp_to(percent, &OPACITY_RANGE);
    }

    pub fn set_font_size(&mut self, px: u32) {
        self.font_size = clamp_to(px, &FONT_SIZE_RANGE);
    }

    /// Restores the transform and typography knobs.
    ///
    /// Colors, caption text and background are content and stay untouched.
    pub fn reset_presentation(&mut self) {
        self.logo_size = Self::DEFAULT_LOGO_SIZE;
        self.rotation = Self::DEFAULT_ROTATION;
        self.opacity = Self::DEFAULT_OPACITY;
        self.font_size = Self::DEFAULT_FONT_SIZE;
    }

    // ---- Colors ----

    /// Sets the primary color. Returns false (and keeps the old color) if `hex` is malformed.
    pub fn set_primary_color(&mut self, hex: &str) -> bool {
        replace_color(&mut self.primary_color, hex)
    }

    pub fn set_secondary_color(&mut self, hex: &str) -> bool {
        replace_color(&mut self.secondary_color, hex)
    }

    pub fn set_background_color(&mut self, hex: &str) -> bool {
        replace_color(&mut self.background_color, hex)
    }

    pub fn set_text_color(&mut self, hex: &str) -> bool {
        replace_color(&mut self.text_color, hex)
    }

    /// Sets the surface fill from `"transparent"` or a hex color.
    pub fn set_canvas_background(&mut self, value: &str) -> bool {
        match CanvasBackground::try_from(value.to_string()) {
            Ok(bg) => {
                self.canvas_background = bg;
                true
            }
            Err(_) => false,
        }
    }

    /// The quick-pick backgrounds offered next to the color pickers.
    pub fn background_presets(&self) -> Vec<CanvasBackground> {
        vec![
            CanvasBackground::Transparent,
            CanvasBackground::Color("#FFFFFF".to_string()),
            CanvasBackground::Color("#000000".to_string()),
            CanvasBackground::Color("#F3F4F6".to_string()),
            CanvasBackground::Color(self.primary_color.clone()),
        ]
    }

    /// Returns the caption only when it should be drawn.
    pub fn visible_caption(&self) -> Option<&str> {
        (self.show_text && !self.text.is_empty()).then_some(self.text.as_str())
    }
}

fn replace_color(slot: &mut String, hex: &str) -> bool {
    if hex_to_rgb(hex).is_some() {
        *slot = hex.to_string();
        true
    } else {
        warn!(rejected = hex, kept = %slot, "ignoring malformed color");
        false
    }
}
