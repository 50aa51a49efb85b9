//! The branding request / response contract and its palette helpers.
//!
//! These types mirror the JSON exchanged with the branding backend, field for
//! field, so they deserialize straight from a response body or the persisted
//! record. Two backend shapes exist in the wild; [`BackendResponse`] accepts
//! either and [`BackendResponse::normalize`] folds both into the canonical
//! [`BrandingResponse`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{PaletteEntry, darken, is_valid_hex, lighten, pick_hex};
use crate::markup::slugify;
use crate::state::{FALLBACK_PRIMARY, FALLBACK_SECONDARY};

// ============================================================================
// Request
// ============================================================================

/// Which part of a branding result a (re)generation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Logo,
    Tagline,
    Palette,
    Typography,
    #[default]
    All,
}

impl Focus {
    pub const ALL: [Focus; 5] = [
        Self::All,
        Self::Logo,
        Self::Tagline,
        Self::Palette,
        Self::Typography,
    ];

    /// Returns `true` if a result generated for `self` replaces `other`.
    pub fn covers(&self, other: Focus) -> bool {
        *self == Focus::All || *self == other
    }
}

/// Free-form steering of a generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GodModeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_overrides: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub company_type: String,
    pub industry: String,
    pub description: String,
    pub target_audience: String,
    pub brand_values: Vec<String>,
    pub tone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl CompanyProfile {
    /// A generic profile used when a stored result carries none.
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: if name.is_empty() { "Company" } else { name }.to_string(),
            company_type: "saas".to_string(),
            industry: "Technology".to_string(),
            description: "Tech company".to_string(),
            target_audience: "Enterprise".to_string(),
            brand_values: vec!["Innovation".to_string(), "Quality".to_string()],
            tone: "professional".to_string(),
            additional_context: None,
        }
    }

    /// Returns a copy with user feedback appended to the additional context.
    pub fn with_feedback(&self, feedback: &str) -> Self {
        let previous = self.additional_context.as_deref().unwrap_or_default();
        Self {
            additional_context: Some(format!("{previous}. User feedback: {feedback}")),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BrandingRequest {
    pub company_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_profile: Option<CompanyProfile>,
    pub num_variations: u32,
    #[serde(default)]
    pub focus: Focus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub god_mode: Option<GodModeOptions>,
}

impl BrandingRequest {
    pub const DEFAULT_VARIATIONS: u32 = 3;

    pub fn new(company_id: impl Into<String>, profile: CompanyProfile) -> Self {
        Self {
            company_id: company_id.into(),
            company_profile: Some(profile),
            num_variations: Self::DEFAULT_VARIATIONS,
            focus: Focus::All,
            god_mode: None,
        }
    }

    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_god_mode(mut self, options: GodModeOptions) -> Self {
        self.god_mode = Some(options);
        self
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoVariation {
    pub id: String,
    pub description: String,
    pub color_scheme: Vec<String>,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub prompt_used: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaglineVariation {
    pub id: String,
    pub text: String,
    pub tone: String,
    pub explanation: String,
}

/// Brand colors keyed by role.
///
/// Role values may be bare hex strings or `{ "hex": .. }` swatches; other
/// shapes are kept but contribute no color. Roles beyond the four named ones
/// are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandColorPalette {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<PaletteEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<PaletteEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<PaletteEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutral: Option<PaletteEntry>,
    pub psychology: BTreeMap<String, String>,
    pub usage_guidelines: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BrandColorPalette {
    /// A palette with only the primary role set.
    pub fn with_primary(hex: &str) -> Self {
        Self {
            primary: Some(PaletteEntry::from(hex)),
            ..Default::default()
        }
    }

    /// Every role color as a `#` hex string, named roles first.
    ///
    /// Non-color metadata (`psychology`, `usage_guidelines`) and values that
    /// are not `#`-prefixed strings are skipped.
    pub fn colors(&self) -> Vec<String> {
        let named = [&self.primary, &self.secondary, &self.accent, &self.neutral]
            .into_iter()
            .flatten()
            .filter_map(PaletteEntry::hex);
        let extra = self.extra.values().filter_map(pick_hex);
        named
            .chain(extra)
            .filter(|hex| hex.starts_with('#'))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPairing {
    pub context: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyRecommendation {
    pub heading_font: String,
    pub body_font: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_font: Option<String>,
    pub rationale: String,
    pub pairings: Vec<FontPairing>,
}

/// A complete generated brand identity.
///
/// `brand_name` and `company_profile` are not sent by the full backend but
/// are carried in the persisted record once known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingResponse {
    pub id: String,
    pub company_id: String,
    #[serde(default, alias = "logo_prompts")]
    pub logos: Vec<LogoVariation>,
    #[serde(default)]
    pub taglines: Vec<TaglineVariation>,
    #[serde(default)]
    pub color_palette: BrandColorPalette,
    #[serde(default)]
    pub typography: TypographyRecommendation,
    #[serde(default)]
    pub brand_guidelines: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub generation_time_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_profile: Option<CompanyProfile>,
}

impl BrandingResponse {
    /// Parses a response body of either backend shape.
    pub fn from_backend_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<BackendResponse>(json).map(BackendResponse::normalize)
    }
}

// ============================================================================
// Backend shapes
// ============================================================================

/// The single-logo shape returned by the simplified backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleLogoResponse {
    pub company_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    pub logo_url: String,
}

/// A response body from either backend.
///
/// The simplified shape is tried first: it requires `company_name` and
/// `logo_url`, which the full shape never carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendResponse {
    Simple(SimpleLogoResponse),
    Full(Box<BrandingResponse>),
}

impl BackendResponse {
    /// Folds either shape into the canonical response.
    pub fn normalize(self) -> BrandingResponse {
        match self {
            Self::Full(response) => *response,
            Self::Simple(simple) => simple.into(),
        }
    }
}

impl From<SimpleLogoResponse> for BrandingResponse {
    fn from(simple: SimpleLogoResponse) -> Self {
        let slug = slugify(&simple.company_name);
        let style = simple.style.unwrap_or_default();
        let color = simple.color_scheme.filter(|c| is_valid_hex(c));

        let logo = LogoVariation {
            id: format!("{slug}-logo-1"),
            description: format!("{} logo for {}", style, simple.company_name)
                .trim()
                .to_string(),
            color_scheme: color.iter().cloned().collect(),
            style,
            image_url: Some(simple.logo_url),
            prompt_used: String::new(),
        };
        let palette = color
            .as_deref()
            .map(BrandColorPalette::with_primary)
            .unwrap_or_default();
        let profile = CompanyProfile {
            name: simple.company_name.clone(),
            industry: simple.industry.unwrap_or_default(),
            ..Default::default()
        };

        Self {
            id: slug.clone(),
            company_id: slug,
            logos: vec![logo],
            color_palette: palette,
            brand_name: Some(simple.company_name),
            company_profile: Some(profile),
            ..Default::default()
        }
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Accent colors derived from a palette for chrome around the editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandTheme {
    pub primary: String,
    pub secondary: String,
    pub primary_dark: String,
    pub secondary_dark: String,
    pub primary_light: String,
}

impl BrandTheme {
    const DARK_AMOUNT: f32 = 45.0;
    const LIGHT_AMOUNT: f32 = 20.0;

    /// Resolves primary and secondary, then derives the shades.
    ///
    /// Each role falls back to the palette's n-th usable color and then to
    /// the indigo / cyan house colors.
    pub fn from_palette(palette: &BrandColorPalette) -> Self {
        let colors = palette.colors();
        let resolve = |role: &Option<PaletteEntry>, index: usize, fallback: &str| {
            role.as_ref()
                .and_then(PaletteEntry::hex)
                .filter(|hex| is_valid_hex(hex))
                .or_else(|| colors.get(index).map(String::as_str).filter(|hex| is_valid_hex(hex)))
                .unwrap_or(fallback)
                .to_string()
        };
        let primary = resolve(&palette.primary, 0, FALLBACK_PRIMARY);
        let secondary = resolve(&palette.secondary, 1, FALLBACK_SECONDARY);

        Self {
            primary_dark: darken(&primary, Self::DARK_AMOUNT),
            secondary_dark: darken(&secondary, Self::DARK_AMOUNT),
            primary_light: lighten(&primary, Self::LIGHT_AMOUNT),
            primary,
            secondary,
        }
    }
}

impl Default for BrandTheme {
    fn default() -> Self {
        Self::from_palette(&BrandColorPalette::default())
    }
}
