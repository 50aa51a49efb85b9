//! Editing one catalog template.
//!
//! A [`TemplateEditor`] pairs an unmodified copy of a template with a
//! [`TemplateEditState`]. Rendering, saving and exporting all go through
//! [`rewrite_markup`]; the template itself is never changed, so catalog
//! lookups keep returning the original.

use std::ops::RangeInclusive;

use image::RgbaImage;
use resvg::tiny_skia::Transform;
use resvg::usvg::Options;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::rewrite::{Substitution, rewrite_markup};
use super::{ColorPreset, LogoTemplate, find_template};
use crate::color::is_valid_hex;
use crate::export::{ExportFormat, ExportedFile, export_file_name};
use crate::raster::render_svg;

pub const TEMPLATE_LOGO_SIZE_RANGE: RangeInclusive<u32> = 50..=150;
pub const TEMPLATE_ROTATION_RANGE: RangeInclusive<i32> = -45..=45;
pub const TEXT_SIZE_RANGE: RangeInclusive<u32> = 10..=20;
pub const SUBTEXT_SIZE_RANGE: RangeInclusive<u32> = 6..=12;

const DEFAULT_CUSTOM_TEXT: &str = "YOUR COMPANY";
const DEFAULT_CUSTOM_SUBTEXT: &str = "TAGLINE";

/// The editable parameters of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TemplateEditState {
    pub custom_text: String,
    pub custom_subtext: String,
    /// Parallel to the template's anchor colors.
    pub selected_colors: Vec<String>,
    /// Percent, 50-150.
    pub logo_size: u32,
    /// Degrees, -45 to 45.
    pub logo_rotation: i32,
    /// Caption size, 10-20.
    pub text_size: u32,
    /// Tagline size, 6-12.
    pub subtext_size: u32,
}

impl TemplateEditState {
    pub const DEFAULT_LOGO_SIZE: u32 = 100;
    pub const DEFAULT_ROTATION: i32 = 0;
    pub const DEFAULT_TEXT_SIZE: u32 = 14;
    pub const DEFAULT_SUBTEXT_SIZE: u32 = 8;

    /// The starting point for editing `template`.
    pub fn for_template(template: &LogoTemplate) -> Self {
        Self {
            custom_text: DEFAULT_CUSTOM_TEXT.to_string(),
            custom_subtext: DEFAULT_CUSTOM_SUBTEXT.to_string(),
            selected_colors: template.colors.clone(),
            logo_size: Self::DEFAULT_LOGO_SIZE,
            logo_rotation: Self::DEFAULT_ROTATION,
            text_size: Self::DEFAULT_TEXT_SIZE,
            subtext_size: Self::DEFAULT_SUBTEXT_SIZE,
        }
    }

    /// Returns a copy with every numeric field inside its domain.
    pub fn clamped(mut self) -> Self {
        self.logo_size = self
            .logo_size
            .clamp(*TEMPLATE_LOGO_SIZE_RANGE.start(), *TEMPLATE_LOGO_SIZE_RANGE.end());
        self.logo_rotation = self
            .logo_rotation
            .clamp(*TEMPLATE_ROTATION_RANGE.start(), *TEMPLATE_ROTATION_RANGE.end());
        self.text_size = self
            .text_size
            .clamp(*TEXT_SIZE_RANGE.start(), *TEXT_SIZE_RANGE.end());
        self.subtext_size = self
            .subtext_size
            .clamp(*SUBTEXT_SIZE_RANGE.start(), *SUBTEXT_SIZE_RANGE.end());
        self
    }
}

// ============================================================================
// TemplateEditor
// ============================================================================

#[derive(Debug, Clone)]
pub struct TemplateEditor {
    template: LogoTemplate,
    state: TemplateEditState,
}

impl TemplateEditor {
    pub fn new(template: &LogoTemplate) -> Self {
        Self {
            template: template.clone(),
            state: TemplateEditState::for_template(template),
        }
    }

    /// Opens a catalog template by id.
    pub fn open(id: &str) -> Option<Self> {
        find_template(id).map(Self::new)
    }

    /// The unmodified template being edited.
    pub fn template(&self) -> &LogoTemplate {
        &self.template
    }

    pub fn state(&self) -> &TemplateEditState {
        &self.state
    }

    /// Replaces the whole edit state, clamped. Colors that do not parse keep
    /// their previous value.
    pub fn set_state(&mut self, state: TemplateEditState) {
        let mut next = state.clamped();
        next.selected_colors.resize(self.template.colors.len(), String::new());
        for (color, previous) in next.selected_colors.iter_mut().zip(&self.state.selected_colors) {
            if !is_valid_hex(color) {
                *color = previous.clone();
            }
        }
        self.state = next;
    }

    pub fn set_custom_text(&mut self, text: impl Into<String>) {
        self.state.custom_text = text.into();
    }

    pub fn set_custom_subtext(&mut self, text: impl Into<String>) {
        self.state.custom_subtext = text.into();
    }

    /// Sets the color that replaces anchor `index`.
    ///
    /// Returns false (and changes nothing) for an unknown index or a
    /// malformed color.
    pub fn set_color(&mut self, index: usize, hex: &str) -> bool {
        match self.state.selected_colors.get_mut(index) {
            Some(slot) if is_valid_hex(hex) => {
                *slot = hex.to_string();
                true
            }
            _ => {
                warn!(index, rejected = hex, "ignoring template color");
                false
            }
        }
    }

    /// Replaces the selected colors with a preset, index by index.
    pub fn apply_preset(&mut self, preset: &ColorPreset) {
        for (i, color) in preset.colors.iter().enumerate() {
            self.set_color(i, color);
        }
    }

    pub fn set_logo_size(&mut self, percent: u32) {
        self.state.logo_size = percent;
        self.state = self.state.clone().clamped();
    }

    pub fn set_logo_rotation(&mut self, degrees: i32) {
        self.state.logo_rotation = degrees;
        self.state = self.state.clone().clamped();
    }

    pub fn set_text_size(&mut self, px: u32) {
        self.state.text_size = px;
        self.state = self.state.clone().clamped();
    }

    pub fn set_subtext_size(&mut self, px: u32) {
        self.state.subtext_size = px;
        self.state = self.state.clone().clamped();
    }

    /// Restores colors, texts and sizes to the template defaults.
    pub fn reset(&mut self) {
        self.state = TemplateEditState::for_template(&self.template);
    }

    /// The template markup with the current edits applied.
    pub fn render_markup(&self) -> String {
        rewrite_markup(
            &self.template.preview,
            &Substitution {
                anchors: &self.template.colors,
                colors: &self.state.selected_colors,
                caption: &self.state.custom_text,
                subtext: &self.state.custom_subtext,
                caption_size: self.state.text_size,
                subtext_size: self.state.subtext_size,
            },
        )
    }

    /// Produces the derived template: same id, edited colors and preview,
    /// named after the caption.
    pub fn save(&self) -> LogoTemplate {
        let saved = LogoTemplate {
            name: format!("{} Logo", self.state.custom_text),
            colors: self.state.selected_colors.clone(),
            preview: self.render_markup(),
            ..self.template.clone()
        };
        info!(id = %saved.id, name = %saved.name, "template saved");
        saved
    }

    /// The edited markup as a downloadable `.svg` file named after the caption.
    pub fn export_svg(&self) -> ExportedFile {
        let file = ExportedFile {
            file_name: export_file_name(&self.state.custom_text, ExportFormat::Svg),
            mime_type: ExportFormat::Svg.mime_type(),
            bytes: self.render_markup().into_bytes(),
        };
        info!(file = %file.file_name, "template exported");
        file
    }

    /// Rasterizes the edited markup at `size x size`, scaled by `logoSize`
    /// and rotated by `logoRotation` around the center.
    pub fn render_preview(&self, size: u32, options: &Options<'_>) -> Option<RgbaImage> {
        let half = size as f32 / 2.0;
        let scale = self.state.logo_size as f32 / 100.0;
        let content = Transform::from_translate(half, half)
            .pre_concat(Transform::from_rotate(self.state.logo_rotation as f32))
            .pre_scale(scale, scale)
            .pre_translate(-half, -half);
        render_svg(&self.render_markup(), size, content, options)
    }
}
