//! Caption text with a soft drop shadow.
//!
//! The caption is written out as a one-element SVG document the size of the
//! surface and rasterized with resvg directly onto it. Text shaping and the
//! shadow blur come from usvg; the font database is loaded once when the
//! layer is built.

use resvg::tiny_skia::Transform;
use resvg::usvg::{Options, Tree};
use tracing::warn;

use super::{RenderContext, RenderLayer};
use crate::color::{hex_to_rgb, srgb_to_hex};
use crate::config::CompositorConfig;
use crate::markup::escape_markup;
use crate::raster::svg_options;
use crate::state::{CompositorState, TextAlign};

const FALLBACK_TEXT_COLOR: &str = "#ffffff";

pub struct CaptionLayer {
    options: Options<'static>,
}

impl CaptionLayer {
    pub fn new(config: &CompositorConfig) -> Self {
        Self {
            options: svg_options(config.load_system_fonts),
        }
    }

    /// Horizontal anchor position for `align`.
    pub fn anchor_x(align: TextAlign, config: &CompositorConfig) -> f32 {
        let size = config.surface_size as f32;
        match align {
            TextAlign::Left => config.caption_margin,
            TextAlign::Center => config.center(),
            TextAlign::Right => size - config.caption_margin,
        }
    }

    /// Builds the caption document, or `None` when no caption is shown.
    pub fn caption_svg(state: &CompositorState, config: &CompositorConfig) -> Option<String> {
        let text = state.visible_caption()?;
        let size = config.surface_size;
        let x = Self::anchor_x(state.text_align, config);
        let y = config.center() + config.caption_drop;
        let fill = hex_to_rgb(&state.text_color)
            .map(srgb_to_hex)
            .unwrap_or_else(|| FALLBACK_TEXT_COLOR.to_string());

        Some(format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
                r#"<defs><filter id="caption-shadow" x="-20%" y="-50%" width="140%" height="200%">"#,
                r##"<feDropShadow dx="{offset}" dy="{offset}" stdDeviation="{deviation}" flood-color="#000000" flood-opacity="{opacity}"/>"##,
                r#"</filter></defs>"#,
                r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{font_size}" font-weight="bold" "#,
                r#"fill="{fill}" text-anchor="{anchor}" dominant-baseline="central" filter="url(#caption-shadow)">{text}</text>"#,
                r#"</svg>"#,
            ),
            size = size,
            offset = config.shadow_offset,
            deviation = config.shadow_blur / 2.0,
            opacity = config.shadow_opacity,
            x = x,
            y = y,
            family = state.font_family.css_stack(),
            font_size = state.font_size,
            fill = fill,
            anchor = state.text_align.text_anchor(),
            text = escape_markup(text),
        ))
    }
}

impl RenderLayer for CaptionLayer {
    fn name(&self) -> &'static str {
        "caption"
    }

    fn is_visible(&self, state: &CompositorState) -> bool {
        state.visible_caption().is_some()
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let Some(svg) = Self::caption_svg(ctx.state, ctx.config) else {
            return;
        };
        match Tree::from_str(&svg, &self.options) {
            Ok(tree) => resvg::render(&tree, Transform::identity(), &mut ctx.surface.as_mut()),
            Err(err) => warn!(error = %err, "caption markup rejected"),
        }
    }
}
