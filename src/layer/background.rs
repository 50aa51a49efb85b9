//! Flood fill of the canvas background.

use tracing::warn;

use super::{RenderContext, RenderLayer};
use crate::color::{hex_to_rgb, to_skia_color};
use crate::state::{CanvasBackground, CompositorState};

/// Fills the whole surface with the canvas background color.
///
/// Draws nothing for the transparent sentinel, leaving the cleared surface
/// (and so the PNG export) transparent.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundLayer;

impl RenderLayer for BackgroundLayer {
    fn name(&self) -> &'static str {
        "background"
    }

    fn is_visible(&self, state: &CompositorState) -> bool {
        !state.canvas_background.is_transparent()
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let CanvasBackground::Color(hex) = &ctx.state.canvas_background else {
            return;
        };
        match hex_to_rgb(hex) {
            Some(rgb) => ctx.surface.fill(to_skia_color(rgb, 255)),
            None => warn!(background = %hex, "skipping unparsable canvas background"),
        }
    }
}
