//! Alignment grid.
//!
//! The grid is drawn straight onto the surface before the logo, so it shows up
//! in a pixel export when enabled. That matches the editor's behavior and is
//! kept as is.

use palette::Srgb;
use resvg::tiny_skia::{Paint, PathBuilder, Stroke, Transform};
use tracing::warn;

use super::{RenderContext, RenderLayer};
use crate::color::{hex_to_rgb, to_skia_color};
use crate::config::MIN_GRID_CELL;
use crate::state::CompositorState;

#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayer;

impl RenderLayer for GridLayer {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn is_visible(&self, state: &CompositorState) -> bool {
        state.show_grid
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let size = ctx.config.surface_size as f32;
        let cell = ctx.config.grid_cell;
        if !cell.is_finite() || cell < MIN_GRID_CELL {
            warn!(cell, "grid cell out of range, skipping grid");
            return;
        }

        let mut pb = PathBuilder::new();
        let lines = (size / cell).floor() as u32;
        for line in 0..=lines {
            let offset = line as f32 * cell;
            pb.move_to(offset, 0.0);
            pb.line_to(offset, size);
            pb.move_to(0.0, offset);
            pb.line_to(size, offset);
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let rgb = hex_to_rgb(&ctx.config.grid_color).unwrap_or(Srgb::new(0, 0, 0));
        let mut paint = Paint::default();
        paint.set_color(to_skia_color(rgb, ctx.config.grid_alpha));

        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        ctx.surface
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}
