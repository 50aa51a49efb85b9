//! The transformed logo bitmap.

use resvg::tiny_skia::{FilterQuality, PixmapPaint, Transform};

use super::{RenderContext, RenderLayer};
use crate::state::CompositorState;

/// Draws the logo rotated clockwise by `rotation` degrees and scaled
/// uniformly by `logoSize` percent around its own center, at `opacity`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogoLayer;

impl LogoLayer {
    /// Maps logo pixel space onto the surface.
    pub fn transform(
        state: &CompositorState,
        origin: (f32, f32),
        width: u32,
        height: u32,
    ) -> Transform {
        let scale = state.logo_size as f32 / 100.0;
        let (ox, oy) = origin;
        Transform::from_translate(ox, oy)
            .pre_concat(Transform::from_rotate(state.rotation as f32))
            .pre_concat(Transform::from_scale(scale, scale))
            .pre_concat(Transform::from_translate(
                -(width as f32) / 2.0,
                -(height as f32) / 2.0,
            ))
    }
}

impl RenderLayer for LogoLayer {
    fn name(&self) -> &'static str {
        "logo"
    }

    fn is_visible(&self, state: &CompositorState) -> bool {
        state.opacity > 0
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let logo = ctx.logo;
        let transform = Self::transform(ctx.state, ctx.logo_origin(), logo.width(), logo.height());
        let paint = PixmapPaint {
            opacity: ctx.state.opacity as f32 / 100.0,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        ctx.surface.draw_pixmap(0, 0, logo.as_ref(), &paint, transform, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompositorConfig;
    use resvg::tiny_skia::{Color, Pixmap, Point};

    fn red_logo(size: u32) -> Pixmap {
        let mut logo = Pixmap::new(size, size).unwrap();
        logo.fill(Color::from_rgba8(255, 0, 0, 255));
        logo
    }

    fn config() -> CompositorConfig {
        CompositorConfig {
            surface_size: 200,
            caption_lift: 20.0,
            ..CompositorConfig::default()
        }
    }

    #[test]
    fn logo_centers_on_origin() {
        let config = config();
        let mut state = CompositorState::default();
        state.show_text = false;
        let logo = red_logo(40);

        let mut ctx = RenderContext::new(&state, &config, &logo).unwrap();
        LogoLayer.draw(&mut ctx);

        assert_eq!(ctx.surface.pixel(100, 100).unwrap().alpha(), 255);
        assert_eq!(ctx.surface.pixel(85, 85).unwrap().alpha(), 255);
        assert_eq!(ctx.surface.pixel(70, 100).unwrap().alpha(), 0);
    }

    #[test]
    fn caption_lifts_logo() {
        let config = config();
        let state = CompositorState::default();
        let logo = red_logo(20);

        let mut ctx = RenderContext::new(&state, &config, &logo).unwrap();
        LogoLayer.draw(&mut ctx);

        assert_eq!(ctx.surface.pixel(100, 80).unwrap().alpha(), 255);
        assert_eq!(ctx.surface.pixel(100, 100).unwrap().alpha(), 0);
    }

    #[test]
    fn scale_is_uniform_around_center() {
        let mut state = CompositorState::default();
        state.set_logo_size(200);
        let t = LogoLayer::transform(&state, (100.0, 100.0), 10, 20);

        let mut corner = Point::from_xy(0.0, 0.0);
        t.map_point(&mut corner);
        assert_eq!((corner.x, corner.y), (90.0, 80.0));
    }

    #[test]
    fn rotation_is_clockwise() {
        let mut state = CompositorState::default();
        state.set_rotation(90);
        let t = LogoLayer::transform(&state, (0.0, 0.0), 2, 2);

        // The logo's right-middle point ends up below the origin.
        let mut p = Point::from_xy(2.0, 1.0);
        t.map_point(&mut p);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn opacity_fades_logo() {
        let config = config();
        let mut state = CompositorState::default();
        state.show_text = false;
        state.set_opacity(50);
        let logo = red_logo(40);

        let mut ctx = RenderContext::new(&state, &config, &logo).unwrap();
        LogoLayer.draw(&mut ctx);

        let a = ctx.surface.pixel(100, 100).unwrap().alpha();
        assert!((120..=135).contains(&a), "alpha was {a}");
    }

    #[test]
    fn zero_opacity_is_invisible() {
        let mut state = CompositorState::default();
        state.set_opacity(0);
        assert!(!LogoLayer.is_visible(&state));
    }
}
