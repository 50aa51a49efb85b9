//! Conversions between tiny-skia pixmaps and `image` buffers, SVG
//! rasterization, and flattening onto an opaque matte for exports.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use tracing::{debug, warn};

// ============================================================================
// SVG Rendering
// ============================================================================

/// Parser options for rendering markup that contains text.
pub fn svg_options(load_system_fonts: bool) -> Options<'static> {
    let mut options = Options::default();
    if load_system_fonts {
        options.fontdb_mut().load_system_fonts();
        debug!(faces = options.fontdb.len(), "loaded system fonts");
    }
    options
}

/// Renders SVG markup onto a transparent `size x size` image.
///
/// The document is scaled to fit (the larger side becomes `size`) and
/// centered; `content` is then applied in output pixel space, so a rotation
/// or scale there pivots around the image center.
///
/// Returns `None` if the markup cannot be parsed or `size` is zero.
pub fn render_svg(
    svg_data: &str,
    size: u32,
    content: Transform,
    options: &Options<'_>,
) -> Option<RgbaImage> {
    let tree = match Tree::from_str(svg_data, options) {
        Ok(tree) => tree,
        Err(err) => {
            warn!(error = %err, "svg markup rejected");
            return None;
        }
    };

    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());
    let dx = (size as f32 - svg_size.width() * scale) / 2.0;
    let dy = (size as f32 - svg_size.height() * scale) / 2.0;

    let mut pixmap = Pixmap::new(size, size)?;
    let fit = Transform::from_translate(dx, dy).pre_scale(scale, scale);
    resvg::render(&tree, content.pre_concat(fit), &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

// ============================================================================
// Pixmap <-> RgbaImage
// ============================================================================

/// Converts a tiny-skia pixmap (premultiplied) to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Converts a straight-alpha image into a premultiplied tiny-skia pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

// ============================================================================
// Flattening
// ============================================================================

/// Flattens `image` over an opaque background color.
///
/// The result has no transparency left, which is what alpha-less formats
/// such as JPEG need.
pub fn flatten_onto(image: &RgbaImage, background: [u8; 3]) -> RgbaImage {
    let mut flat = image.clone();
    for pixel in flat.pixels_mut() {
        let alpha = u32::from(pixel[3]);
        for (channel, matte) in pixel.0.iter_mut().zip(background) {
            let mixed = u32::from(*channel) * alpha + u32::from(matte) * (255 - alpha);
            *channel = ((mixed + 127) / 255) as u8;
        }
        pixel[3] = 255;
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_removes_transparency() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let flat = flatten_onto(&img, [255, 255, 255]);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn flatten_blends_partial_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = flatten_onto(&img, [255, 255, 255]);
        let p = flat.get_pixel(0, 0);
        assert_eq!(p[3], 255);
        assert!(p[0] > 100 && p[0] < 160, "expected mid gray, got {:?}", p);
    }

    #[test]
    fn flatten_uses_the_matte_color() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        let flat = flatten_onto(&img, [10, 20, 30]);
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [200, 100, 50, 255]);
    }

    #[test]
    fn pixmap_round_trip_preserves_opaque_pixels() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([12, 34, 56, 255]));
        img.put_pixel(2, 1, Rgba([0, 0, 0, 0]));

        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let back = pixmap_to_rgba_image(&pixmap);

        assert_eq!(back.get_pixel(0, 0).0, [12, 34, 56, 255]);
        assert_eq!(back.get_pixel(2, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn pixmap_is_premultiplied() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let p = pixmap.pixel(0, 0).unwrap();
        assert_eq!((p.red(), p.alpha()), (128, 128));
    }

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect x="25" y="25" width="50" height="50" fill="#ff0000"/></svg>"##;

    #[test]
    fn render_svg_fits_size() {
        let img = render_svg(SQUARE_SVG, 40, Transform::identity(), &svg_options(false)).unwrap();
        assert_eq!(img.dimensions(), (40, 40));
        assert_eq!(img.get_pixel(20, 20).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(2, 2).0[3], 0);
    }

    #[test]
    fn render_svg_applies_content_transform() {
        // Halving around the center leaves the old square edge empty.
        let half = Transform::from_translate(20.0, 20.0)
            .pre_scale(0.5, 0.5)
            .pre_translate(-20.0, -20.0);
        let img = render_svg(SQUARE_SVG, 40, half, &svg_options(false)).unwrap();
        assert_eq!(img.get_pixel(20, 20).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(12, 12).0[3], 0);
    }

    #[test]
    fn render_svg_rejects_garbage() {
        assert!(render_svg("<svg", 10, Transform::identity(), &svg_options(false)).is_none());
    }

    #[test]
    fn zero_sized_image_has_no_pixmap() {
        assert!(rgba_image_to_pixmap(&RgbaImage::new(0, 5)).is_none());
    }
}
