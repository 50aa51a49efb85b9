//! The raster logo compositor.
//!
//! [`LogoCompositor`] owns one editor session: the current
//! [`CompositorState`], the logo [`AssetSlot`], the [`LayerStack`] and the
//! last rendered surface. Every accepted state change re-renders
//! synchronously. Until a logo asset is installed the compositor is *not
//! ready*: rendering yields nothing and exports return `Ok(None)`.
//!
//! # Example
//!
//! ```
//! use brandmark_renderer::{CompositorConfig, ExportFormat, LogoAsset, LogoCompositor};
//! use image::{Rgba, RgbaImage};
//!
//! let config = CompositorConfig { load_system_fonts: false, ..Default::default() };
//! let mut editor = LogoCompositor::for_brand("Acme", &["#2563EB".into()], config);
//!
//! let token = editor.begin_load("memory://logo");
//! let logo = LogoAsset::from_rgba(RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255])));
//! editor.finish_load(token, Ok(logo));
//!
//! editor.update(|s| s.set_rotation(45));
//! let png = editor.export(ExportFormat::Png).unwrap().unwrap();
//! assert_eq!(png.file_name, "acme-logo.png");
//! ```

use std::path::Path;

use image::RgbaImage;
use resvg::tiny_skia::Pixmap;
use tracing::{debug, info, warn};

use crate::asset::{AssetSlot, LoadOutcome, LoadToken, LogoAsset};
use crate::config::CompositorConfig;
use crate::error::{AssetError, ExportError};
use crate::export::{
    ExportFormat, ExportedFile, SizePreset, encode_raster, export_file_name, sized_file_name,
};
use crate::layer::LayerStack;
use crate::raster::{pixmap_to_rgba_image, rgba_image_to_pixmap};
use crate::state::CompositorState;

pub struct LogoCompositor {
    config: CompositorConfig,
    state: CompositorState,
    brand_name: String,
    slot: AssetSlot,
    logo: Option<Pixmap>,
    layers: LayerStack,
    surface: Option<Pixmap>,
    revision: u64,
}

impl LogoCompositor {
    /// Creates a compositor with an explicit opening state.
    pub fn new(
        brand_name: impl Into<String>,
        state: CompositorState,
        config: CompositorConfig,
    ) -> Self {
        let config = config.sanitized();
        let layers = LayerStack::standard(&config);
        Self {
            config,
            state: state.clamped(),
            brand_name: brand_name.into(),
            slot: AssetSlot::new(),
            logo: None,
            layers,
            surface: None,
            revision: 0,
        }
    }

    /// Opens the editor for a brand: the caption is the brand name and the
    /// first two palette colors seed the color fields.
    pub fn for_brand(brand_name: &str, palette: &[String], config: CompositorConfig) -> Self {
        let state = CompositorState::for_brand(brand_name, palette);
        Self::new(brand_name, state, config)
    }

    // ---- Accessors ----

    pub fn state(&self) -> &CompositorState {
        &self.state
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn brand_name(&self) -> &str {
        &self.brand_name
    }

    /// Source of the most recent logo request.
    pub fn source(&self) -> Option<&str> {
        self.slot.source()
    }

    /// The current logo asset, if loaded.
    pub fn asset(&self) -> Option<&LogoAsset> {
        self.slot.current()
    }

    /// Returns true once a logo asset is installed.
    pub fn is_ready(&self) -> bool {
        self.logo.is_some()
    }

    /// Number of renders performed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ---- Asset loading ----

    /// Starts loading a logo from `source` and returns the request token.
    ///
    /// Decoding happens outside the compositor; hand the result back through
    /// [`finish_load`](Self::finish_load) with the same token.
    pub fn begin_load(&mut self, source: impl Into<String>) -> LoadToken {
        self.slot.begin(source)
    }

    /// The token of the most recent load request while it is outstanding.
    pub fn pending_load(&self) -> Option<LoadToken> {
        self.slot.pending_token()
    }

    /// Completes a load. Only the latest request may install its asset.
    pub fn finish_load(
        &mut self,
        token: LoadToken,
        result: Result<LogoAsset, AssetError>,
    ) -> LoadOutcome {
        let outcome = self.slot.complete(token, result);
        self.sync_logo(outcome);
        outcome
    }

    /// Completes a load from encoded image bytes.
    pub fn finish_load_bytes(&mut self, token: LoadToken, bytes: &[u8]) -> LoadOutcome {
        self.finish_load(token, LogoAsset::decode(bytes))
    }

    /// Loads a logo file synchronously.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome, AssetError> {
        let path = path.as_ref();
        let token = self.slot.begin(path.display().to_string());
        match LogoAsset::open(path) {
            Ok(asset) => {
                let outcome = self.slot.install(token, asset);
                self.sync_logo(outcome);
                Ok(outcome)
            }
            Err(err) => {
                let outcome = self.slot.fail(token, &err);
                self.sync_logo(outcome);
                Err(err)
            }
        }
    }

    fn sync_logo(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Installed => {
                self.logo = self.slot.current().and_then(|a| rgba_image_to_pixmap(a.image()));
                if self.logo.is_none() {
                    warn!("logo asset has no pixels; compositor stays not ready");
                    self.surface = None;
                }
                self.rerender();
            }
            LoadOutcome::Failed => {
                self.logo = None;
                self.surface = None;
            }
            LoadOutcome::Stale => {}
        }
    }

    // ---- State changes ----

    /// Applies `f` to a copy of the state and installs the result.
    ///
    /// Out-of-range numbers are clamped and malformed colors fall back to
    /// the previous values.
    pub fn update(&mut self, f: impl FnOnce(&mut CompositorState)) {
        let mut next = self.state.clone();
        f(&mut next);
        self.set_state(next);
    }

    /// Replaces the whole state.
    pub fn set_state(&mut self, state: CompositorState) {
        let next = state.sanitized_against(&self.state);
        if next != self.state {
            self.state = next;
            self.rerender();
        }
    }

    /// Restores size, rotation, opacity and font size, keeping content.
    pub fn reset(&mut self) {
        self.update(CompositorState::reset_presentation);
    }

    // ---- Rendering ----

    fn rerender(&mut self) {
        let Some(logo) = &self.logo else {
            return;
        };
        self.surface = self.layers.render(&self.state, &self.config, logo);
        self.revision = self.revision.wrapping_add(1);
        debug!(revision = self.revision, "compositor rendered");
    }

    /// Renders the current state and returns the surface.
    ///
    /// Returns `None` while no logo is installed.
    pub fn render(&mut self) -> Option<&Pixmap> {
        self.rerender();
        self.surface.as_ref()
    }

    /// The surface from the most recent render.
    pub fn surface(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    /// The most recent render as a straight-alpha image.
    pub fn snapshot(&self) -> Option<RgbaImage> {
        self.surface.as_ref().map(pixmap_to_rgba_image)
    }

    // ---- Export ----

    /// Encodes the current surface.
    ///
    /// Returns `Ok(None)` when no logo is installed and
    /// [`ExportError::Surface`] when one is but could not be drawn. SVG is
    /// rejected before anything is rendered.
    pub fn export(&self, format: ExportFormat) -> Result<Option<ExportedFile>, ExportError> {
        self.export_image(format, None)
    }

    /// Encodes the current surface resampled to `preset`.
    pub fn export_sized(
        &self,
        format: ExportFormat,
        preset: SizePreset,
    ) -> Result<Option<ExportedFile>, ExportError> {
        self.export_image(format, Some(preset))
    }

    fn export_image(
        &self,
        format: ExportFormat,
        preset: Option<SizePreset>,
    ) -> Result<Option<ExportedFile>, ExportError> {
        if format == ExportFormat::Svg {
            warn!("vector export of a raster composition requested");
            return Err(ExportError::Unsupported(format));
        }
        let Some(surface) = self.snapshot() else {
            if self.slot.current().is_some() {
                warn!(%format, "logo installed but nothing was rendered");
                return Err(ExportError::Surface {
                    width: self.config.surface_size,
                    height: self.config.surface_size,
                });
            }
            debug!(%format, "export skipped, logo not ready");
            return Ok(None);
        };

        let (image, file_name) = match preset {
            Some(preset) => (
                preset.resample(&surface),
                sized_file_name(&self.brand_name, format, preset),
            ),
            None => (surface, export_file_name(&self.brand_name, format)),
        };

        let bytes = encode_raster(&image, format, self.config.jpeg_quality).inspect_err(|err| {
            warn!(%format, error = %err, "export failed");
        })?;
        info!(%format, file = %file_name, bytes = bytes.len(), "logo exported");

        Ok(Some(ExportedFile {
            file_name,
            mime_type: format.mime_type(),
            bytes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CanvasBackground;
    use image::Rgba;

    fn config() -> CompositorConfig {
        CompositorConfig {
            surface_size: 120,
            load_system_fonts: false,
            ..CompositorConfig::default()
        }
    }

    fn palette() -> Vec<String> {
        vec!["#2563EB".to_string(), "#1E40AF".to_string()]
    }

    fn red_logo() -> LogoAsset {
        LogoAsset::from_rgba(RgbaImage::from_pixel(30, 20, Rgba([255, 0, 0, 255])))
    }

    fn ready() -> LogoCompositor {
        let mut editor = LogoCompositor::for_brand("Acme Rockets", &palette(), config());
        let token = editor.begin_load("logo.png");
        assert_eq!(editor.finish_load(token, Ok(red_logo())), LoadOutcome::Installed);
        editor
    }

    #[test]
    fn not_ready_renders_and_exports_nothing() {
        let mut editor = LogoCompositor::for_brand("Acme", &palette(), config());
        assert!(!editor.is_ready());
        assert!(editor.render().is_none());
        assert!(editor.export(ExportFormat::Png).unwrap().is_none());
        assert!(editor.export(ExportFormat::Jpg).unwrap().is_none());
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn svg_export_is_unsupported_even_when_not_ready() {
        let editor = LogoCompositor::for_brand("Acme", &palette(), config());
        assert!(matches!(
            editor.export(ExportFormat::Svg),
            Err(ExportError::Unsupported(ExportFormat::Svg))
        ));
    }

    #[test]
    fn install_triggers_render() {
        let editor = ready();
        assert!(editor.is_ready());
        assert_eq!(editor.revision(), 1);
        let surface = editor.snapshot().unwrap();
        assert_eq!(surface.dimensions(), (120, 120));
        // Logo origin is lifted by the caption: (60, 10).
        assert_eq!(surface.get_pixel(60, 10).0, [255, 0, 0, 255]);
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut a = ready();
        let mut b = ready();
        for editor in [&mut a, &mut b] {
            editor.update(|s| {
                s.set_rotation(33);
                s.set_logo_size(140);
                s.set_opacity(70);
                s.show_grid = true;
                s.set_canvas_background("#F3F4F6");
            });
        }
        let first = a.render().unwrap().data().to_vec();
        let again = a.render().unwrap().data().to_vec();
        let other = b.render().unwrap().data().to_vec();
        assert_eq!(first, again);
        assert_eq!(first, other);
    }

    #[test]
    fn every_accepted_change_rerenders() {
        let mut editor = ready();
        let before = editor.revision();
        editor.update(|s| s.set_rotation(90));
        assert_eq!(editor.revision(), before + 1);

        // No-op change does not render again.
        editor.update(|s| s.set_rotation(90));
        assert_eq!(editor.revision(), before + 1);
    }

    #[test]
    fn malformed_color_keeps_last_good() {
        let mut editor = ready();
        editor.update(|s| s.text_color = "#12".to_string());
        assert_eq!(editor.state().text_color, "#FFFFFF");
    }

    #[test]
    fn reset_restores_presentation_only() {
        let mut editor = ready();
        editor.update(|s| {
            s.set_logo_size(180);
            s.set_rotation(270);
            s.set_opacity(10);
            s.set_font_size(100);
            s.text = "New Caption".to_string();
            s.set_primary_color("#00FF00");
            s.set_canvas_background("#000000");
        });
        editor.reset();

        let s = editor.state();
        assert_eq!((s.logo_size, s.rotation, s.opacity, s.font_size), (100, 0, 100, 48));
        assert_eq!(s.text, "New Caption");
        assert_eq!(s.primary_color, "#00FF00");
        assert_eq!(s.canvas_background, CanvasBackground::Color("#000000".into()));
    }

    #[test]
    fn stale_load_does_not_replace_current() {
        let mut editor = LogoCompositor::for_brand("Acme", &palette(), config());
        let slow = editor.begin_load("slow.png");
        let fast = editor.begin_load("fast.png");

        editor.finish_load(fast, Ok(red_logo()));
        let blue = LogoAsset::from_rgba(RgbaImage::from_pixel(5, 5, Rgba([0, 0, 255, 255])));
        assert_eq!(editor.finish_load(slow, Ok(blue)), LoadOutcome::Stale);

        assert_eq!(editor.asset().unwrap().width(), 30);
        assert_eq!(editor.source(), Some("fast.png"));
    }

    #[test]
    fn failed_latest_load_makes_exports_noop() {
        let mut editor = ready();
        let token = editor.begin_load("broken.png");
        assert_eq!(editor.finish_load_bytes(token, b"not an image"), LoadOutcome::Failed);
        assert!(!editor.is_ready());
        assert!(editor.export(ExportFormat::Png).unwrap().is_none());
    }

    #[test]
    fn load_path_reports_errors() {
        let mut editor = LogoCompositor::for_brand("Acme", &palette(), config());
        assert!(editor.load_path("/nonexistent/logo.png").is_err());
        assert!(!editor.is_ready());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        red_logo().image().save(&path).unwrap();
        assert_eq!(editor.load_path(&path).unwrap(), LoadOutcome::Installed);
        assert!(editor.is_ready());
    }

    #[test]
    fn exports_are_named_and_do_not_mutate_state() {
        let editor = ready();
        let state = editor.state().clone();
        let revision = editor.revision();

        let png = editor.export(ExportFormat::Png).unwrap().unwrap();
        assert_eq!(png.file_name, "acme-rockets-logo.png");
        assert_eq!(png.mime_type, "image/png");

        let jpg = editor.export(ExportFormat::Jpg).unwrap().unwrap();
        assert_eq!(jpg.file_name, "acme-rockets-logo.jpg");
        let decoded = image::load_from_memory(&jpg.bytes).unwrap().to_rgb8();
        // Transparent canvas corners become white.
        assert!(decoded.get_pixel(0, 119).0.iter().all(|c| *c > 240));

        assert_eq!(editor.state(), &state);
        assert_eq!(editor.revision(), revision);
    }

    #[test]
    fn sized_export_resamples() {
        let editor = ready();
        let file = editor
            .export_sized(ExportFormat::Png, SizePreset::Favicon)
            .unwrap()
            .unwrap();
        assert_eq!(file.file_name, "acme-rockets-logo-256.png");
        let img = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (256, 256));
    }

    #[test]
    fn repeated_completion_does_not_rerender() {
        let mut editor = LogoCompositor::for_brand("Acme", &palette(), config());
        let token = editor.begin_load("logo.png");
        assert_eq!(editor.pending_load(), Some(token));
        assert_eq!(editor.finish_load(token, Ok(red_logo())), LoadOutcome::Installed);
        assert_eq!(editor.pending_load(), None);
        let revision = editor.revision();

        let blue = LogoAsset::from_rgba(RgbaImage::from_pixel(5, 5, Rgba([0, 0, 255, 255])));
        assert_eq!(editor.finish_load(token, Ok(blue)), LoadOutcome::Stale);
        assert_eq!(editor.revision(), revision);
        assert_eq!(editor.asset().unwrap().width(), 30);
    }

    #[test]
    fn installed_asset_without_pixels_fails_export() {
        let mut editor = ready();
        let token = editor.begin_load("empty.png");
        let empty = LogoAsset::from_rgba(RgbaImage::new(0, 0));
        assert_eq!(editor.finish_load(token, Ok(empty)), LoadOutcome::Installed);

        assert!(!editor.is_ready());
        assert!(editor.surface().is_none());
        assert!(matches!(
            editor.export(ExportFormat::Png),
            Err(ExportError::Surface { width: 120, height: 120 })
        ));
    }
}
