//! Layer infrastructure for the raster compositor.
//!
//! A render is a fixed sequence of layers drawn onto one square surface:
//!
//! ```text
//! cleared surface
//!     │
//!     ▼
//! ┌────────────┐
//! │ Background │ ◄── canvasBackground fill (skipped when transparent)
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │    Grid    │ ◄── alignment aid, untransformed
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │    Logo    │ ◄── rotate / scale / alpha around the logo origin
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │  Caption   │ ◄── untransformed, drop shadow
//! └────────────┘
//! ```
//!
//! Each layer implements [`RenderLayer`] and reads everything it needs from
//! the [`RenderContext`]. Layers never see each other's transforms; every
//! draw call carries its own.

pub mod background;
pub mod caption;
pub mod grid;
pub mod logo;

pub use background::BackgroundLayer;
pub use caption::CaptionLayer;
pub use grid::GridLayer;
pub use logo::LogoLayer;

use resvg::tiny_skia::Pixmap;
use tracing::trace;

use crate::config::CompositorConfig;
use crate::state::CompositorState;

// ============================================================================
// Render Context
// ============================================================================

/// Everything a layer may read or draw into during one render.
pub struct RenderContext<'a> {
    /// The drawing surface. Starts fully transparent.
    pub surface: Pixmap,

    /// State being rendered.
    pub state: &'a CompositorState,

    /// Surface geometry and typography constants.
    pub config: &'a CompositorConfig,

    /// The logo bitmap, already premultiplied.
    pub logo: &'a Pixmap,
}

impl<'a> RenderContext<'a> {
    /// Creates a context with a cleared surface.
    ///
    /// Returns `None` when the configured surface size is zero.
    pub fn new(
        state: &'a CompositorState,
        config: &'a CompositorConfig,
        logo: &'a Pixmap,
    ) -> Option<Self> {
        let surface = Pixmap::new(config.surface_size, config.surface_size)?;
        Some(Self {
            surface,
            state,
            config,
            logo,
        })
    }

    /// Point the logo is rotated and scaled around.
    ///
    /// Horizontally centered; lifted when a caption reserves space below.
    pub fn logo_origin(&self) -> (f32, f32) {
        let center = self.config.center();
        let lift = if self.state.show_text {
            self.config.caption_lift
        } else {
            0.0
        };
        (center, center - lift)
    }
}

// ============================================================================
// Layer Trait
// ============================================================================

/// One drawing step of the compositor.
pub trait RenderLayer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns false when the layer has nothing to draw for `state`.
    fn is_visible(&self, _state: &CompositorState) -> bool {
        true
    }

    /// Draws onto `ctx.surface`.
    fn draw(&self, ctx: &mut RenderContext<'_>);
}

// ============================================================================
// Layer Stack
// ============================================================================

/// The ordered list of layers a compositor draws on every render.
pub struct LayerStack {
    layers: Vec<Box<dyn RenderLayer>>,
}

impl LayerStack {
    /// Builds the standard stack: background, grid, logo, caption.
    pub fn standard(config: &CompositorConfig) -> Self {
        Self {
            layers: vec![
                Box::new(BackgroundLayer),
                Box::new(GridLayer),
                Box::new(LogoLayer),
                Box::new(CaptionLayer::new(config)),
            ],
        }
    }

    /// Builds a stack from arbitrary layers, drawn in the given order.
    pub fn from_layers(layers: Vec<Box<dyn RenderLayer>>) -> Self {
        Self { layers }
    }

    /// Names of the layers in draw order.
    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Runs every visible layer over a freshly cleared surface.
    pub fn render(
        &self,
        state: &CompositorState,
        config: &CompositorConfig,
        logo: &Pixmap,
    ) -> Option<Pixmap> {
        let mut ctx = RenderContext::new(state, config, logo)?;
        for layer in &self.layers {
            if layer.is_visible(state) {
                trace!(layer = layer.name(), "drawing layer");
                layer.draw(&mut ctx);
            }
        }
        Some(ctx.surface)
    }
}
