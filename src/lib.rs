//! brandmark-renderer: logo compositing and template customization for
//! generated brand identities.
//!
//! The crate has two editors and the glue that feeds them:
//!
//! * [`LogoCompositor`] composites a logo bitmap onto a square surface with
//!   transform, opacity, caption and background settings, and exports the
//!   result as PNG or JPG.
//! * [`TemplateEditor`](template::TemplateEditor) rewrites the colors and
//!   captions of a catalog SVG template and exports the markup.
//! * [`BrandingSession`](session::BrandingSession) holds the current branding
//!   result, persists it and opens editors seeded from it.
//!
//! # Example
//!
//! ```
//! use brandmark_renderer::template::TemplateEditor;
//!
//! let mut editor = TemplateEditor::open("nexus-tech").unwrap();
//! editor.set_custom_text("Acme");
//! editor.set_color(0, "#FF0000");
//!
//! let svg = editor.export_svg();
//! assert_eq!(svg.file_name, "acme-logo.svg");
//! assert!(String::from_utf8(svg.bytes).unwrap().contains("ACME"));
//! ```

pub mod asset;
pub mod branding;
pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod layer;
pub mod markup;
pub mod raster;
pub mod session;
pub mod state;
pub mod template;

pub use asset::{AssetSlot, LoadOutcome, LoadToken, LogoAsset, SizePx};
pub use branding::{BrandTheme, BrandingRequest, BrandingResponse, Focus};
pub use compositor::LogoCompositor;
pub use config::CompositorConfig;
pub use error::{AssetError, ConfigError, ExportError, StoreError};
pub use export::{ExportFormat, ExportedFile, SizePreset};
pub use layer::{LayerStack, RenderContext, RenderLayer};
pub use session::{BrandingSession, BrandingStore, JsonFileStore, MemoryStore};
pub use state::{CanvasBackground, CompositorState, FontFamily, TextAlign};
