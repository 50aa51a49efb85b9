//! Logo bitmaps and the load-token slot that makes competing loads safe.
//!
//! Decoding a logo is the only asynchronous step in an editor session. The
//! caller asks the [`AssetSlot`] for a [`LoadToken`] when a request starts and
//! hands the decoded result back with that token when it finishes. Only the
//! most recently issued token may install its asset, and only once; late
//! completions of superseded requests and repeated completions are
//! discarded.

use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::error::AssetError;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// ============================================================================
// LogoAsset
// ============================================================================

/// An immutable, decoded logo bitmap.
///
/// Held by the compositor for the lifetime of an editor session and never
/// mutated; transforms are applied at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoAsset {
    image: RgbaImage,
}

impl LogoAsset {
    /// Wraps an already decoded RGBA image.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decodes an encoded bitmap (PNG, JPEG, ...) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self { image })
    }

    /// Reads and decodes a bitmap from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Returns the pixel data.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the intrinsic pixel dimensions.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.image.width(), self.image.height())
    }
}

// ============================================================================
// AssetSlot
// ============================================================================

/// Identifies one load request. Tokens increase monotonically per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The asset became current.
    Installed,
    /// A newer request was issued after this one, or this one already
    /// completed; the result was dropped.
    Stale,
    /// The latest request failed; the slot has no current asset.
    Failed,
}

/// Holds the current logo asset and arbitrates between racing loads.
#[derive(Debug, Default)]
pub struct AssetSlot {
    issued: u64,
    completed: u64,
    source: Option<String>,
    current: Option<LogoAsset>,
}

impl AssetSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load request for `source` and returns its token.
    ///
    /// Any request issued before this one becomes stale.
    pub fn begin(&mut self, source: impl Into<String>) -> LoadToken {
        self.issued = self.issued.wrapping_add(1);
        let source = source.into();
        debug!(token = self.issued, source = %source, "logo load requested");
        self.source = Some(source);
        LoadToken(self.issued)
    }

    /// Completes the request identified by `token`.
    pub fn complete(
        &mut self,
        token: LoadToken,
        result: Result<LogoAsset, AssetError>,
    ) -> LoadOutcome {
        match result {
            Ok(asset) => self.install(token, asset),
            Err(err) => self.fail(token, &err),
        }
    }

    /// Installs `asset` if `token` is still the latest request.
    pub fn install(&mut self, token: LoadToken, asset: LogoAsset) -> LoadOutcome {
        if self.is_stale(token) {
            return LoadOutcome::Stale;
        }
        info!(
            token = token.0,
            width = asset.width(),
            height = asset.height(),
            "logo asset ready"
        );
        self.completed = token.0;
        self.current = Some(asset);
        LoadOutcome::Installed
    }

    /// Records that the request identified by `token` failed.
    ///
    /// Clears the current asset when `token` is the latest request.
    pub fn fail(&mut self, token: LoadToken, err: &AssetError) -> LoadOutcome {
        if self.is_stale(token) {
            return LoadOutcome::Stale;
        }
        warn!(token = token.0, error = %err, "logo asset failed to load");
        self.completed = token.0;
        self.current = None;
        LoadOutcome::Failed
    }

    fn is_stale(&self, token: LoadToken) -> bool {
        if token.0 != self.issued {
            debug!(token = token.0, latest = self.issued, "discarding stale logo load");
            true
        } else if token.0 == self.completed {
            debug!(token = token.0, "discarding repeated logo load completion");
            true
        } else {
            false
        }
    }

    /// Returns true once the latest request installed an asset.
    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the current asset, if any.
    pub fn current(&self) -> Option<&LogoAsset> {
        self.current.as_ref()
    }

    /// Returns the source of the most recent request.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the most recently issued token, if any request was made.
    pub fn latest_token(&self) -> Option<LoadToken> {
        (self.issued > 0).then_some(LoadToken(self.issued))
    }

    /// Returns the latest token while its request is still outstanding.
    pub fn pending_token(&self) -> Option<LoadToken> {
        (self.issued != self.completed).then_some(LoadToken(self.issued))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> LogoAsset {
        LogoAsset::from_rgba(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn decode_png_bytes() {
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let asset = LogoAsset::decode(&bytes).unwrap();
        assert_eq!(asset.dimensions(), SizePx::new(4, 3));
        assert_eq!(asset.image().get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn decode_garbage_is_an_error() {
        assert!(matches!(
            LogoAsset::decode(b"definitely not an image"),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn open_missing_file_is_io_error() {
        assert!(matches!(
            LogoAsset::open("/nonexistent/logo.png"),
            Err(AssetError::Io(_))
        ));
    }

    #[test]
    fn latest_request_wins() {
        let mut slot = AssetSlot::new();
        let first = slot.begin("https://cdn.example/a.png");
        let second = slot.begin("https://cdn.example/b.png");
        assert!(second > first);

        // The second request finishes first and becomes current.
        assert_eq!(slot.complete(second, Ok(solid(2, 2, [0, 0, 255, 255]))), LoadOutcome::Installed);
        // The first request's late completion must not replace it.
        assert_eq!(slot.complete(first, Ok(solid(9, 9, [255, 0, 0, 255]))), LoadOutcome::Stale);

        assert_eq!(slot.current().unwrap().width(), 2);
        assert_eq!(slot.source(), Some("https://cdn.example/b.png"));
    }

    #[test]
    fn stale_failure_does_not_clear_current() {
        let mut slot = AssetSlot::new();
        let first = slot.begin("a");
        let second = slot.begin("b");
        slot.complete(second, Ok(solid(1, 1, [0, 0, 0, 255])));
        let outcome = slot.complete(
            first,
            Err(AssetError::Io(std::io::Error::other("network down"))),
        );
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(slot.is_ready());
    }

    #[test]
    fn failed_latest_load_leaves_slot_not_ready() {
        let mut slot = AssetSlot::new();
        let ok = slot.begin("a");
        slot.complete(ok, Ok(solid(1, 1, [0, 0, 0, 255])));
        assert!(slot.is_ready());

        let bad = slot.begin("b");
        let outcome = slot.complete(bad, Err(AssetError::Io(std::io::Error::other("404"))));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(!slot.is_ready());
        assert_eq!(slot.latest_token(), Some(bad));
    }

    #[test]
    fn a_token_completes_once() {
        let mut slot = AssetSlot::new();
        assert_eq!(slot.pending_token(), None);
        let token = slot.begin("a");
        assert_eq!(slot.pending_token(), Some(token));

        assert_eq!(slot.install(token, solid(3, 3, [0, 0, 0, 255])), LoadOutcome::Installed);
        assert_eq!(slot.pending_token(), None);
        assert_eq!(slot.install(token, solid(7, 7, [0, 0, 0, 255])), LoadOutcome::Stale);
        let err = AssetError::Io(std::io::Error::other("late"));
        assert_eq!(slot.fail(token, &err), LoadOutcome::Stale);

        assert_eq!(slot.current().unwrap().width(), 3);
        assert_eq!(slot.latest_token(), Some(token));
    }
}
