//! The active branding session and its persistence.
//!
//! A [`BrandingSession`] owns the current branding record and a short history
//! of generated results. Every committed change is written through a
//! [`BrandingStore`], which holds exactly one record: the latest branding.
//! Editors derived from the session ([`LogoCompositor`],
//! [`TemplateEditor`](crate::template::TemplateEditor)) keep their own state
//! and only touch the session when the caller commits a result back.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::branding::{BrandTheme, BrandingRequest, BrandingResponse, CompanyProfile, Focus};
use crate::compositor::LogoCompositor;
use crate::config::CompositorConfig;
use crate::error::{ExportError, StoreError};
use crate::export::ExportedFile;
use crate::markup::slugify;

/// Number of generated results remembered, newest first.
pub const HISTORY_LIMIT: usize = 10;

const FALLBACK_COMPANY_NAME: &str = "Your Company";

// ============================================================================
// Stores
// ============================================================================

/// Persistence for the single "latest branding" record.
pub trait BrandingStore {
    /// Returns the stored record, or `None` when nothing has been saved.
    fn load(&self) -> Result<Option<BrandingResponse>, StoreError>;

    /// Replaces the stored record.
    fn save(&mut self, record: &BrandingResponse) -> Result<(), StoreError>;

    /// Removes the stored record. Clearing an empty store succeeds.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Stores the record as pretty-printed JSON in one file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "latest_branding.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at `dir/latest_branding.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BrandingStore for JsonFileStore {
    fn load(&self) -> Result<Option<BrandingResponse>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, record: &BrandingResponse) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "branding record saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps the serialized record in memory.
///
/// The record still goes through JSON so a value that would not survive the
/// file store does not survive here either.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BrandingStore for MemoryStore {
    fn load(&self) -> Result<Option<BrandingResponse>, StoreError> {
        self.json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StoreError::from)
    }

    fn save(&mut self, record: &BrandingResponse) -> Result<(), StoreError> {
        self.json = Some(serde_json::to_string(record)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.json = None;
        Ok(())
    }
}

// ============================================================================
// BrandingSession
// ============================================================================

pub struct BrandingSession<S: BrandingStore> {
    store: S,
    current: BrandingResponse,
    history: Vec<BrandingResponse>,
}

impl<S: BrandingStore> BrandingSession<S> {
    /// Resumes from the stored record. Returns `Ok(None)` when nothing is stored.
    pub fn open(store: S) -> Result<Option<Self>, StoreError> {
        let Some(current) = store.load()? else {
            debug!("no stored branding record");
            return Ok(None);
        };
        info!(id = %current.id, "branding session resumed");
        Ok(Some(Self {
            store,
            current,
            history: Vec::new(),
        }))
    }

    /// Starts a session from a freshly generated result and persists it.
    pub fn start(mut store: S, response: BrandingResponse) -> Result<Self, StoreError> {
        store.save(&response)?;
        info!(id = %response.id, logos = response.logos.len(), "branding session started");
        Ok(Self {
            store,
            history: vec![response.clone()],
            current: response,
        })
    }

    pub fn current(&self) -> &BrandingResponse {
        &self.current
    }

    /// Generated results, newest first.
    pub fn history(&self) -> &[BrandingResponse] {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Edits the current record and persists it.
    pub fn edit(&mut self, f: impl FnOnce(&mut BrandingResponse)) -> Result<(), StoreError> {
        f(&mut self.current);
        self.store.save(&self.current)
    }

    /// Merges a regenerated result into the current record.
    ///
    /// Only the parts named by `focus` are replaced; brand guidelines follow
    /// only a full regeneration. The fresh result is also remembered in the
    /// history.
    pub fn apply_regenerated(
        &mut self,
        focus: Focus,
        fresh: BrandingResponse,
    ) -> Result<(), StoreError> {
        if focus.covers(Focus::Logo) {
            self.current.logos = fresh.logos.clone();
        }
        if focus.covers(Focus::Tagline) {
            self.current.taglines = fresh.taglines.clone();
        }
        if focus.covers(Focus::Palette) {
            self.current.color_palette = fresh.color_palette.clone();
        }
        if focus.covers(Focus::Typography) {
            self.current.typography = fresh.typography.clone();
        }
        if focus == Focus::All {
            self.current.brand_guidelines = fresh.brand_guidelines.clone();
        }
        info!(?focus, id = %fresh.id, "regenerated result merged");
        self.remember(fresh);
        self.store.save(&self.current)
    }

    fn remember(&mut self, response: BrandingResponse) {
        self.history.insert(0, response);
        self.history.truncate(HISTORY_LIMIT);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The name shown in editors: profile name, then brand name, then a placeholder.
    pub fn company_name(&self) -> &str {
        let profile_name = self.current.company_profile.as_ref().map(|p| p.name.as_str());
        [profile_name, self.current.brand_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or(FALLBACK_COMPANY_NAME)
    }

    /// Usable palette colors of the current record.
    pub fn palette_colors(&self) -> Vec<String> {
        self.current.color_palette.colors()
    }

    pub fn theme(&self) -> BrandTheme {
        BrandTheme::from_palette(&self.current.color_palette)
    }

    /// Builds a request regenerating `focus` with the user's feedback attached.
    pub fn refine_request(
        &self,
        company_id: impl Into<String>,
        feedback: &str,
        focus: Focus,
    ) -> BrandingRequest {
        let profile = self.current.company_profile.clone().unwrap_or_else(|| {
            CompanyProfile::placeholder(self.current.brand_name.as_deref().unwrap_or_default())
        });
        BrandingRequest::new(company_id, profile.with_feedback(feedback)).with_focus(focus)
    }

    /// Opens a raster editor for the logo at `index`.
    ///
    /// The editor is seeded with the company name and palette. When the logo
    /// has an image URL a load for it is already requested; complete it with
    /// the token from [`LogoCompositor::pending_load`]. Returns `None` for an
    /// out-of-range index.
    pub fn logo_editor(&self, index: usize, config: CompositorConfig) -> Option<LogoCompositor> {
        let logo = self.current.logos.get(index)?;
        let mut editor =
            LogoCompositor::for_brand(self.company_name(), &self.palette_colors(), config);
        match &logo.image_url {
            Some(url) => {
                editor.begin_load(url.as_str());
            }
            None => warn!(logo = %logo.id, "logo has no image; editor opens not ready"),
        }
        Some(editor)
    }

    /// Serializes the current record for download.
    pub fn export_json(&self) -> Result<ExportedFile, ExportError> {
        let stem = self
            .current
            .brand_name
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "branding".to_string());
        let bytes = serde_json::to_vec_pretty(&self.current)?;
        Ok(ExportedFile {
            file_name: format!("{stem}-identity.json"),
            mime_type: "application/json",
            bytes,
        })
    }

    /// Ends the session, removing the stored record. Returns the store.
    pub fn clear(mut self) -> Result<S, StoreError> {
        self.store.clear()?;
        info!("branding session cleared");
        Ok(self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branding::{BrandColorPalette, LogoVariation, TaglineVariation};
    use crate::color::PaletteEntry;

    fn response(id: &str) -> BrandingResponse {
        BrandingResponse {
            id: id.to_string(),
            company_id: "acme".to_string(),
            logos: vec![LogoVariation {
                id: format!("{id}-logo"),
                image_url: Some(format!("https://cdn/{id}.png")),
                ..Default::default()
            }],
            taglines: vec![TaglineVariation {
                id: format!("{id}-tagline"),
                text: format!("tagline {id}"),
                ..Default::default()
            }],
            color_palette: BrandColorPalette {
                primary: Some(PaletteEntry::from("#2563EB")),
                secondary: Some(PaletteEntry::from("#1E40AF")),
                ..Default::default()
            },
            brand_guidelines: format!("guidelines {id}"),
            ..Default::default()
        }
    }

    #[test]
    fn open_on_empty_store_is_none() {
        assert!(BrandingSession::open(MemoryStore::new()).unwrap().is_none());
    }

    #[test]
    fn start_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        BrandingSession::start(store.clone(), response("a")).unwrap();
        assert!(dir.path().join("latest_branding.json").exists());

        let session = BrandingSession::open(store).unwrap().unwrap();
        assert_eq!(session.current().id, "a");
        assert!(session.history().is_empty());
    }

    #[test]
    fn edits_are_persisted() {
        let mut session = BrandingSession::start(MemoryStore::new(), response("a")).unwrap();
        session
            .edit(|r| r.brand_name = Some("Acme Rockets".to_string()))
            .unwrap();
        let stored = session.store().load().unwrap().unwrap();
        assert_eq!(stored.brand_name.as_deref(), Some("Acme Rockets"));
    }

    #[test]
    fn regenerate_merges_only_the_focus() {
        let mut session = BrandingSession::start(MemoryStore::new(), response("a")).unwrap();
        session.apply_regenerated(Focus::Tagline, response("b")).unwrap();

        let current = session.current();
        assert_eq!(current.taglines[0].id, "b-tagline");
        assert_eq!(current.logos[0].id, "a-logo");
        assert_eq!(current.brand_guidelines, "guidelines a");
        assert_eq!(current.id, "a");

        session.apply_regenerated(Focus::All, response("c")).unwrap();
        let current = session.current();
        assert_eq!(current.logos[0].id, "c-logo");
        assert_eq!(current.brand_guidelines, "guidelines c");

        let stored = session.store().load().unwrap().unwrap();
        assert_eq!(&stored, session.current());
    }

    #[test]
    fn history_is_newest_first_and_bounded() {
        let mut session = BrandingSession::start(MemoryStore::new(), response("0")).unwrap();
        for i in 1..=12 {
            session
                .apply_regenerated(Focus::Logo, response(&i.to_string()))
                .unwrap();
        }
        let ids: Vec<_> = session.history().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), HISTORY_LIMIT);
        assert_eq!(ids[0], "12");
        assert_eq!(ids[9], "3");

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn company_name_fallback_chain() {
        let mut session = BrandingSession::start(MemoryStore::new(), response("a")).unwrap();
        assert_eq!(session.company_name(), "Your Company");

        session.edit(|r| r.brand_name = Some("Brand".to_string())).unwrap();
        assert_eq!(session.company_name(), "Brand");

        session
            .edit(|r| r.company_profile = Some(CompanyProfile::placeholder("Profile Co")))
            .unwrap();
        assert_eq!(session.company_name(), "Profile Co");
    }

    #[test]
    fn logo_editor_is_seeded_from_the_record() {
        let session = BrandingSession::start(MemoryStore::new(), response("a")).unwrap();
        let editor = session
            .logo_editor(0, CompositorConfig { load_system_fonts: false, ..Default::default() })
            .unwrap();

        assert_eq!(editor.state().primary_color, "#2563EB");
        assert_eq!(editor.state().secondary_color, "#1E40AF");
        assert_eq!(editor.state().text, "Your Company");
        assert_eq!(editor.source(), Some("https://cdn/a.png"));
        assert!(editor.pending_load().is_some());
        assert!(!editor.is_ready());

        assert!(session.logo_editor(5, CompositorConfig::default()).is_none());
    }

    #[test]
    fn json_export_naming() {
        let mut session = BrandingSession::start(MemoryStore::new(), response("a")).unwrap();
        let file = session.export_json().unwrap();
        assert_eq!(file.file_name, "branding-identity.json");
        assert_eq!(file.mime_type, "application/json");

        session.edit(|r| r.brand_name = Some("Acme Labs".to_string())).unwrap();
        let file = session.export_json().unwrap();
        assert_eq!(file.file_name, "acme-labs-identity.json");
        let parsed: BrandingResponse = serde_json::from_slice(&file.bytes).unwrap();
        assert_eq!(&parsed, session.current());
    }

    #[test]
    fn refine_request_carries_feedback() {
        let mut session = BrandingSession::start(MemoryStore::new(), response("a")).unwrap();
        session.edit(|r| r.brand_name = Some("Acme".to_string())).unwrap();
        let request = session.refine_request("99", "warmer colors", Focus::Palette);

        assert_eq!(request.focus, Focus::Palette);
        let profile = request.company_profile.unwrap();
        assert_eq!(profile.name, "Acme");
        assert!(profile.additional_context.unwrap().ends_with("User feedback: warmer colors"));
    }

    #[test]
    fn clear_removes_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let session = BrandingSession::start(store, response("a")).unwrap();
        let store = session.clear().unwrap();
        assert!(!store.path().exists());
        assert!(BrandingSession::open(store).unwrap().is_none());
    }

    #[test]
    fn stored_record_with_odd_palette_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(
            store.path(),
            r##"{"id":"r","company_id":"c","color_palette":{"primary":{"name":"Ocean","rgb":[1,2,3]},"secondary":"#1E40AF"}}"##,
        )
        .unwrap();

        let session = BrandingSession::open(store).unwrap().unwrap();
        assert_eq!(session.palette_colors(), vec!["#1E40AF".to_string()]);
        assert_eq!(session.theme().primary, "#1E40AF");
    }
}
