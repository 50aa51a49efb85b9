//! Vector logo templates: the static catalog, its queries, and the
//! color / caption rewriter behind the template editor.
//!
//! Queries come in two flavors: free functions over any slice of templates
//! ([`filter`], [`popular`], [`counts`]) and catalog shortcuts over the
//! built-in list ([`filter_templates`], [`popular_templates`],
//! [`find_template`], [`category_counts`]). Results keep catalog
//! declaration order.

pub mod catalog;
pub mod editor;
pub mod rewrite;

pub use catalog::{COLOR_PRESETS, ColorPreset, catalog};
pub use editor::{TemplateEditState, TemplateEditor};
pub use rewrite::{Substitution, rewrite_markup};

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Categories
// ============================================================================

/// Industry grouping of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Business,
    Technology,
    Creative,
    Lifestyle,
    Food,
    Travel,
    Construction,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 7] = [
        Self::Business,
        Self::Technology,
        Self::Creative,
        Self::Lifestyle,
        Self::Food,
        Self::Travel,
        Self::Construction,
    ];

    /// The identifier used in data and filters.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Technology => "technology",
            Self::Creative => "creative",
            Self::Lifestyle => "lifestyle",
            Self::Food => "food",
            Self::Travel => "travel",
            Self::Construction => "construction",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Business => "Business & Finance",
            Self::Technology => "Technology & Innovation",
            Self::Creative => "Creative & Arts",
            Self::Lifestyle => "Lifestyle & Wellness",
            Self::Food => "Food & Beverage",
            Self::Travel => "Travel & Hospitality",
            Self::Construction => "Construction & Real Estate",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A category selection: everything, or exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TemplateCategory),
}

impl CategoryFilter {
    pub const ALL_SENTINEL: &'static str = "all";

    /// Parses `"all"` or a category id.
    pub fn parse(value: &str) -> Option<Self> {
        if value == Self::ALL_SENTINEL {
            Some(Self::All)
        } else {
            TemplateCategory::from_id(value).map(Self::Only)
        }
    }

    pub fn matches(&self, category: TemplateCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "All Templates",
            Self::Only(category) => category.display_name(),
        }
    }
}

impl From<TemplateCategory> for CategoryFilter {
    fn from(category: TemplateCategory) -> Self {
        Self::Only(category)
    }
}

// ============================================================================
// LogoTemplate
// ============================================================================

/// One pre-authored SVG logo design.
///
/// `colors` are the anchor colors the rewriter substitutes; `preview` is the
/// markup. Text elements meant to carry the company name and tagline are
/// tagged `data-role="caption"` and `data-role="subtext"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoTemplate {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub style: String,
    pub colors: Vec<String>,
    pub preview: String,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LogoTemplate {
    /// Case-insensitive substring match on the name or any tag.
    ///
    /// An empty term matches every template.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Templates in `category` whose name or tags contain `search`.
pub fn filter<'a>(
    templates: &'a [LogoTemplate],
    category: CategoryFilter,
    search: &str,
) -> Vec<&'a LogoTemplate> {
    templates
        .iter()
        .filter(|t| category.matches(t.category) && t.matches_search(search))
        .collect()
}

/// Templates flagged popular.
pub fn popular(templates: &[LogoTemplate]) -> Vec<&LogoTemplate> {
    templates.iter().filter(|t| t.is_popular).collect()
}

/// Number of templates under each filter, starting with [`CategoryFilter::All`].
pub fn counts(templates: &[LogoTemplate]) -> Vec<(CategoryFilter, usize)> {
    let mut out = vec![(CategoryFilter::All, templates.len())];
    out.extend(TemplateCategory::ALL.into_iter().map(|category| {
        let n = templates.iter().filter(|t| t.category == category).count();
        (CategoryFilter::Only(category), n)
    }));
    out
}

pub fn filter_templates(category: CategoryFilter, search: &str) -> Vec<&'static LogoTemplate> {
    filter(catalog(), category, search)
}

pub fn popular_templates() -> Vec<&'static LogoTemplate> {
    popular(catalog())
}

/// Looks up a catalog template by id. Always returns the unmodified original.
pub fn find_template(id: &str) -> Option<&'static LogoTemplate> {
    catalog().iter().find(|t| t.id == id)
}

pub fn category_counts() -> Vec<(CategoryFilter, usize)> {
    counts(catalog())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(templates: &[&LogoTemplate]) -> Vec<String> {
        templates.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn all_filter_keeps_declaration_order() {
        let all = filter_templates(CategoryFilter::All, "");
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].id, "venture-capital");
        assert_eq!(all[7].id, "artisan-coffee");
    }

    #[test]
    fn category_filter() {
        let business = filter_templates(TemplateCategory::Business.into(), "");
        assert_eq!(ids(&business), ["venture-capital", "premiere-badge"]);
    }

    #[test]
    fn unique_tag_finds_single_template() {
        let found = filter_templates(CategoryFilter::All, "finance");
        assert_eq!(ids(&found), ["venture-capital"]);

        let found = filter_templates(CategoryFilter::All, "COFFEE");
        assert_eq!(ids(&found), ["artisan-coffee"]);
    }

    #[test]
    fn search_combines_with_category() {
        assert!(filter_templates(TemplateCategory::Food.into(), "finance").is_empty());
        let found = filter_templates(TemplateCategory::Travel.into(), "lux");
        assert_eq!(ids(&found), ["wanderlust-travel"]);
    }

    #[test]
    fn popular_subset() {
        assert_eq!(
            ids(&popular_templates()),
            ["venture-capital", "natural-organics", "invicta-creative"]
        );
    }

    #[test]
    fn counts_per_category() {
        let counts = category_counts();
        assert_eq!(counts[0], (CategoryFilter::All, 8));
        let business = counts
            .iter()
            .find(|(f, _)| *f == CategoryFilter::Only(TemplateCategory::Business))
            .unwrap();
        assert_eq!(business.1, 2);
        let total: usize = counts[1..].iter().map(|(_, n)| n).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn filter_parsing() {
        assert_eq!(CategoryFilter::parse("all"), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::parse("food"),
            Some(CategoryFilter::Only(TemplateCategory::Food))
        );
        assert_eq!(CategoryFilter::parse("sports"), None);
    }

    #[test]
    fn find_by_id() {
        assert_eq!(find_template("nexus-tech").unwrap().name, "Nexus Tech");
        assert!(find_template("missing").is_none());
    }

    #[test]
    fn template_json_shape() {
        let json = serde_json::to_value(find_template("venture-capital").unwrap()).unwrap();
        assert_eq!(json["isPopular"], true);
        assert_eq!(json["category"], "business");

        let parsed: LogoTemplate = serde_json::from_value(serde_json::json!({
            "id": "x", "name": "X", "category": "food", "style": "flat",
            "colors": ["#000000"], "preview": "<svg/>"
        }))
        .unwrap();
        assert!(!parsed.is_popular);
        assert!(parsed.tags.is_empty());
    }
}
