//! The built-in template catalog and color presets.

use std::sync::LazyLock;

use super::{LogoTemplate, TemplateCategory};

/// A named pair of colors offered as a one-click palette in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub colors: [&'static str; 2],
}

pub const COLOR_PRESETS: [ColorPreset; 8] = [
    ColorPreset { name: "Blue", colors: ["#2563EB", "#1E40AF"] },
    ColorPreset { name: "Green", colors: ["#059669", "#10B981"] },
    ColorPreset { name: "Red", colors: ["#DC2626", "#B91C1C"] },
    ColorPreset { name: "Purple Pink", colors: ["#7C3AED", "#EC4899"] },
    ColorPreset { name: "Orange", colors: ["#F59E0B", "#D97706"] },
    ColorPreset { name: "Dark", colors: ["#0F172A", "#64748B"] },
    ColorPreset { name: "Indigo Violet", colors: ["#6366F1", "#8B5CF6"] },
    ColorPreset { name: "Cyan", colors: ["#06B6D4", "#0891B2"] },
];

static CATALOG: LazyLock<Vec<LogoTemplate>> = LazyLock::new(build_catalog);

/// The process-wide, read-only template list in declaration order.
pub fn catalog() -> &'static [LogoTemplate] {
    &CATALOG
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    category: TemplateCategory,
    style: &str,
    colors: [&str; 2],
    is_popular: bool,
    tags: &[&str],
    preview: &str,
) -> LogoTemplate {
    LogoTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category,
        style: style.to_string(),
        colors: colors.iter().map(|c| c.to_string()).collect(),
        preview: preview.to_string(),
        is_popular,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn build_catalog() -> Vec<LogoTemplate> {
    use TemplateCategory::*;

    vec![
        entry(
            "venture-capital",
            "Venture Capital",
            Business,
            "modern",
            ["#2563EB", "#1E40AF"],
            true,
            &["business", "finance", "professional"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <circle cx="100" cy="100" r="70" fill="#2563EB" stroke="#1E40AF" stroke-width="2"/>
  <circle cx="100" cy="100" r="50" fill="none" stroke="white" stroke-width="1.5" opacity="0.3"/>
  <polygon points="100,70 85,90 85,110 100,130 115,110 115,90" fill="white"/>
  <text data-role="caption" x="100" y="165" text-anchor="middle" fill="#2563EB" font-family="Arial, sans-serif" font-size="12" font-weight="bold">VENTURE CAP</text>
</svg>"##,
        ),
        entry(
            "natural-organics",
            "Natural Organics",
            Lifestyle,
            "organic",
            ["#10B981", "#059669"],
            true,
            &["nature", "organic", "eco"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <circle cx="100" cy="100" r="70" fill="white" stroke="#10B981" stroke-width="3"/>
  <ellipse cx="100" cy="90" rx="25" ry="35" fill="#10B981"/>
  <ellipse cx="85" cy="105" rx="20" ry="15" fill="#059669"/>
  <ellipse cx="115" cy="105" rx="20" ry="15" fill="#059669"/>
  <text data-role="caption" x="100" y="165" text-anchor="middle" fill="#10B981" font-family="Arial, sans-serif" font-size="12" font-weight="bold">NATURALS</text>
  <text data-role="subtext" x="100" y="177" text-anchor="middle" fill="#059669" font-family="Arial, sans-serif" font-size="8">ONLY LANE</text>
</svg>"##,
        ),
        entry(
            "wanderlust-travel",
            "Wanderlust Travel",
            Travel,
            "elegant",
            ["#374151", "#6B7280"],
            false,
            &["travel", "luxury", "elegant"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <rect x="50" y="70" width="100" height="70" rx="8" fill="#374151"/>
  <rect x="60" y="80" width="80" height="50" rx="4" fill="#6B7280"/>
  <polygon points="100,95 90,105 100,115 110,105" fill="white"/>
  <text data-role="caption" x="100" y="160" text-anchor="middle" fill="#374151" font-family="serif" font-size="11" font-weight="bold">WANDERLUST</text>
  <text data-role="subtext" x="100" y="172" text-anchor="middle" fill="#6B7280" font-family="serif" font-size="8">LUXURY TRAVEL</text>
</svg>"##,
        ),
        entry(
            "invicta-creative",
            "Invicta Creative",
            Creative,
            "artistic",
            ["#8B5CF6", "#EC4899"],
            true,
            &["creative", "artistic", "colorful"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="invictaGrad" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#8B5CF6"/>
      <stop offset="100%" style="stop-color:#EC4899"/>
    </linearGradient>
  </defs>
  <circle cx="100" cy="100" r="70" fill="url(#invictaGrad)"/>
  <circle cx="100" cy="100" r="30" fill="white" opacity="0.9"/>
  <text x="100" y="105" text-anchor="middle" fill="#8B5CF6" font-family="serif" font-size="20" font-weight="bold">I</text>
  <text data-role="caption" x="100" y="165" text-anchor="middle" fill="#8B5CF6" font-family="serif" font-size="14" font-weight="bold">INVICTA</text>
  <text data-role="subtext" x="100" y="177" text-anchor="middle" fill="#EC4899" font-family="serif" font-size="8">STAND OUT</text>
</svg>"##,
        ),
        entry(
            "premiere-badge",
            "Premiere Badge",
            Business,
            "premium",
            ["#DC2626", "#B91C1C"],
            false,
            &["premium", "badge", "award"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <circle cx="100" cy="100" r="70" fill="#DC2626"/>
  <circle cx="100" cy="100" r="50" fill="none" stroke="white" stroke-width="2"/>
  <polygon points="100,70 110,85 125,85 115,95 120,110 100,105 80,110 85,95 75,85 90,85" fill="white"/>
  <text data-role="caption" x="100" y="160" text-anchor="middle" fill="#DC2626" font-family="Arial, sans-serif" font-size="12" font-weight="bold">PREMIERE</text>
  <text data-role="subtext" x="100" y="172" text-anchor="middle" fill="#B91C1C" font-family="Arial, sans-serif" font-size="8">BRAND OUT</text>
</svg>"##,
        ),
        entry(
            "unity-building",
            "Unity Building",
            Construction,
            "industrial",
            ["#374151", "#6B7280"],
            false,
            &["construction", "building", "industrial"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <rect x="60" y="80" width="80" height="60" fill="#374151"/>
  <rect x="70" y="90" width="12" height="15" fill="#6B7280"/>
  <rect x="86" y="90" width="12" height="15" fill="#6B7280"/>
  <rect x="102" y="90" width="12" height="15" fill="#6B7280"/>
  <rect x="118" y="90" width="12" height="15" fill="#6B7280"/>
  <rect x="70" y="110" width="12" height="15" fill="#6B7280"/>
  <rect x="86" y="110" width="12" height="15" fill="#6B7280"/>
  <rect x="102" y="110" width="12" height="15" fill="#6B7280"/>
  <rect x="118" y="110" width="12" height="15" fill="#6B7280"/>
  <text data-role="caption" x="100" y="160" text-anchor="middle" fill="#374151" font-family="Arial, sans-serif" font-size="11" font-weight="bold">BUILDING CO.</text>
  <text data-role="subtext" x="100" y="172" text-anchor="middle" fill="#6B7280" font-family="Arial, sans-serif" font-size="8">TRUSTED PARTNERS</text>
</svg>"##,
        ),
        entry(
            "nexus-tech",
            "Nexus Tech",
            Technology,
            "minimal",
            ["#3B82F6", "#1E40AF"],
            false,
            &["technology", "minimal", "clean"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <rect x="60" y="60" width="80" height="80" rx="8" fill="none" stroke="#3B82F6" stroke-width="3"/>
  <circle cx="100" cy="100" r="20" fill="#1E40AF"/>
  <circle cx="100" cy="100" r="8" fill="white"/>
  <text data-role="caption" x="100" y="165" text-anchor="middle" fill="#3B82F6" font-family="Arial, sans-serif" font-size="14" font-weight="300">NEXUS</text>
  <text data-role="subtext" x="100" y="177" text-anchor="middle" fill="#1E40AF" font-family="Arial, sans-serif" font-size="8">TECHNOLOGY</text>
</svg>"##,
        ),
        entry(
            "artisan-coffee",
            "Artisan Coffee",
            Food,
            "artisan",
            ["#D97706", "#F59E0B"],
            false,
            &["coffee", "artisan", "food"],
            r##"<svg viewBox="0 0 200 200" xmlns="http://www.w3.org/2000/svg">
  <circle cx="100" cy="100" r="70" fill="#F59E0B"/>
  <ellipse cx="100" cy="95" rx="25" ry="30" fill="#D97706"/>
  <rect x="95" y="70" width="10" height="15" rx="5" fill="#D97706"/>
  <path d="M85 80 Q100 72 115 80" stroke="#D97706" stroke-width="2" fill="none"/>
  <text data-role="caption" x="100" y="160" text-anchor="middle" fill="#D97706" font-family="serif" font-size="12" font-weight="bold">ARTISAN</text>
  <text data-role="subtext" x="100" y="172" text-anchor="middle" fill="#F59E0B" font-family="serif" font-size="8">COFFEE ROASTERS</text>
</svg>"##,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<_> = catalog().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn every_template_parses_and_contains_its_anchors() {
        for template in catalog() {
            assert!(
                roxmltree::Document::parse(&template.preview).is_ok(),
                "{} does not parse",
                template.id
            );
            assert_eq!(template.colors.len(), 2);
            for color in &template.colors {
                assert!(template.preview.contains(color.as_str()), "{} lacks {color}", template.id);
            }
            assert!(template.preview.contains(r#"data-role="caption""#), "{}", template.id);
        }
    }

    #[test]
    fn presets_are_valid_colors() {
        for preset in COLOR_PRESETS {
            assert!(preset.colors.iter().all(|c| crate::color::is_valid_hex(c)));
        }
    }
}
