//! Color, caption and font-size substitution for template markup.
//!
//! Markup that parses as XML is rewritten structurally:
//!
//! * color-bearing attributes (`fill`, `stroke`, `stop-color`, `flood-color`,
//!   `color`, and the same properties inside `style`) whose value equals an
//!   anchor color (case-insensitive) take the matching replacement;
//! * elements tagged `data-role="caption"` / `data-role="subtext"` get their
//!   text replaced by the upper-cased, escaped caption / subtext and their
//!   `font-size` set to the caption / subtext size.
//!
//! Edits are spliced into the original text by byte range, so everything
//! else (whitespace, attribute order, comments) is preserved.
//!
//! Markup that does not parse falls back to token substitution over the raw
//! text: anchor colors, a closed list of sample captions and taglines, and
//! the `font-size` literals the catalog uses. Each step is one left-to-right
//! pass, so inserted text is never matched again.
//!
//! When two anchors are equal, the lowest index wins. A replacement that is
//! not a valid hex color leaves its anchor unchanged.

use std::ops::Range;

use roxmltree::{Document, Node};
use tracing::debug;

use crate::color::is_valid_hex;
use crate::markup::escape_markup;

pub const ROLE_ATTR: &str = "data-role";
pub const CAPTION_ROLE: &str = "caption";
pub const SUBTEXT_ROLE: &str = "subtext";

const COLOR_PROPERTIES: [&str; 5] = ["fill", "stroke", "stop-color", "flood-color", "color"];

/// Sample captions baked into the catalog markup.
const CAPTION_TOKENS: [&str; 9] = [
    "YOUR COMPANY",
    "VENTURE CAP",
    "NATURALS",
    "WANDERLUST",
    "INVICTA",
    "PREMIERE",
    "BUILDING CO.",
    "NEXUS",
    "ARTISAN",
];

/// Sample taglines baked into the catalog markup.
const SUBTEXT_TOKENS: [&str; 8] = [
    "TAGLINE",
    "ONLY LANE",
    "LUXURY TRAVEL",
    "STAND OUT",
    "BRAND OUT",
    "TRUSTED PARTNERS",
    "TECHNOLOGY",
    "COFFEE ROASTERS",
];

const CAPTION_FONT_SIZES: [u32; 3] = [14, 12, 16];
const SUBTEXT_FONT_SIZES: [u32; 2] = [8, 11];

/// What to substitute into a template.
#[derive(Debug, Clone, Copy)]
pub struct Substitution<'a> {
    /// The template's anchor colors.
    pub anchors: &'a [String],
    /// Replacement colors, parallel to `anchors`.
    pub colors: &'a [String],
    pub caption: &'a str,
    pub subtext: &'a str,
    pub caption_size: u32,
    pub subtext_size: u32,
}

/// Rewrites `markup` with the colors, texts and sizes of `sub`.
///
/// Pure: the same inputs always produce the same output.
pub fn rewrite_markup(markup: &str, sub: &Substitution<'_>) -> String {
    match Document::parse(markup) {
        Ok(doc) => rewrite_by_role(markup, &doc, sub),
        Err(err) => {
            debug!(error = %err, "template markup is not XML, substituting tokens");
            rewrite_tokens(markup, sub)
        }
    }
}

/// Anchor to replacement pairs, first anchor of each value only.
fn color_map<'a>(sub: &Substitution<'a>) -> Vec<(&'a str, &'a str)> {
    let mut map: Vec<(&str, &str)> = Vec::new();
    for (anchor, selected) in sub.anchors.iter().zip(sub.colors) {
        if map.iter().any(|(a, _)| a.eq_ignore_ascii_case(anchor)) {
            continue;
        }
        let replacement = if is_valid_hex(selected) {
            selected.as_str()
        } else {
            debug!(anchor = %anchor, rejected = %selected, "keeping anchor color");
            anchor.as_str()
        };
        map.push((anchor.as_str(), replacement));
    }
    map
}

fn map_color<'m>(value: &str, map: &[(&str, &'m str)]) -> Option<&'m str> {
    let value = value.trim();
    map.iter()
        .find(|(anchor, _)| anchor.eq_ignore_ascii_case(value))
        .map(|(_, replacement)| *replacement)
}

// ============================================================================
// Structural rewrite
// ============================================================================

fn rewrite_by_role(markup: &str, doc: &Document<'_>, sub: &Substitution<'_>) -> String {
    let colors = color_map(sub);
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    for node in doc.descendants().filter(|n| n.is_element()) {
        let role = match node.attribute(ROLE_ATTR) {
            Some(CAPTION_ROLE) => Some((sub.caption, sub.caption_size)),
            Some(SUBTEXT_ROLE) => Some((sub.subtext, sub.subtext_size)),
            _ => None,
        };
        let font_size = role.map(|(_, size)| size);

        for attr in node.attributes() {
            let name = attr.name();
            if COLOR_PROPERTIES.contains(&name) {
                if let Some(replacement) = map_color(attr.value(), &colors) {
                    edits.push((attr.range_value(), replacement.to_string()));
                }
            } else if name == "style" {
                if let Some(style) = rewrite_style(attr.value(), &colors, font_size) {
                    edits.push((attr.range_value(), style));
                }
            } else if name == "font-size" {
                if let Some(size) = font_size {
                    edits.push((attr.range_value(), size.to_string()));
                }
            }
        }

        if let Some((text, _)) = role {
            replace_text(node, text, &mut edits);
        }
    }

    apply_edits(markup, edits)
}

/// Replaces the first text node owned by `node` and empties the rest.
///
/// A text node belongs to its nearest role element, so a nested role keeps
/// its own text.
fn replace_text(node: Node<'_, '_>, text: &str, edits: &mut Vec<(Range<usize>, String)>) {
    let mut texts = node
        .descendants()
        .filter(|n| n.is_text() && role_owner(*n) == Some(node));
    let Some(first) = texts.next() else {
        debug!(role = ?node.attribute(ROLE_ATTR), "role element has no text to replace");
        return;
    };
    edits.push((first.range(), escape_markup(&text.to_uppercase())));
    edits.extend(texts.map(|rest| (rest.range(), String::new())));
}

fn role_owner<'a, 'i>(node: Node<'a, 'i>) -> Option<Node<'a, 'i>> {
    node.ancestors()
        .find(|n| matches!(n.attribute(ROLE_ATTR), Some(CAPTION_ROLE | SUBTEXT_ROLE)))
}

/// Rewrites color properties (and `font-size` when given) inside a
/// `style` attribute. Returns `None` when nothing changed.
fn rewrite_style(style: &str, colors: &[(&str, &str)], font_size: Option<u32>) -> Option<String> {
    let mut changed = false;
    let declarations: Vec<String> = style
        .split(';')
        .map(|decl| {
            let Some((name, value)) = decl.split_once(':') else {
                return decl.to_string();
            };
            let property = name.trim().to_ascii_lowercase();
            let replacement = if COLOR_PROPERTIES.contains(&property.as_str()) {
                map_color(value, colors).map(str::to_string)
            } else if property == "font-size" {
                font_size.map(|size| format!("{size}px"))
            } else {
                None
            };
            match replacement {
                Some(new_value) => {
                    changed = true;
                    format!("{name}:{new_value}")
                }
                None => decl.to_string(),
            }
        })
        .collect();
    changed.then(|| declarations.join(";"))
}

/// Splices `edits` into `markup`. An edit overlapping one that starts
/// earlier (or the same range pushed earlier) is dropped.
fn apply_edits(markup: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| range.start);
    let mut kept: Vec<(Range<usize>, String)> = Vec::with_capacity(edits.len());
    for (range, text) in edits {
        if let Some((last, _)) = kept.last() {
            if range.start < last.end || range.start == last.start {
                debug!(?range, "dropping overlapping edit");
                continue;
            }
        }
        kept.push((range, text));
    }

    let mut out = markup.to_string();
    for (range, text) in kept.into_iter().rev() {
        out.replace_range(range, &text);
    }
    out
}

// ============================================================================
// Token fallback
// ============================================================================

fn rewrite_tokens(markup: &str, sub: &Substitution<'_>) -> String {
    let colors = color_map(sub);
    let out = replace_tokens_once(markup, &colors, true);

    let caption = escape_markup(&sub.caption.to_uppercase());
    let subtext = escape_markup(&sub.subtext.to_uppercase());
    let texts: Vec<(&str, &str)> = CAPTION_TOKENS
        .iter()
        .map(|t| (*t, caption.as_str()))
        .chain(SUBTEXT_TOKENS.iter().map(|t| (*t, subtext.as_str())))
        .collect();
    let out = replace_tokens_once(&out, &texts, false);

    let attr = |size: u32| format!(r#"font-size="{size}""#);
    let sizes: Vec<(String, String)> = CAPTION_FONT_SIZES
        .iter()
        .map(|s| (attr(*s), attr(sub.caption_size)))
        .chain(SUBTEXT_FONT_SIZES.iter().map(|s| (attr(*s), attr(sub.subtext_size))))
        .collect();
    let sizes: Vec<(&str, &str)> = sizes.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    replace_tokens_once(&out, &sizes, false)
}

/// Replaces every occurrence of each needle in a single left-to-right pass.
///
/// At each position the longest matching needle wins; equal lengths keep
/// list order. Needles must be ASCII.
fn replace_tokens_once(text: &str, tokens: &[(&str, &str)], ignore_case: bool) -> String {
    let mut tokens: Vec<(&str, &str)> = tokens
        .iter()
        .filter(|(needle, _)| !needle.is_empty())
        .copied()
        .collect();
    tokens.sort_by_key(|(needle, _)| std::cmp::Reverse(needle.len()));

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        let hit = tokens.iter().find(|(needle, _)| {
            let end = i + needle.len();
            end <= bytes.len()
                && if ignore_case {
                    bytes[i..end].eq_ignore_ascii_case(needle.as_bytes())
                } else {
                    &bytes[i..end] == needle.as_bytes()
                }
        });
        match hit {
            Some((needle, replacement)) => {
                out.push_str(replacement);
                i += needle.len();
            }
            None => {
                let Some(c) = text[i..].chars().next() else {
                    break;
                };
                out.push(c);
                i += c.len_utf8();
            }
        }
    }
    out
}
