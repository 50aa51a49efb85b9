//! Escaping for user text spliced into SVG markup.

/// Escapes the XML reserved characters in `text`.
///
/// Used for captions and attribute values supplied by the user, so a company
/// name such as `A&B <Labs>` cannot break the surrounding document.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turns a display name into a file-name stem: lowercase, whitespace runs become `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(
            escape_markup(r#"A&B <Labs> "x" 'y'"#),
            "A&amp;B &lt;Labs&gt; &quot;x&quot; &apos;y&apos;"
        );
        assert_eq!(escape_markup("ACME"), "ACME");
    }

    #[test]
    fn slugify_collapses_whitespace() {
        assert_eq!(slugify("Acme  Rocket\tCo"), "acme-rocket-co");
        assert_eq!(slugify("Nexus"), "nexus");
    }
}
