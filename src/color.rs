//! Hex color helpers shared by the compositor and the template rewriter.
//!
//! Every function here is fallback-safe: input that does not parse as a
//! `#rgb` / `#rrggbb` color yields `None` (or is returned unchanged by the
//! adjustment helpers) instead of failing the caller.

use palette::Srgb;
use resvg::tiny_skia::Color;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parses `#rgb`, `#rrggbb`, `rgb` or `rrggbb` into an 8-bit sRGB triple.
///
/// The short form is expanded by doubling each digit, so `#abc` and
/// `#aabbcc` parse to the same color.
pub fn hex_to_rgb(hex: &str) -> Option<Srgb<u8>> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut expanded = [0u8; 3];
            for (slot, c) in expanded.iter_mut().zip(digits.chars()) {
                let doubled: String = [c, c].iter().collect();
                *slot = channel(&doubled)?;
            }
            Some(Srgb::new(expanded[0], expanded[1], expanded[2]))
        }
        6 => Some(Srgb::new(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

/// Encodes floating-point channels as `#rrggbb`.
///
/// Each channel is clamped to 0-255 and rounded before encoding.
pub fn rgb_to_hex(r: f32, g: f32, b: f32) -> String {
    let encode = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", encode(r), encode(g), encode(b))
}

/// Encodes an 8-bit sRGB color as `#rrggbb`.
pub fn srgb_to_hex(color: Srgb<u8>) -> String {
    rgb_to_hex(color.red as f32, color.green as f32, color.blue as f32)
}

/// Moves every channel toward white by `amount` percent of the remaining distance.
///
/// Returns `hex` unchanged when it does not parse or when `amount` is zero.
pub fn lighten(hex: &str, amount: f32) -> String {
    adjust(hex, amount, |channel, t| channel + (255.0 - channel) * t)
}

/// Scales every channel down by `amount` percent of its own value.
///
/// Returns `hex` unchanged when it does not parse or when `amount` is zero.
pub fn darken(hex: &str, amount: f32) -> String {
    adjust(hex, amount, |channel, t| channel * (1.0 - t))
}

fn adjust(hex: &str, amount: f32, f: impl Fn(f32, f32) -> f32) -> String {
    let t = amount.clamp(0.0, 100.0) / 100.0;
    if t == 0.0 {
        return hex.to_string();
    }
    let Some(rgb) = hex_to_rgb(hex) else {
        return hex.to_string();
    };
    rgb_to_hex(
        f(rgb.red as f32, t),
        f(rgb.green as f32, t),
        f(rgb.blue as f32, t),
    )
}

/// Returns `true` if `hex` parses as a color.
pub fn is_valid_hex(hex: &str) -> bool {
    hex_to_rgb(hex).is_some()
}

/// Reads a palette value of unknown shape as a plain string.
///
/// Accepts either a JSON string or an object exposing a string `hex` field.
pub fn pick_hex(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("hex").and_then(Value::as_str),
        _ => None,
    }
}

/// Converts a parsed color into a tiny-skia paint color.
pub fn to_skia_color(color: Srgb<u8>, alpha: u8) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, alpha)
}

// ============================================================================
// PaletteEntry
// ============================================================================

/// A palette value as delivered by the branding backend.
///
/// Backends send either a bare hex string or a swatch object; both forms
/// collapse to a plain hex string through [`PaletteEntry::hex`]. Any other
/// shape is kept as raw JSON and yields no color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteEntry {
    /// `"#2563EB"`
    Hex(String),
    /// `{ "hex": "#2563EB", "name": "Ocean" }`
    Swatch {
        hex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// `{ "name": "Ocean", "rgb": [37, 99, 235] }`, a number, ...
    Other(Value),
}

impl PaletteEntry {
    /// Returns the hex string, if the entry carries one.
    pub fn hex(&self) -> Option<&str> {
        match self {
            Self::Hex(hex) => Some(hex),
            Self::Swatch { hex, .. } => Some(hex),
            Self::Other(value) => pick_hex(value),
        }
    }
}

impl From<&str> for PaletteEntry {
    fn from(hex: &str) -> Self {
        Self::Hex(hex.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLES: [&str; 5] = ["#3b82f6", "#1e40af", "#000000", "#ffffff", "#8b5cf6"];

    #[test]
    fn short_form_expands() {
        assert_eq!(hex_to_rgb("#abc"), hex_to_rgb("#aabbcc"));
        assert_eq!(hex_to_rgb("abc"), Some(Srgb::new(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(hex_to_rgb(""), None);
        assert_eq!(hex_to_rgb("#"), None);
        assert_eq!(hex_to_rgb("#abcd"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
        assert_eq!(hex_to_rgb("#12345678"), None);
        assert_eq!(hex_to_rgb("transparent"), None);
    }

    #[test]
    fn rgb_to_hex_clamps_and_rounds() {
        assert_eq!(rgb_to_hex(-20.0, 300.0, 127.5), "#00ff80");
        assert_eq!(rgb_to_hex(15.4, 15.6, 0.0), "#0f1000");
    }

    #[test]
    fn hex_round_trip_is_idempotent() {
        for hex in SAMPLES {
            let once = srgb_to_hex(hex_to_rgb(hex).unwrap());
            let twice = srgb_to_hex(hex_to_rgb(&once).unwrap());
            assert_eq!(once, hex);
            assert_eq!(once, twice);
        }
        assert_eq!(srgb_to_hex(hex_to_rgb("#3B82F6").unwrap()), "#3b82f6");
    }

    #[test]
    fn zero_amount_is_identity() {
        for hex in SAMPLES.iter().copied().chain(["#3B82F6", "#abc"]) {
            assert_eq!(lighten(hex, 0.0), hex);
            assert_eq!(darken(hex, 0.0), hex);
        }
        let lifted = lighten("#3b82f6", 20.0);
        assert_eq!(darken(&lifted, 0.0), lifted);
    }

    #[test]
    fn full_amount_saturates() {
        for hex in SAMPLES {
            assert_eq!(lighten(hex, 100.0), "#ffffff");
            assert_eq!(darken(hex, 100.0), "#000000");
        }
    }

    #[test]
    fn extremes_are_fixed_points() {
        for amount in [0.0, 10.0, 45.0, 99.0, 100.0] {
            assert_eq!(darken("#000000", amount), "#000000");
            assert_eq!(lighten("#ffffff", amount), "#ffffff");
        }
    }

    #[test]
    fn adjustments_follow_linear_model() {
        // 0x80 = 128 -> 128 + 127 * 0.5 = 191.5 -> 192
        assert_eq!(lighten("#808080", 50.0), "#c0c0c0");
        assert_eq!(darken("#808080", 50.0), "#404040");
        // Out-of-range amounts clamp.
        assert_eq!(lighten("#123456", 250.0), "#ffffff");
        assert_eq!(darken("#123456", -5.0), "#123456");
    }

    #[test]
    fn malformed_input_passes_through() {
        assert_eq!(lighten("not-a-color", 40.0), "not-a-color");
        assert_eq!(darken("#12", 40.0), "#12");
    }

    #[test]
    fn pick_hex_accepts_both_shapes() {
        assert_eq!(pick_hex(&json!("#112233")), Some("#112233"));
        assert_eq!(pick_hex(&json!({ "hex": "#445566", "name": "x" })), Some("#445566"));
        assert_eq!(pick_hex(&json!({ "rgb": [1, 2, 3] })), None);
        assert_eq!(pick_hex(&json!(42)), None);
    }

    #[test]
    fn palette_entry_deserializes_both_shapes() {
        let plain: PaletteEntry = serde_json::from_value(json!("#2563EB")).unwrap();
        let swatch: PaletteEntry =
            serde_json::from_value(json!({ "hex": "#1E40AF", "name": "Navy" })).unwrap();
        assert_eq!(plain.hex(), Some("#2563EB"));
        assert_eq!(swatch.hex(), Some("#1E40AF"));
    }

    #[test]
    fn palette_entry_keeps_unknown_shapes() {
        for value in [json!({ "name": "Ocean", "rgb": [1, 2, 3] }), json!(42), json!({ "hex": 7 })] {
            let entry: PaletteEntry = serde_json::from_value(value.clone()).unwrap();
            assert_eq!(entry, PaletteEntry::Other(value));
            assert_eq!(entry.hex(), None);
        }
    }
}
