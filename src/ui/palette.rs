use std::sync::OnceLock;

use regex::Regex;

/// Swatches offered when creating an event type.
pub const AVAILABLE_COLORS: [&str; 12] = [
    "#10B981", "#3B82F6", "#EF4444", "#F59E0B", "#8B5CF6", "#06B6D4",
    "#EC4899", "#84CC16", "#F97316", "#6366F1", "#14B8A6", "#EAB308",
];

pub fn default_color() -> &'static str {
    AVAILABLE_COLORS[0]
}

/// `#RRGGBB`, either case.
pub fn is_valid_color(color: &str) -> bool {
    static COLOR_RE: OnceLock<Regex> = OnceLock::new();
    COLOR_RE
        .get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("invalid color regex"))
        .is_match(color)
}

/// Splits a valid color into its red, green and blue components.
pub fn rgb(color: &str) -> Option<(u8, u8, u8)> {
    if !is_valid_color(color) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&color[range], 16).ok();
    Some((channel(1..3)?, channel(3..5)?, channel(5..7)?))
}

/// Wraps `text` in a 24-bit ANSI background using the event type's color.
/// Invalid colors leave the text unstyled.
pub fn paint(text: &str, color: &str) -> String {
    match rgb(color) {
        Some((r, g, b)) => format!("\x1b[48;2;{r};{g};{b}m\x1b[97m{text}\x1b[0m"),
        None => text.to_string(),
    }
}
