/// UTF-8 en-dash decoded as Windows-1252.
const MOJIBAKE_EN_DASH: &str = "\u{e2}\u{20ac}\u{201c}";

/// Case-folded display text with mis-encoded en-dashes read as hyphens.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase().replace(MOJIBAKE_EN_DASH, "-")
}

pub fn text_matches(text: &str, query: &str) -> bool {
    normalize_text(text).contains(query)
}
