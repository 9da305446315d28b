// Character-by-character title reveal

/// Successive prefixes of `text`, one per character. Splits on char
/// boundaries so multi-byte titles never produce invalid frames.
pub fn reveal_frames(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .map(move |end| &text[..end])
}
