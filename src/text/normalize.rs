use std::borrow::Cow;

/// Unicode vulgar fractions and their ASCII spelling
pub const FRACTION_GLYPHS: [(char, &str); 9] = [
    ('½', "1/2"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
];

fn fraction_for(ch: char) -> Option<&'static str> {
    FRACTION_GLYPHS
        .iter()
        .find(|(glyph, _)| *glyph == ch)
        .map(|(_, ascii)| *ascii)
}

/// Replace fraction glyphs with ASCII fractions.
///
/// A glyph written straight after a digit (`1½`) is separated by a space so
/// the result reads as a mixed number (`1 1/2`). Input without glyphs is
/// returned borrowed.
pub fn replace_fraction_glyphs(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| fraction_for(c).is_some()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    let mut prev: Option<char> = None;
    for ch in s.chars() {
        match fraction_for(ch) {
            Some(ascii) => {
                if prev.is_some_and(|p| p.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push_str(ascii);
            }
            None => out.push(ch),
        }
        prev = Some(ch);
    }
    Cow::Owned(out)
}

/// Lowercase, keep `[a-z0-9]`, turn everything else into single spaces, trim.
pub fn normalize(s: &str) -> String {
    let replaced = replace_fraction_glyphs(s);
    let mut out = String::with_capacity(replaced.len());
    let mut pending_space = false;

    for ch in replaced.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Normalized word list; empty for blank input.
pub fn tokenize(s: &str) -> Vec<String> {
    normalize(s)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
