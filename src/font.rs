//! Fixed 8×8 bitmap font.
//!
//! Each glyph is eight rows, top to bottom; bit 7 of a row is the leftmost
//! column. Only digits, uppercase letters and a little punctuation are
//! defined. Lowercase letters fold to their uppercase glyphs.

/// Horizontal advance of one character, in pixels.
pub const GLYPH_WIDTH: i32 = 8;

/// Height of one character, in pixels.
pub const GLYPH_HEIGHT: i32 = 8;

const GLYPHS: &[(char, [u8; 8])] = &[
    ('0', [0x78, 0xCC, 0xDC, 0xFC, 0xEC, 0xCC, 0x78, 0x00]),
    ('1', [0x30, 0x70, 0x30, 0x30, 0x30, 0x30, 0xFC, 0x00]),
    ('2', [0x78, 0xCC, 0x0C, 0x38, 0x60, 0xC0, 0xFC, 0x00]),
    ('3', [0x78, 0xCC, 0x0C, 0x38, 0x0C, 0xCC, 0x78, 0x00]),
    ('4', [0x18, 0x38, 0x58, 0x98, 0xFC, 0x18, 0x18, 0x00]),
    ('5', [0xFC, 0xC0, 0xF8, 0x0C, 0x0C, 0xCC, 0x78, 0x00]),
    ('6', [0x38, 0x60, 0xC0, 0xF8, 0xCC, 0xCC, 0x78, 0x00]),
    ('7', [0xFC, 0x0C, 0x18, 0x30, 0x60, 0x60, 0x60, 0x00]),
    ('8', [0x78, 0xCC, 0xCC, 0x78, 0xCC, 0xCC, 0x78, 0x00]),
    ('9', [0x78, 0xCC, 0xCC, 0x7C, 0x0C, 0x18, 0x70, 0x00]),
    ('A', [0x30, 0x78, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0x00]),
    ('B', [0xF8, 0xCC, 0xCC, 0xF8, 0xCC, 0xCC, 0xF8, 0x00]),
    ('C', [0x78, 0xCC, 0xC0, 0xC0, 0xC0, 0xCC, 0x78, 0x00]),
    ('D', [0xF0, 0xD8, 0xCC, 0xCC, 0xCC, 0xD8, 0xF0, 0x00]),
    ('E', [0xFC, 0xC0, 0xC0, 0xF8, 0xC0, 0xC0, 0xFC, 0x00]),
    ('F', [0xFC, 0xC0, 0xC0, 0xF8, 0xC0, 0xC0, 0xC0, 0x00]),
    ('G', [0x78, 0xCC, 0xC0, 0xDC, 0xCC, 0xCC, 0x7C, 0x00]),
    ('H', [0xCC, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0xCC, 0x00]),
    ('I', [0xFC, 0x30, 0x30, 0x30, 0x30, 0x30, 0xFC, 0x00]),
    ('J', [0x1C, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78, 0x00]),
    ('K', [0xCC, 0xD8, 0xF0, 0xE0, 0xF0, 0xD8, 0xCC, 0x00]),
    ('L', [0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xFC, 0x00]),
    ('M', [0xC6, 0xEE, 0xFE, 0xD6, 0xC6, 0xC6, 0xC6, 0x00]),
    ('N', [0xCC, 0xEC, 0xFC, 0xDC, 0xCC, 0xCC, 0xCC, 0x00]),
    ('O', [0x78, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x00]),
    ('P', [0xF8, 0xCC, 0xCC, 0xF8, 0xC0, 0xC0, 0xC0, 0x00]),
    ('Q', [0x78, 0xCC, 0xCC, 0xCC, 0xDC, 0xD8, 0x6C, 0x00]),
    ('R', [0xF8, 0xCC, 0xCC, 0xF8, 0xF0, 0xD8, 0xCC, 0x00]),
    ('S', [0x78, 0xCC, 0xC0, 0x78, 0x0C, 0xCC, 0x78, 0x00]),
    ('T', [0xFC, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x00]),
    ('U', [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x00]),
    ('V', [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00]),
    ('W', [0xC6, 0xC6, 0xC6, 0xD6, 0xFE, 0xEE, 0xC6, 0x00]),
    ('X', [0xCC, 0xCC, 0x78, 0x30, 0x78, 0xCC, 0xCC, 0x00]),
    ('Y', [0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x30, 0x30, 0x00]),
    ('Z', [0xFC, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0xFC, 0x00]),
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    (':', [0x00, 0x30, 0x30, 0x00, 0x30, 0x30, 0x00, 0x00]),
    ('!', [0x30, 0x30, 0x30, 0x30, 0x30, 0x00, 0x30, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x00]),
    ('-', [0x00, 0x00, 0x00, 0xFC, 0x00, 0x00, 0x00, 0x00]),
    ('/', [0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0x80, 0x00]),
];

/// Looks up the bitmap for `ch`.
#[must_use]
pub fn glyph(ch: char) -> Option<&'static [u8; 8]> {
    let ch = ch.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(candidate, _)| *candidate == ch)
        .map(|(_, rows)| rows)
}

/// Width in pixels of `text` drawn on one line.
#[must_use]
pub fn text_width(text: &str) -> i32 {
    i32::try_from(text.chars().count())
        .unwrap_or(i32::MAX)
        .saturating_mul(GLYPH_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::{glyph, text_width};

    #[test]
    fn lowercase_folds_to_uppercase() {
        assert_eq!(glyph('r'), glyph('R'));
        assert!(glyph('r').is_some());
    }

    #[test]
    fn undefined_characters_have_no_glyph() {
        assert!(glyph('~').is_none());
        assert!(glyph('é').is_none());
    }

    #[test]
    fn space_is_defined_and_blank() {
        assert_eq!(glyph(' '), Some(&[0; 8]));
    }

    #[test]
    fn text_width_counts_chars_not_bytes() {
        assert_eq!(text_width("SCORE"), 40);
        assert_eq!(text_width("é"), 8);
        assert_eq!(text_width(""), 0);
    }
}
