//! Helvetica metrics and WinAnsi encoding for the standard Type 1 font.

use unicode_normalization::UnicodeNormalization;

/// Advance widths (1/1000 em) of Helvetica for bytes 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

/// Width used for bytes outside the ASCII table.
const DEFAULT_WIDTH: u16 = 556;

/// Advance width of an encoded byte in 1/1000 em.
pub fn glyph_width(byte: u8) -> u16 {
    match byte {
        0x20..=0x7E => HELVETICA_ASCII[(byte - 0x20) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Width of encoded text in points at the given font size.
pub fn text_width(encoded: &[u8], font_size: f32) -> f32 {
    let units: u32 = encoded.iter().map(|&b| u32::from(glyph_width(b))).sum();
    units as f32 * font_size / 1000.0
}

/// Encode text for a WinAnsiEncoding font.
///
/// Text is NFC-normalized first so decomposed accents map onto Latin-1.
/// Control characters are dropped and anything else outside the code page
/// becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.nfc() {
        match c {
            ' '..='~' => out.push(c as u8),
            '\u{a0}'..='\u{ff}' => out.push(c as u32 as u8),
            c if c.is_control() => {}
            c => out.push(win_ansi_extra(c).unwrap_or(b'?')),
        }
    }
    out
}

/// Code points WinAnsi places in 0x80..=0x9F.
fn win_ansi_extra(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_widths() {
        assert_eq!(glyph_width(b' '), 278);
        assert_eq!(glyph_width(b'0'), 556);
        assert_eq!(glyph_width(b'@'), 1015);
        assert_eq!(glyph_width(b'W'), 944);
        assert_eq!(glyph_width(b'i'), 222);
        assert_eq!(glyph_width(b'~'), 584);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222 units
        assert!((text_width(b"Hi", 10.0) - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("abc"), b"abc");
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        // decomposed e + combining acute
        assert_eq!(encode_win_ansi("cafe\u{301}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("“x” – €"), vec![0x93, b'x', 0x94, b' ', 0x96, b' ', 0x80]);
        assert_eq!(encode_win_ansi("日本"), b"??");
        assert_eq!(encode_win_ansi("a\u{7}b"), b"ab");
    }
}
