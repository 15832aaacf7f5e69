//! Stock 8x8 bitmap font shared by all pocket backends.
//!
//! Printable ASCII plus the console glyphs in [`glyphs`]. Rows are stored
//! least-significant-bit first: bit 0 is the leftmost pixel.
//!
//! Text may carry inline control characters:
//! - `'\n'` starts a new line,
//! - `'\t'` advances by four spaces,
//! - `'\u{10}'..='\u{18}'` switch the ink color (see [`escape_color`]).

use crate::color::Color;

pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 8;
/// Blank pixel rows between two text lines, before scaling.
pub const LINE_SPACING: u32 = 2;
/// A tab advances by this many space widths.
pub const TAB_SPACES: u32 = 4;

/// Console glyphs living in the private-use area.
pub mod glyphs {
    pub const CROSS: char = '\u{E0A1}';
    pub const CIRCLE: char = '\u{E0A2}';
    pub const TRIANGLE: char = '\u{E0A3}';
    pub const SQUARE: char = '\u{E0A4}';
    pub const UP: char = '\u{E0A5}';
    pub const DOWN: char = '\u{E0A6}';
    pub const LEFT: char = '\u{E0A7}';
    pub const RIGHT: char = '\u{E0A8}';
    pub const LTRIGGER: char = '\u{E0AD}';
    pub const RTRIGGER: char = '\u{E0AE}';
    pub const SELECT: char = '\u{E0AF}';
    pub const START: char = '\u{E0B1}';
    pub const FULL_BATT: char = '\u{E0B3}';
    pub const EMPTY_BATT: char = '\u{E0B6}';
    pub const POWER: char = '\u{E0B7}';
    pub const CLOCK: char = '\u{E0B8}';
    pub const MEMORY_STICK: char = '\u{E0B9}';
    pub const UP_ARROW: char = '\u{E0BA}';
    pub const DOWN_ARROW: char = '\u{E0BB}';

    /// Battery glyph for a charge level, 0 = full .. 3 = empty.
    pub fn battery(level: u8) -> char {
        char::from_u32(FULL_BATT as u32 + level.min(3) as u32).unwrap_or(EMPTY_BATT)
    }
}

/// Inline escape that restores the caller's color.
pub const COLOR_RESTORE: char = '\u{10}';
pub const COLOR_BLACK: char = '\u{11}';
pub const COLOR_RED: char = '\u{12}';
pub const COLOR_GREEN: char = '\u{13}';
pub const COLOR_BLUE: char = '\u{14}';
pub const COLOR_GRAY: char = '\u{15}';
pub const COLOR_YELLOW: char = '\u{16}';
pub const COLOR_MAGENTA: char = '\u{17}';
pub const COLOR_WHITE: char = '\u{18}';

/// Resolve an inline color escape. `base` is the color the text started with.
pub fn escape_color(ch: char, base: Color) -> Option<Color> {
    Some(match ch {
        COLOR_RESTORE => base,
        COLOR_BLACK => Color::BLACK,
        COLOR_RED => Color::RED,
        COLOR_GREEN => Color::GREEN,
        COLOR_BLUE => Color::BLUE,
        COLOR_GRAY => Color::GRAY,
        COLOR_YELLOW => Color::YELLOW,
        COLOR_MAGENTA => Color::MAGENTA,
        COLOR_WHITE => Color::WHITE,
        _ => return None,
    })
}

/// Horizontal advance of one character at `scale`.
pub fn advance(ch: char, scale: u32) -> u32 {
    match ch {
        '\t' => GLYPH_WIDTH * TAB_SPACES * scale,
        c if (c as u32) < 0x20 => 0,
        _ => GLYPH_WIDTH * scale,
    }
}

/// Width of the widest line of `text`.
pub fn measure_text(text: &str, scale: u32) -> u32 {
    text.split('\n')
        .map(|line| line.chars().map(|c| advance(c, scale)).sum::<u32>())
        .max()
        .unwrap_or(0)
}

/// Distance between two baselines.
pub fn line_height(scale: u32) -> u32 {
    (GLYPH_HEIGHT + LINE_SPACING) * scale
}

/// Height of `text` counting every `'\n'` separated line.
pub fn text_height(text: &str, scale: u32) -> u32 {
    let lines = text.chars().filter(|&c| c == '\n').count() as u32 + 1;
    lines * line_height(scale)
}

/// Walk every lit pixel of `text` drawn at `(x, y)`.
///
/// `plot` receives the top-left corner of a `scale`-sized block and its
/// color. Returns the width of the widest line drawn.
pub fn rasterize(
    text: &str,
    x: i32,
    y: i32,
    scale: u32,
    color: Color,
    mut plot: impl FnMut(i32, i32, Color),
) -> u32 {
    let s = scale.max(1) as i32;
    let mut ink = color;
    let mut cx = x;
    let mut cy = y;
    let mut widest = 0;
    for ch in text.chars() {
        if ch == '\n' {
            widest = widest.max((cx - x) as u32);
            cx = x;
            cy += line_height(scale) as i32;
            continue;
        }
        if let Some(c) = escape_color(ch, color) {
            ink = c;
            continue;
        }
        let step = advance(ch, scale) as i32;
        if step == 0 || ch == '\t' {
            cx += step;
            continue;
        }
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH as i32 {
                if bits & (1 << col) != 0 {
                    plot(cx + col * s, cy + row as i32 * s, ink);
                }
            }
        }
        cx += step;
    }
    widest.max((cx - x) as u32)
}

/// Look up the rows for `ch`, falling back to `'?'`.
pub fn glyph(ch: char) -> &'static [u8; 8] {
    let code = ch as u32;
    if (0x20..0x7f).contains(&code) {
        return &ASCII[(code - 0x20) as usize];
    }
    match ch {
        glyphs::CROSS => &[0x00, 0x63, 0x36, 0x1C, 0x1C, 0x36, 0x63, 0x00],
        glyphs::CIRCLE => &[0x00, 0x1C, 0x22, 0x41, 0x41, 0x22, 0x1C, 0x00],
        glyphs::TRIANGLE => &[0x00, 0x08, 0x14, 0x14, 0x22, 0x22, 0x7F, 0x00],
        glyphs::SQUARE => &[0x00, 0x7F, 0x41, 0x41, 0x41, 0x41, 0x7F, 0x00],
        glyphs::UP => &[0x08, 0x1C, 0x3E, 0x7F, 0x1C, 0x1C, 0x1C, 0x00],
        glyphs::DOWN => &[0x1C, 0x1C, 0x1C, 0x7F, 0x3E, 0x1C, 0x08, 0x00],
        glyphs::LEFT => &[0x08, 0x0C, 0x7E, 0x7F, 0x7E, 0x0C, 0x08, 0x00],
        glyphs::RIGHT => &[0x08, 0x18, 0x3F, 0x7F, 0x3F, 0x18, 0x08, 0x00],
        glyphs::LTRIGGER => &[0x7F, 0x41, 0x45, 0x45, 0x45, 0x5D, 0x41, 0x7F],
        glyphs::RTRIGGER => &[0x7F, 0x41, 0x4D, 0x55, 0x4D, 0x55, 0x41, 0x7F],
        glyphs::SELECT => &[0x00, 0x3E, 0x41, 0x5D, 0x41, 0x3E, 0x00, 0x00],
        glyphs::START => &[0x00, 0x04, 0x0C, 0x1C, 0x0C, 0x04, 0x00, 0x00],
        '\u{E0B3}' => &[0x00, 0x3F, 0x7F, 0x7F, 0x7F, 0x3F, 0x00, 0x00],
        '\u{E0B4}' => &[0x00, 0x3F, 0x6F, 0x6F, 0x6F, 0x3F, 0x00, 0x00],
        '\u{E0B5}' => &[0x00, 0x3F, 0x67, 0x67, 0x67, 0x3F, 0x00, 0x00],
        glyphs::EMPTY_BATT => &[0x00, 0x3F, 0x61, 0x61, 0x61, 0x3F, 0x00, 0x00],
        glyphs::POWER => &[0x20, 0x10, 0x18, 0x3C, 0x18, 0x08, 0x04, 0x00],
        glyphs::CLOCK => &[0x1C, 0x22, 0x49, 0x49, 0x59, 0x41, 0x22, 0x1C],
        glyphs::MEMORY_STICK => &[0x00, 0x3E, 0x22, 0x2A, 0x22, 0x3E, 0x00, 0x00],
        glyphs::UP_ARROW => &[0x08, 0x1C, 0x3E, 0x7F, 0x00, 0x00, 0x00, 0x00],
        glyphs::DOWN_ARROW => &[0x00, 0x00, 0x00, 0x00, 0x7F, 0x3E, 0x1C, 0x08],
        _ => &ASCII[('?' as u32 - 0x20) as usize],
    }
}

#[rustfmt::skip]
static ASCII: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // '!'
    [0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '"'
    [0x36, 0x36, 0x7F, 0x36, 0x7F, 0x36, 0x36, 0x00], // '#'
    [0x0C, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x0C, 0x00], // '$'
    [0x00, 0x63, 0x33, 0x18, 0x0C, 0x66, 0x63, 0x00], // '%'
    [0x1C, 0x36, 0x1C, 0x6E, 0x3B, 0x33, 0x6E, 0x00], // '&'
    [0x06, 0x06, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00], // '\''
    [0x18, 0x0C, 0x06, 0x06, 0x06, 0x0C, 0x18, 0x00], // '('
    [0x06, 0x0C, 0x18, 0x18, 0x18, 0x0C, 0x06, 0x00], // ')'
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // '*'
    [0x00, 0x0C, 0x0C, 0x3F, 0x0C, 0x0C, 0x00, 0x00], // '+'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ','
    [0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00], // '-'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00], // '.'
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // '/'
    [0x3E, 0x63, 0x73, 0x7B, 0x6F, 0x67, 0x3E, 0x00], // '0'
    [0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x3F, 0x00], // '1'
    [0x1E, 0x33, 0x30, 0x1C, 0x06, 0x33, 0x3F, 0x00], // '2'
    [0x1E, 0x33, 0x30, 0x1C, 0x30, 0x33, 0x1E, 0x00], // '3'
    [0x38, 0x3C, 0x36, 0x33, 0x7F, 0x30, 0x78, 0x00], // '4'
    [0x3F, 0x03, 0x1F, 0x30, 0x30, 0x33, 0x1E, 0x00], // '5'
    [0x1C, 0x06, 0x03, 0x1F, 0x33, 0x33, 0x1E, 0x00], // '6'
    [0x3F, 0x33, 0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x00], // '7'
    [0x1E, 0x33, 0x33, 0x1E, 0x33, 0x33, 0x1E, 0x00], // '8'
    [0x1E, 0x33, 0x33, 0x3E, 0x30, 0x18, 0x0E, 0x00], // '9'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x00], // ':'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ';'
    [0x18, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x18, 0x00], // '<'
    [0x00, 0x00, 0x3F, 0x00, 0x00, 0x3F, 0x00, 0x00], // '='
    [0x06, 0x0C, 0x18, 0x30, 0x18, 0x0C, 0x06, 0x00], // '>'
    [0x1E, 0x33, 0x30, 0x18, 0x0C, 0x00, 0x0C, 0x00], // '?'
    [0x3E, 0x63, 0x7B, 0x7B, 0x7B, 0x03, 0x1E, 0x00], // '@'
    [0x0C, 0x1E, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x00], // 'A'
    [0x3F, 0x66, 0x66, 0x3E, 0x66, 0x66, 0x3F, 0x00], // 'B'
    [0x3C, 0x66, 0x03, 0x03, 0x03, 0x66, 0x3C, 0x00], // 'C'
    [0x1F, 0x36, 0x66, 0x66, 0x66, 0x36, 0x1F, 0x00], // 'D'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x46, 0x7F, 0x00], // 'E'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x06, 0x0F, 0x00], // 'F'
    [0x3C, 0x66, 0x03, 0x03, 0x73, 0x66, 0x7C, 0x00], // 'G'
    [0x33, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x33, 0x00], // 'H'
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'I'
    [0x78, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E, 0x00], // 'J'
    [0x67, 0x66, 0x36, 0x1E, 0x36, 0x66, 0x67, 0x00], // 'K'
    [0x0F, 0x06, 0x06, 0x06, 0x46, 0x66, 0x7F, 0x00], // 'L'
    [0x63, 0x77, 0x7F, 0x7F, 0x6B, 0x63, 0x63, 0x00], // 'M'
    [0x63, 0x67, 0x6F, 0x7B, 0x73, 0x63, 0x63, 0x00], // 'N'
    [0x1C, 0x36, 0x63, 0x63, 0x63, 0x36, 0x1C, 0x00], // 'O'
    [0x3F, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x0F, 0x00], // 'P'
    [0x1E, 0x33, 0x33, 0x33, 0x3B, 0x1E, 0x38, 0x00], // 'Q'
    [0x3F, 0x66, 0x66, 0x3E, 0x36, 0x66, 0x67, 0x00], // 'R'
    [0x1E, 0x33, 0x07, 0x0E, 0x38, 0x33, 0x1E, 0x00], // 'S'
    [0x3F, 0x2D, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'T'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0x3F, 0x00], // 'U'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 'V'
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // 'W'
    [0x63, 0x63, 0x36, 0x1C, 0x1C, 0x36, 0x63, 0x00], // 'X'
    [0x33, 0x33, 0x33, 0x1E, 0x0C, 0x0C, 0x1E, 0x00], // 'Y'
    [0x7F, 0x63, 0x31, 0x18, 0x4C, 0x66, 0x7F, 0x00], // 'Z'
    [0x1E, 0x06, 0x06, 0x06, 0x06, 0x06, 0x1E, 0x00], // '['
    [0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00], // '\\'
    [0x1E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x1E, 0x00], // ']'
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // '^'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // '_'
    [0x0C, 0x0C, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // '`'
    [0x00, 0x00, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 'a'
    [0x07, 0x06, 0x06, 0x3E, 0x66, 0x66, 0x3B, 0x00], // 'b'
    [0x00, 0x00, 0x1E, 0x33, 0x03, 0x33, 0x1E, 0x00], // 'c'
    [0x38, 0x30, 0x30, 0x3E, 0x33, 0x33, 0x6E, 0x00], // 'd'
    [0x00, 0x00, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 'e'
    [0x1C, 0x36, 0x06, 0x0F, 0x06, 0x06, 0x0F, 0x00], // 'f'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 'g'
    [0x07, 0x06, 0x36, 0x6E, 0x66, 0x66, 0x67, 0x00], // 'h'
    [0x0C, 0x00, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'i'
    [0x30, 0x00, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E], // 'j'
    [0x07, 0x06, 0x66, 0x36, 0x1E, 0x36, 0x67, 0x00], // 'k'
    [0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'l'
    [0x00, 0x00, 0x33, 0x7F, 0x7F, 0x6B, 0x63, 0x00], // 'm'
    [0x00, 0x00, 0x1F, 0x33, 0x33, 0x33, 0x33, 0x00], // 'n'
    [0x00, 0x00, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 'o'
    [0x00, 0x00, 0x3B, 0x66, 0x66, 0x3E, 0x06, 0x0F], // 'p'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x78], // 'q'
    [0x00, 0x00, 0x3B, 0x6E, 0x66, 0x06, 0x0F, 0x00], // 'r'
    [0x00, 0x00, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x00], // 's'
    [0x08, 0x0C, 0x3E, 0x0C, 0x0C, 0x2C, 0x18, 0x00], // 't'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // 'u'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 'v'
    [0x00, 0x00, 0x63, 0x6B, 0x7F, 0x7F, 0x36, 0x00], // 'w'
    [0x00, 0x00, 0x63, 0x36, 0x1C, 0x36, 0x63, 0x00], // 'x'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 'y'
    [0x00, 0x00, 0x3F, 0x19, 0x0C, 0x26, 0x3F, 0x00], // 'z'
    [0x38, 0x0C, 0x0C, 0x07, 0x0C, 0x0C, 0x38, 0x00], // '{'
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // '|'
    [0x07, 0x0C, 0x0C, 0x38, 0x0C, 0x0C, 0x07, 0x00], // '}'
    [0x6E, 0x3B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_blank() {
        assert!(glyph(' ').iter().all(|&r| r == 0));
    }

    #[test]
    fn unknown_char_falls_back_to_question_mark() {
        assert_eq!(glyph('\u{2603}'), glyph('?'));
    }

    #[test]
    fn console_glyphs_are_distinct_from_fallback() {
        for ch in [
            glyphs::CROSS,
            glyphs::CIRCLE,
            glyphs::TRIANGLE,
            glyphs::SQUARE,
            glyphs::UP_ARROW,
            glyphs::DOWN_ARROW,
            glyphs::POWER,
        ] {
            assert_ne!(glyph(ch), glyph('?'), "{ch:?} has no bitmap");
        }
    }

    #[test]
    fn battery_levels_cover_full_to_empty() {
        assert_eq!(glyphs::battery(0), glyphs::FULL_BATT);
        assert_eq!(glyphs::battery(3), glyphs::EMPTY_BATT);
        assert_eq!(glyphs::battery(9), glyphs::EMPTY_BATT);
    }

    #[test]
    fn tab_is_four_spaces() {
        assert_eq!(measure_text("\t", 1), measure_text("    ", 1));
    }

    #[test]
    fn escapes_take_no_space() {
        assert_eq!(measure_text("\u{16}ab\u{10}", 1), 16);
    }

    #[test]
    fn measure_uses_widest_line() {
        assert_eq!(measure_text("abc\nde", 2), 48);
        assert_eq!(text_height("abc\nde", 2), 2 * line_height(2));
    }

    #[test]
    fn rasterize_switches_color_on_escape() {
        let mut colors = Vec::new();
        rasterize("A\u{12}A", 0, 0, 1, Color::WHITE, |_, _, c| {
            if !colors.contains(&c) {
                colors.push(c);
            }
        });
        assert_eq!(colors, vec![Color::WHITE, Color::RED]);
    }

    #[test]
    fn rasterize_breaks_lines() {
        let mut max_y = 0;
        rasterize("A\nA", 0, 0, 1, Color::WHITE, |_, y, _| max_y = max_y.max(y));
        assert!(max_y >= line_height(1) as i32);
    }
}
