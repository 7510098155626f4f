//! 3x5 bitmap font for the score and overlay text

use super::pixbuf::{PixelBuf, Rgb};

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;

/// Rows top to bottom, three bits each, most significant bit leftmost.
#[rustfmt::skip]
fn glyph(ch: char) -> u16 {
    match ch.to_ascii_uppercase() {
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b111_001_111_100_111,
        '3' => 0b111_001_011_001_111,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_111_001_111,
        '6' => 0b111_100_111_101_111,
        '7' => 0b111_001_010_010_010,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_111,
        'A' => 0b010_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b011_100_100_100_011,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_110_100_111,
        'F' => 0b111_100_110_100_100,
        'G' => 0b011_100_101_101_011,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'J' => 0b001_001_001_101_010,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_111_101_101,
        'N' => 0b110_101_101_101_101,
        'O' => 0b010_101_101_101_010,
        'P' => 0b110_101_110_100_100,
        'Q' => 0b010_101_101_110_011,
        'R' => 0b110_101_110_101_101,
        'S' => 0b011_100_010_001_110,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'V' => 0b101_101_101_101_010,
        'W' => 0b101_101_111_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_010_010_010,
        'Z' => 0b111_001_010_100_111,
        ':' => 0b000_010_000_010_000,
        '!' => 0b010_010_010_000_010,
        '.' => 0b000_000_000_000_010,
        '-' => 0b000_000_111_000_000,
        _ => 0,
    }
}

fn lit(bits: u16, col: i32, row: i32) -> bool {
    (bits >> (14 - (row * GLYPH_W + col))) & 1 == 1
}

/// Width in pixels of `text` at integer `scale` (one column gap per glyph).
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * (GLYPH_W + 1) - 1) * scale }
}

/// Draw `text` horizontally centred on `cx` with its top at `y`. With an
/// outline colour, every lit pixel is first stamped one pixel out in all
/// eight directions.
pub fn draw_text(
    buf: &mut PixelBuf,
    text: &str,
    cx: i32,
    y: i32,
    scale: i32,
    fill: Rgb,
    outline: Option<Rgb>,
) {
    let scale = scale.max(1);
    let x0 = cx - text_width(text, scale) / 2;
    if let Some(stroke) = outline {
        for (dx, dy) in [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)] {
            stamp(buf, text, x0 + dx, y + dy, scale, stroke);
        }
    }
    stamp(buf, text, x0, y, scale, fill);
}

fn stamp(buf: &mut PixelBuf, text: &str, x0: i32, y: i32, scale: i32, c: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        let bits = glyph(ch);
        let gx = x0 + i as i32 * (GLYPH_W + 1) * scale;
        for row in 0..GLYPH_H {
            for col in 0..GLYPH_W {
                if lit(bits, col, row) {
                    buf.fill_rect(gx + col * scale, y + row * scale, scale, scale, c);
                }
            }
        }
    }
}
