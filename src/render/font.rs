//! Built-in 5x7 bitmap glyphs for the status boxes.

use crate::render::surface::Surface;
use image::Rgba;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal distance between consecutive glyphs.
pub const GLYPH_ADVANCE: u32 = 6;

/// Rows top to bottom; bit 4 is the leftmost column.
type Glyph = [u8; 7];

fn glyph(c: char) -> Option<Glyph> {
    let rows = match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(rows)
}

/// Draws `text` with its top-left corner at `(x, y)`. Characters without a
/// glyph are skipped but still advance the pen.
pub fn draw_text(surface: &mut Surface, text: &str, x: i64, y: i64, color: Rgba<u8>) {
    for (i, c) in text.chars().enumerate() {
        let pen_x = x + (i as u32 * GLYPH_ADVANCE) as i64;
        let Some(rows) = glyph(c.to_ascii_uppercase()) else {
            continue;
        };
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) != 0 {
                    surface.plot(pen_x + col as i64, y + row as i64, color);
                }
            }
        }
    }
}

/// Pixel width of `text` when drawn.
pub fn text_width(text: &str) -> u32 {
    match text.chars().count() as u32 {
        0 => 0,
        n => (n - 1) * GLYPH_ADVANCE + GLYPH_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba<u8> = Rgba([1, 2, 3, 255]);

    fn lit(surface: &Surface) -> usize {
        surface.image().pixels().filter(|p| **p == INK).count()
    }

    #[test]
    fn every_status_character_has_a_glyph() {
        for c in "0123456789SCOREHEALTH".chars() {
            assert!(glyph(c).is_some(), "missing glyph {}", c);
        }
    }

    #[test]
    fn digits_are_distinct() {
        let glyphs: Vec<Glyph> = ('0'..='9').filter_map(glyph).collect();
        for (i, a) in glyphs.iter().enumerate() {
            for b in &glyphs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn draws_inside_the_text_box() {
        let mut surface = Surface::new(40, 10);
        draw_text(&mut surface, "10", 1, 1, INK);
        assert!(lit(&surface) > 0);
        // The "1" stem sits in the middle column of the first cell.
        assert_eq!(surface.pixel(3, 4), Some(INK));
        assert_eq!(text_width("10"), 11);
        assert_eq!(text_width(""), 0);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let mut surface = Surface::new(20, 10);
        draw_text(&mut surface, "?!", 0, 0, INK);
        assert_eq!(lit(&surface), 0);
    }
}
