//! Font metrics and glyph generation for the painter.
//!
//! Uses the Spleen bitmap font family so painted text matches the printer's
//! own fonts in size.

use crate::ir::{Font, StyleState};
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

/// Font dimensions for each font type.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub char_width: usize,
    pub char_height: usize,
}

impl FontMetrics {
    pub const FONT_A: FontMetrics = FontMetrics {
        char_width: 12,
        char_height: 24,
    };

    pub const FONT_B: FontMetrics = FontMetrics {
        char_width: 9,
        char_height: 24,
    };

    pub const FONT_C: FontMetrics = FontMetrics {
        char_width: 9,
        char_height: 17,
    };

    pub fn for_font(font: Font) -> FontMetrics {
        match font {
            Font::A => Self::FONT_A,
            Font::B => Self::FONT_B,
            Font::C => Self::FONT_C,
        }
    }
}

/// Paint state: current style and pen position.
#[derive(Debug, Clone, Default)]
pub struct PaintState {
    pub style: StyleState,
    pub x: usize,
    pub y: usize,
}

impl PaintState {
    pub fn font_metrics(&self) -> FontMetrics {
        FontMetrics::for_font(self.style.font)
    }

    pub fn width_mult(&self) -> usize {
        self.style.width_mult as usize + 1
    }

    pub fn height_mult(&self) -> usize {
        self.style.height_mult as usize + 1
    }

    /// Character cell width with size multipliers.
    pub fn char_width(&self) -> usize {
        self.font_metrics().char_width * self.width_mult()
    }

    /// Line height (character cell height with size multipliers).
    pub fn line_height(&self) -> usize {
        self.font_metrics().char_height * self.height_mult()
    }
}

/// Generate a glyph bitmap for a character.
/// Returns one byte per pixel, 0 (white) or 1 (black).
pub fn generate_glyph(font: Font, ch: char) -> Vec<u8> {
    let metrics = FontMetrics::for_font(font);
    let mut glyph = vec![0u8; metrics.char_width * metrics.char_height];
    let utf8 = ch.to_string();

    // Font A: Spleen 12x24 exactly. Fonts B and C: Spleen 6x12 scaled up.
    let found = match font {
        Font::A => PSF2Font::new(FONT_12X24).ok().and_then(|mut spleen| {
            let rows = spleen.glyph_for_utf8(utf8.as_bytes())?;
            for (row_y, row) in rows.enumerate() {
                for (col_x, on) in row.enumerate() {
                    let idx = row_y * metrics.char_width + col_x;
                    if on && idx < glyph.len() {
                        glyph[idx] = 1;
                    }
                }
            }
            Some(())
        }),
        Font::B | Font::C => PSF2Font::new(FONT_6X12).ok().and_then(|mut spleen| {
            let rows = spleen.glyph_for_utf8(utf8.as_bytes())?;
            let mut src = vec![0u8; 6 * 12];
            for (row_y, row) in rows.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if on && row_y < 12 && col_x < 6 {
                        src[row_y * 6 + col_x] = 1;
                    }
                }
            }
            scale_bitmap(&src, 6, 12, &mut glyph, metrics.char_width, metrics.char_height);
            Some(())
        }),
    };

    if found.is_none() {
        match fallback_glyph(ch, metrics.char_width, metrics.char_height) {
            Some(fb) => glyph = fb,
            None => draw_box(&mut glyph, metrics.char_width, metrics.char_height),
        }
    }

    glyph
}

/// Scale a bitmap using nearest neighbor.
fn scale_bitmap(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    dst: &mut [u8],
    dst_w: usize,
    dst_h: usize,
) {
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let src_idx = (dy * src_h / dst_h) * src_w + dx * src_w / dst_w;
            let dst_idx = dy * dst_w + dx;
            if src_idx < src.len() && dst_idx < dst.len() {
                dst[dst_idx] = src[src_idx];
            }
        }
    }
}

/// Draw a box outline, the glyph for unknown characters.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Fill a rectangular region. Coordinates are clamped to bounds.
fn fill_rect(g: &mut [u8], stride: usize, x1: usize, y1: usize, x2: usize, y2: usize) {
    let h = g.len() / stride;
    for y in y1..y2.min(h) {
        for x in x1..x2.min(stride) {
            g[y * stride + x] = 1;
        }
    }
}

/// Procedural glyphs for the line-drawing characters dividers use when the
/// Spleen font lacks them.
fn fallback_glyph(ch: char, w: usize, h: usize) -> Option<Vec<u8>> {
    let mut g = vec![0u8; w * h];
    let cy = h / 2;
    let cx = w / 2;

    match ch {
        '\u{2500}' => fill_rect(&mut g, w, 0, cy.saturating_sub(1), w, cy + 1), // ─
        '\u{2502}' => fill_rect(&mut g, w, cx.saturating_sub(1), 0, cx + 1, h), // │
        '\u{2550}' => {
            // ═
            fill_rect(&mut g, w, 0, cy.saturating_sub(3), w, cy.saturating_sub(1));
            fill_rect(&mut g, w, 0, cy + 1, w, cy + 3);
        }
        '\u{25A0}' => fill_rect(&mut g, w, w / 6, h / 6, w - w / 6, h - h / 6), // ■
        _ => return None,
    }

    Some(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_metrics() {
        assert_eq!(FontMetrics::FONT_A.char_width, 12);
        assert_eq!(FontMetrics::FONT_A.char_height, 24);
        assert_eq!(FontMetrics::FONT_B.char_width, 9);
        assert_eq!(FontMetrics::FONT_C.char_height, 17);
    }

    #[test]
    fn test_generate_glyph() {
        let glyph = generate_glyph(Font::A, 'A');
        assert_eq!(glyph.len(), 12 * 24);
        assert!(glyph.iter().any(|&p| p != 0));

        let small = generate_glyph(Font::C, 'A');
        assert_eq!(small.len(), 9 * 17);
        assert!(small.iter().any(|&p| p != 0));
    }

    #[test]
    fn test_space_is_blank() {
        assert!(generate_glyph(Font::A, ' ').iter().all(|&p| p == 0));
    }

    #[test]
    fn test_horizontal_line_fallback() {
        let horiz = fallback_glyph('\u{2500}', 12, 24).unwrap();
        assert!(horiz[..12].iter().all(|&p| p == 0), "top row should be empty");
        assert!(horiz[11 * 12..12 * 12].iter().all(|&p| p != 0), "center row should be filled");
    }

    #[test]
    fn test_paint_state_multipliers() {
        let mut state = PaintState::default();
        state.style.width_mult = 1;
        state.style.height_mult = 2;
        assert_eq!(state.char_width(), 24);
        assert_eq!(state.line_height(), 72);
    }
}
