//! Text painting.
//!
//! Character cells come from the bitmap fonts in [`super::font`]; bold is a
//! one-dot double strike, the way thermal heads do it.

use super::canvas::Canvas;
use super::font::FontMetrics;

impl Canvas {
    /// Render a text run with the current style.
    ///
    /// Runs wrap at the layout width and every line they start is aligned on
    /// its own. An inline run after another continues from the pen position.
    pub(super) fn render_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let char_width = self.state.char_width();
        let line_height = self.state.line_height();
        let per_line = (self.layout_width() / char_width).max(1);
        let chars: Vec<char> = text.chars().collect();
        let mut line_start = self.state.x == 0;

        for (i, &ch) in chars.iter().enumerate() {
            if ch == '\n' {
                self.state.x = 0;
                self.state.y += line_height;
                line_start = true;
                continue;
            }

            if self.state.x > 0 && !self.fits(char_width) {
                self.state.x = 0;
                self.state.y += line_height;
                line_start = true;
            }

            if line_start {
                let rest = chars[i..].iter().take_while(|&&c| c != '\n').count();
                self.state.x = self.start_x(rest.min(per_line) * char_width);
                line_start = false;
            }

            self.render_char(ch);
            self.state.x += char_width;
            self.note_extent(self.state.x);
            self.note_bottom(self.state.y + line_height);
        }
    }

    /// Whether one more cell of `char_width` fits on the current line.
    fn fits(&self, char_width: usize) -> bool {
        self.state.x + char_width <= self.layout_width()
    }

    /// Paint a single character cell at the pen position.
    fn render_char(&mut self, ch: char) {
        let style = self.state.style.clone();
        let metrics = FontMetrics::for_font(style.font);
        let width_mult = self.state.width_mult();
        let height_mult = self.state.height_mult();
        let cell_width = metrics.char_width * width_mult;
        let cell_height = metrics.char_height * height_mult;
        let base_x = self.state.x;
        let base_y = self.state.y;

        let glyph = self.glyph(style.font, ch);

        // Inverted text: black cell, glyph erased out of it
        if style.invert {
            for py in base_y..base_y + cell_height {
                for px in base_x..base_x + cell_width {
                    self.set_pixel(px, py, true);
                }
            }
        }
        let ink = !style.invert;

        let strikes: &[usize] = if style.bold { &[0, 1] } else { &[0] };
        for &offset in strikes {
            for gy in 0..metrics.char_height {
                for gx in 0..metrics.char_width {
                    if glyph.get(gy * metrics.char_width + gx).copied().unwrap_or(0) == 0 {
                        continue;
                    }
                    for sy in 0..height_mult {
                        for sx in 0..width_mult {
                            let px = base_x + gx * width_mult + sx + offset;
                            let py = base_y + gy * height_mult + sy;
                            self.set_pixel(px, py, ink);
                        }
                    }
                }
            }
        }

        if style.underline {
            let underline_y = base_y + cell_height - 2;
            for px in base_x..base_x + cell_width {
                self.set_pixel(px, underline_y, ink);
                self.set_pixel(px, underline_y + 1, ink);
            }
        }
    }
}
