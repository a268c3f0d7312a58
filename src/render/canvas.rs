//! # Paint Surface
//!
//! Executes a display list against a 1-bit surface. The same op walk runs
//! twice per rasterization:
//!
//! ```text
//! Program → Canvas::measure(max_width) → intrinsic width/height
//!        → Canvas::paint(width, height) → pixels → GrayImage
//! ```
//!
//! Measuring ignores alignment so the widest run reports its natural width;
//! painting then aligns inside that intrinsic width.

use std::collections::HashMap;

use image::{GrayImage, Luma};

use super::RenderError;
use super::font::{PaintState, generate_glyph};
use crate::ir::{Font, Op, Program, QrErrorLevel, StyleState};
use crate::protocol::Alignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Measure,
    Paint,
}

/// A display list painter.
pub struct Canvas {
    mode: Mode,
    /// Layout width in logical units
    width: usize,
    /// Fixed surface height (paint mode only)
    height: usize,
    /// One byte per pixel, 1 = black
    buffer: Vec<u8>,
    pub(super) state: PaintState,
    /// Widest content seen so far
    extent: usize,
    /// Lowest content edge seen so far
    bottom: usize,
    glyph_cache: HashMap<(Font, char), Vec<u8>>,
}

impl Canvas {
    /// A canvas that only measures, with `max_width` available.
    pub fn measure(max_width: usize) -> Self {
        Self::with_mode(Mode::Measure, max_width, 0)
    }

    /// A canvas that paints into a `width` × `height` surface.
    /// Content outside the surface is clipped.
    pub fn paint(width: usize, height: usize) -> Self {
        Self::with_mode(Mode::Paint, width, height)
    }

    fn with_mode(mode: Mode, width: usize, height: usize) -> Self {
        let buffer = match mode {
            Mode::Measure => Vec::new(),
            Mode::Paint => vec![0u8; width * height],
        };
        Self {
            mode,
            width,
            height,
            buffer,
            state: PaintState::default(),
            extent: 0,
            bottom: 0,
            glyph_cache: HashMap::new(),
        }
    }

    /// Run every op of a program.
    pub fn run(&mut self, program: &Program) -> Result<(), RenderError> {
        for op in program {
            self.process_op(op)?;
        }
        Ok(())
    }

    /// Width text wraps at.
    pub(super) fn layout_width(&self) -> usize {
        self.width
    }

    /// Natural width of everything processed so far, capped at the layout width.
    pub fn intrinsic_width(&self) -> usize {
        self.extent
    }

    /// Natural height of everything processed so far.
    pub fn intrinsic_height(&self) -> usize {
        self.state.y.max(self.bottom)
    }

    /// Process a single display list op.
    fn process_op(&mut self, op: &Op) -> Result<(), RenderError> {
        match op {
            Op::SetAlign(align) => self.state.style.alignment = *align,
            Op::SetFont(font) => self.state.style.font = *font,
            Op::SetBold(enabled) => self.state.style.bold = *enabled,
            Op::SetUnderline(enabled) => self.state.style.underline = *enabled,
            Op::SetInvert(enabled) => self.state.style.invert = *enabled,
            Op::SetSize { height, width } => {
                self.state.style.height_mult = *height;
                self.state.style.width_mult = *width;
            }
            Op::ResetStyle => self.state.style = StyleState::default(),
            Op::Text(text) => self.render_text(text),
            Op::Newline => self.newline(),
            Op::Gap { width, height } => {
                self.note_extent(*width);
                self.state.y += height;
                self.state.x = 0;
            }
            Op::Raster {
                width,
                height,
                data,
            } => self.render_raster(*width, *height, data),
            Op::QrCode {
                data,
                cell_size,
                error_level,
            } => self.render_qrcode(data, *cell_size, *error_level)?,
        }
        Ok(())
    }

    /// Set a pixel (1 = black, 0 = white). Off-surface writes are clipped.
    pub(super) fn set_pixel(&mut self, x: usize, y: usize, black: bool) {
        if self.mode == Mode::Measure || x >= self.width || y >= self.height {
            return;
        }
        self.buffer[y * self.width + x] = u8::from(black);
    }

    /// Left edge for a block of `content_width` under the current alignment.
    pub(super) fn start_x(&self, content_width: usize) -> usize {
        if self.mode == Mode::Measure || content_width >= self.width {
            return 0;
        }
        match self.state.style.alignment {
            Alignment::Left => 0,
            Alignment::Center => (self.width - content_width) / 2,
            Alignment::Right => self.width - content_width,
        }
    }

    pub(super) fn note_extent(&mut self, right: usize) {
        self.extent = self.extent.max(right.min(self.width));
    }

    pub(super) fn note_bottom(&mut self, bottom: usize) {
        self.bottom = self.bottom.max(bottom);
    }

    /// Move to next line.
    pub(super) fn newline(&mut self) {
        self.state.x = 0;
        self.state.y += self.state.line_height();
    }

    /// Get or generate a glyph for the given font and character.
    pub(super) fn glyph(&mut self, font: Font, ch: char) -> Vec<u8> {
        self.glyph_cache
            .entry((font, ch))
            .or_insert_with(|| generate_glyph(font, ch))
            .clone()
    }

    /// Render packed 1-bit raster data as a block.
    fn render_raster(&mut self, width: usize, height: usize, data: &[u8]) {
        let start_x = self.start_x(width);
        let width_bytes = width.div_ceil(8);

        if self.mode == Mode::Paint {
            for row in 0..height {
                for col in 0..width {
                    let byte_idx = row * width_bytes + col / 8;
                    if let Some(byte) = data.get(byte_idx) {
                        let pixel_on = (byte >> (7 - (col % 8))) & 1 == 1;
                        if pixel_on {
                            self.set_pixel(start_x + col, self.state.y + row, true);
                        }
                    }
                }
            }
        }

        self.note_extent(width);
        self.state.y += height;
        self.state.x = 0;
    }

    /// Render a QR code. Fails if the data does not fit any QR version.
    fn render_qrcode(
        &mut self,
        data: &str,
        cell_size: u8,
        error_level: QrErrorLevel,
    ) -> Result<(), RenderError> {
        use qrcode::{EcLevel, QrCode};

        let ec_level = match error_level {
            QrErrorLevel::L => EcLevel::L,
            QrErrorLevel::M => EcLevel::M,
            QrErrorLevel::Q => EcLevel::Q,
            QrErrorLevel::H => EcLevel::H,
        };

        let code = QrCode::with_error_correction_level(data, ec_level)
            .map_err(|e| RenderError::Layout(format!("QR code generation failed: {}", e)))?;

        let cell_size = cell_size.max(1) as usize;
        let qr_size = code.width();
        let pixel_size = qr_size * cell_size;
        let start_x = self.start_x(pixel_size);

        if self.mode == Mode::Paint {
            for qy in 0..qr_size {
                for qx in 0..qr_size {
                    if code[(qx, qy)] != qrcode::Color::Dark {
                        continue;
                    }
                    for cy in 0..cell_size {
                        for cx in 0..cell_size {
                            let px = start_x + qx * cell_size + cx;
                            let py = self.state.y + qy * cell_size + cy;
                            self.set_pixel(px, py, true);
                        }
                    }
                }
            }
        }

        self.note_extent(pixel_size);
        self.state.y += pixel_size;
        self.state.x = 0;

        Ok(())
    }

    /// Copy the surface into a grayscale image (black = 0, white = 255).
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let idx = y as usize * self.width + x as usize;
            let black = self.buffer.get(idx).copied().unwrap_or(0) != 0;
            Luma([if black { 0 } else { 255 }])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(ops: Vec<Op>) -> Program {
        Program { ops }
    }

    #[test]
    fn test_measure_text_width_ignores_alignment() {
        let mut canvas = Canvas::measure(576);
        canvas
            .run(&program(vec![
                Op::SetAlign(Alignment::Center),
                Op::Text("ABCD".into()),
                Op::Newline,
            ]))
            .unwrap();
        assert_eq!(canvas.intrinsic_width(), 4 * 12);
        assert_eq!(canvas.intrinsic_height(), 24);
    }

    #[test]
    fn test_measure_caps_width() {
        let mut canvas = Canvas::measure(100);
        canvas
            .run(&program(vec![Op::Text("X".repeat(40)), Op::Newline]))
            .unwrap();
        // 8 chars (96 units) fit a 100-unit line, 40 chars -> 5 lines
        assert_eq!(canvas.intrinsic_width(), 96);
        assert_eq!(canvas.intrinsic_height(), 5 * 24);
    }

    #[test]
    fn test_gap_reserves_space() {
        let mut canvas = Canvas::measure(576);
        canvas
            .run(&program(vec![Op::Gap {
                width: 64,
                height: 30,
            }]))
            .unwrap();
        assert_eq!((canvas.intrinsic_width(), canvas.intrinsic_height()), (64, 30));
    }

    #[test]
    fn test_paint_raster_right_aligned() {
        let mut canvas = Canvas::paint(16, 1);
        canvas
            .run(&program(vec![
                Op::SetAlign(Alignment::Right),
                Op::Raster {
                    width: 8,
                    height: 1,
                    data: vec![0xFF],
                },
            ]))
            .unwrap();
        let image = canvas.to_image();
        assert_eq!(image.get_pixel(0, 0)[0], 255);
        assert_eq!(image.get_pixel(15, 0)[0], 0);
    }

    #[test]
    fn test_paint_clips_outside_surface() {
        let mut canvas = Canvas::paint(8, 1);
        canvas
            .run(&program(vec![Op::Raster {
                width: 8,
                height: 4,
                data: vec![0xFF; 4],
            }]))
            .unwrap();
        assert_eq!(canvas.to_image().dimensions(), (8, 1));
    }

    #[test]
    fn test_qr_too_large_fails_layout() {
        let mut canvas = Canvas::measure(576);
        let result = canvas.run(&program(vec![Op::QrCode {
            data: "x".repeat(8000),
            cell_size: 4,
            error_level: QrErrorLevel::H,
        }]));
        assert!(matches!(result, Err(RenderError::Layout(_))));
    }
}
