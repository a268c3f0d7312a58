//! # Barcode Components

use super::{BuildContext, BuildError, TextAlign, Widget};
use crate::ir::{Op, QrErrorLevel};

/// A QR code.
///
/// The payload is encoded at layout time; data that does not fit any QR
/// version fails the layout and with it the whole rasterization.
///
/// ## Example
///
/// ```
/// use starprnt::components::QrCode;
///
/// let qr = QrCode::new("https://example.com").cell_size(6).error_level_high();
/// ```
#[derive(Debug, Clone)]
pub struct QrCode {
    data: String,
    cell_size: u8,
    error_level: QrErrorLevel,
    align: TextAlign,
}

impl QrCode {
    /// Create a new QR code with the given data.
    /// Defaults to center alignment.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            cell_size: 4,
            error_level: QrErrorLevel::M,
            align: TextAlign::Center,
        }
    }

    /// Set the cell (module) size in dots (1-8).
    pub fn cell_size(mut self, size: u8) -> Self {
        self.cell_size = size.clamp(1, 8);
        self
    }

    /// Set error correction level L (~7% recovery).
    pub fn error_level_low(mut self) -> Self {
        self.error_level = QrErrorLevel::L;
        self
    }

    /// Set error correction level H (~30% recovery).
    pub fn error_level_high(mut self) -> Self {
        self.error_level = QrErrorLevel::H;
        self
    }

    /// Set the alignment.
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

impl Widget for QrCode {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        cx.push(Op::SetAlign(self.align.resolve(cx.text_direction())));
        cx.push(Op::QrCode {
            data: self.data.clone(),
            cell_size: self.cell_size,
            error_level: self.error_level,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::WidgetExt;
    use crate::protocol::Alignment;

    #[test]
    fn test_qr_defaults() {
        let program = QrCode::new("hello").build_program(576).unwrap();
        assert_eq!(
            program.ops,
            vec![
                Op::SetAlign(Alignment::Center),
                Op::QrCode {
                    data: "hello".into(),
                    cell_size: 4,
                    error_level: QrErrorLevel::M,
                },
            ]
        );
    }

    #[test]
    fn test_cell_size_is_clamped() {
        let program = QrCode::new("x").cell_size(0).build_program(576).unwrap();
        assert!(matches!(program.ops[1], Op::QrCode { cell_size: 1, .. }));
    }
}
