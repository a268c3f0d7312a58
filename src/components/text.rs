//! # Text Components
//!
//! Components for displaying text with various styles.

use super::{BuildContext, BuildError, TextAlign, Widget};
use crate::ir::{Font, Op};

/// A text component with optional styling.
///
/// Alignment defaults to [`TextAlign::Start`], which follows the inherited
/// text direction.
///
/// ## Example
///
/// ```
/// use starprnt::components::*;
///
/// // Simple text
/// let text = Text::new("Hello, World!");
///
/// // Styled text
/// let styled = Text::new("IMPORTANT")
///     .bold()
///     .center()
///     .size(2, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Text {
    content: String,
    newline: bool,
    bold: bool,
    underline: bool,
    invert: bool,
    font: Option<Font>,
    align: TextAlign,
    height_mult: u8,
    width_mult: u8,
}

impl Text {
    /// Create a new text line.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            newline: true,
            bold: false,
            underline: false,
            invert: false,
            font: None,
            align: TextAlign::Start,
            height_mult: 0,
            width_mult: 0,
        }
    }

    /// Create inline text (no trailing newline).
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            newline: false,
            ..Self::new(content)
        }
    }

    /// Make text bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Underline the text.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Invert the text (white on black).
    pub fn invert(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Set the font.
    pub fn font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    /// Set the alignment.
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Center the text.
    pub fn center(self) -> Self {
        self.align(TextAlign::Center)
    }

    /// Align to the end of the reading direction.
    pub fn end(self) -> Self {
        self.align(TextAlign::End)
    }

    /// Left-align regardless of direction.
    pub fn left(self) -> Self {
        self.align(TextAlign::Left)
    }

    /// Right-align regardless of direction.
    pub fn right(self) -> Self {
        self.align(TextAlign::Right)
    }

    /// Set character size multiplier.
    /// height/width: 0 = 1x, 1 = 2x, etc. Max 7 = 8x.
    pub fn size(mut self, height: u8, width: u8) -> Self {
        self.height_mult = height.min(7);
        self.width_mult = width.min(7);
        self
    }
}

impl Widget for Text {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        cx.push(Op::SetAlign(self.align.resolve(cx.text_direction())));
        if let Some(font) = self.font {
            cx.push(Op::SetFont(font));
        }
        if self.bold {
            cx.push(Op::SetBold(true));
        }
        if self.underline {
            cx.push(Op::SetUnderline(true));
        }
        if self.invert {
            cx.push(Op::SetInvert(true));
        }
        let sized = self.height_mult > 0 || self.width_mult > 0;
        if sized {
            cx.push(Op::SetSize {
                height: self.height_mult,
                width: self.width_mult,
            });
        }

        cx.push(Op::Text(self.content.clone()));
        if self.newline {
            cx.push(Op::Newline);
        }

        // Undo in reverse order; alignment and font persist like on the printer
        if sized {
            cx.push(Op::SetSize {
                height: 0,
                width: 0,
            });
        }
        if self.invert {
            cx.push(Op::SetInvert(false));
        }
        if self.underline {
            cx.push(Op::SetUnderline(false));
        }
        if self.bold {
            cx.push(Op::SetBold(false));
        }
        Ok(())
    }
}

/// A header component (centered, bold, double-size text).
///
/// ## Example
///
/// ```
/// use starprnt::components::Header;
///
/// let header = Header::new("CHURRA MART");
/// ```
#[derive(Debug, Clone)]
pub struct Header {
    text: Text,
}

impl Header {
    /// Create a new header.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            text: Text::new(content).center().bold().size(1, 1),
        }
    }

    /// Create a smaller header (normal size, still bold and centered).
    pub fn small(content: impl Into<String>) -> Self {
        Self {
            text: Text::new(content).center().bold(),
        }
    }
}

impl Widget for Header {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        self.text.build(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Directionality, TextDirection, WidgetExt};
    use crate::protocol::Alignment;

    #[test]
    fn test_plain_text_ops() {
        let program = Text::new("Hello").build_program(576).unwrap();
        assert_eq!(
            program.ops,
            vec![
                Op::SetAlign(Alignment::Left),
                Op::Text("Hello".into()),
                Op::Newline,
            ]
        );
    }

    #[test]
    fn test_styles_are_reset_after_text() {
        let program = Text::inline("Total")
            .bold()
            .underline()
            .size(1, 1)
            .build_program(576)
            .unwrap();
        assert_eq!(
            program.ops,
            vec![
                Op::SetAlign(Alignment::Left),
                Op::SetBold(true),
                Op::SetUnderline(true),
                Op::SetSize { height: 1, width: 1 },
                Op::Text("Total".into()),
                Op::SetSize { height: 0, width: 0 },
                Op::SetUnderline(false),
                Op::SetBold(false),
            ]
        );
    }

    #[test]
    fn test_start_alignment_follows_direction() {
        let rtl = Directionality::new(TextDirection::Rtl, Text::new("שלום"));
        let program = rtl.build_program(576).unwrap();
        assert_eq!(program.ops[0], Op::SetAlign(Alignment::Right));
    }

    #[test]
    fn test_size_is_clamped() {
        let program = Text::new("X").size(20, 9).build_program(576).unwrap();
        assert!(program.ops.contains(&Op::SetSize { height: 7, width: 7 }));
    }

    #[test]
    fn test_header_is_centered_bold() {
        let program = Header::new("SHOP").build_program(576).unwrap();
        assert_eq!(program.ops[0], Op::SetAlign(Alignment::Center));
        assert!(program.ops.contains(&Op::SetBold(true)));
    }
}
