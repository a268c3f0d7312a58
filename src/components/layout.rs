//! # Layout Components
//!
//! Components for controlling layout and spacing.

use super::{BuildContext, BuildError, TextDirection, Widget};
use crate::ir::Op;
use crate::protocol::Alignment;

/// Divider style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DividerStyle {
    /// Dashed line (default): - - - - - - -
    #[default]
    Dashed,
    /// Solid line: ────────────
    Solid,
    /// Double line: ════════════
    Double,
    /// Equals line: ============
    Equals,
}

/// A horizontal divider line.
///
/// ## Example
///
/// ```
/// use starprnt::components::{Divider, DividerStyle};
///
/// let dashed = Divider::dashed();
/// let solid = Divider::solid();
/// let double = Divider::new(DividerStyle::Double).width(32);
/// ```
#[derive(Debug, Clone)]
pub struct Divider {
    style: DividerStyle,
    width: usize,
}

impl Divider {
    /// Create a divider with a specific style.
    pub fn new(style: DividerStyle) -> Self {
        Self { style, width: 48 }
    }

    /// Create a dashed divider.
    pub fn dashed() -> Self {
        Self::new(DividerStyle::Dashed)
    }

    /// Create a solid divider.
    pub fn solid() -> Self {
        Self::new(DividerStyle::Solid)
    }

    /// Create a double-line divider.
    pub fn double() -> Self {
        Self::new(DividerStyle::Double)
    }

    /// Set the character width.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

impl Default for Divider {
    fn default() -> Self {
        Self::dashed()
    }
}

impl Widget for Divider {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let line = match self.style {
            DividerStyle::Dashed => "-".repeat(self.width),
            DividerStyle::Solid => "\u{2500}".repeat(self.width), // ─
            DividerStyle::Double => "\u{2550}".repeat(self.width), // ═
            DividerStyle::Equals => "=".repeat(self.width),
        };
        cx.push(Op::SetAlign(Alignment::Left));
        cx.push(Op::Text(line));
        cx.push(Op::Newline);
        Ok(())
    }
}

/// A vertical spacer.
///
/// ## Example
///
/// ```
/// use starprnt::components::Spacer;
///
/// let small = Spacer::dots(8);
/// let lines = Spacer::lines(3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Spacer {
    dots: usize,
}

impl Spacer {
    /// A spacer of `dots` logical units.
    pub fn dots(dots: usize) -> Self {
        Self { dots }
    }

    /// A spacer N Font A lines tall (24 units each).
    pub fn lines(n: usize) -> Self {
        Self::dots(n * 24)
    }
}

impl Widget for Spacer {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        if self.dots > 0 {
            cx.push(Op::Gap {
                width: 0,
                height: self.dots,
            });
        }
        Ok(())
    }
}

/// A two-column layout (leading and trailing text on the same line).
///
/// Under right-to-left direction the leading column sits on the right.
///
/// ## Example
///
/// ```
/// use starprnt::components::Columns;
///
/// let row = Columns::new("Subtotal", "$19.99");
/// let header = Columns::new("ITEM", "PRICE").bold();
/// ```
#[derive(Debug, Clone)]
pub struct Columns {
    leading: String,
    trailing: String,
    width: usize,
    bold: bool,
    invert: bool,
}

impl Columns {
    /// Create a two-column row.
    pub fn new(leading: impl Into<String>, trailing: impl Into<String>) -> Self {
        Self {
            leading: leading.into(),
            trailing: trailing.into(),
            width: 48,
            bold: false,
            invert: false,
        }
    }

    /// Set the character width.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Make the row bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Invert the row (white on black).
    pub fn invert(mut self) -> Self {
        self.invert = true;
        self
    }

    fn line(&self, direction: TextDirection) -> String {
        let (left, right) = match direction {
            TextDirection::Ltr => (&self.leading, &self.trailing),
            TextDirection::Rtl => (&self.trailing, &self.leading),
        };
        let left_len = left.chars().count();
        let right_len = right.chars().count();
        let padding = self.width.saturating_sub(left_len + right_len);
        format!("{}{}{}", left, " ".repeat(padding), right)
    }
}

impl Widget for Columns {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let line = self.line(cx.text_direction());

        cx.push(Op::SetAlign(Alignment::Left));
        if self.bold {
            cx.push(Op::SetBold(true));
        }
        if self.invert {
            cx.push(Op::SetInvert(true));
        }

        cx.push(Op::Text(line));
        cx.push(Op::Newline);

        if self.invert {
            cx.push(Op::SetInvert(false));
        }
        if self.bold {
            cx.push(Op::SetBold(false));
        }
        Ok(())
    }
}

/// An empty line.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankLine;

impl Widget for BlankLine {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        cx.push(Op::Newline);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Directionality, WidgetExt};

    fn text_of(program: &crate::ir::Program) -> Vec<String> {
        program
            .iter()
            .filter_map(|op| match op {
                Op::Text(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_divider_width() {
        let program = Divider::dashed().width(10).build_program(576).unwrap();
        assert_eq!(text_of(&program), vec!["-".repeat(10)]);
    }

    #[test]
    fn test_columns_pad_to_width() {
        let program = Columns::new("Tea", "$2").width(10).build_program(576).unwrap();
        assert_eq!(text_of(&program), vec!["Tea     $2".to_string()]);
    }

    #[test]
    fn test_columns_swap_under_rtl() {
        let row = Directionality::new(TextDirection::Rtl, Columns::new("Tea", "$2").width(10));
        let program = row.build_program(576).unwrap();
        assert_eq!(text_of(&program), vec!["$2     Tea".to_string()]);
    }

    #[test]
    fn test_columns_count_chars_not_bytes() {
        let program = Columns::new("Café", "€3").width(10).build_program(576).unwrap();
        assert_eq!(text_of(&program)[0].chars().count(), 10);
    }

    #[test]
    fn test_spacer_emits_gap() {
        let program = Spacer::lines(2).build_program(576).unwrap();
        assert_eq!(program.ops, vec![Op::Gap { width: 0, height: 48 }]);
        assert!(Spacer::dots(0).build_program(576).unwrap().is_empty());
    }
}
