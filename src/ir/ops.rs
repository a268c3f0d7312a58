//! # Display List Opcodes
//!
//! A build pass turns a component tree into a flat sequence of ops. Layout
//! measures the sequence and paint draws it, so the tree itself is never
//! walked more than once per pass.
//!
//! ```text
//! Components → build → Program (Vec<Op>) → layout → paint → raster
//! ```
//!
//! Style changes are individual ops, mirroring how a receipt printer treats
//! them: state that sticks until changed or reset.

use crate::protocol::Alignment;

/// Bitmap fonts available to the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Font {
    /// Font A: 12×24 dots, 48 columns on 72mm paper
    #[default]
    A,
    /// Font B: 9×24 dots, 64 columns on 72mm paper
    B,
    /// Font C: 9×17 dots, 64 columns on 72mm paper (shorter height)
    C,
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrErrorLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

/// Style state tracked while painting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleState {
    pub alignment: Alignment,
    pub font: Font,
    pub bold: bool,
    pub underline: bool,
    pub invert: bool,
    pub height_mult: u8,
    pub width_mult: u8,
}

/// Display list opcodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    // ========== Style Changes ==========
    /// Set physical alignment (already resolved from text direction).
    SetAlign(Alignment),

    /// Set font (A, B, or C).
    SetFont(Font),

    /// Enable/disable bold.
    SetBold(bool),

    /// Enable/disable underline.
    SetUnderline(bool),

    /// Enable/disable inverted (white on black).
    SetInvert(bool),

    /// Set character size multiplier.
    /// height/width: 0 = 1x, 1 = 2x, ... 7 = 8x
    SetSize { height: u8, width: u8 },

    /// Reset all styles to default.
    ResetStyle,

    // ========== Content ==========
    /// Text run (no trailing newline).
    Text(String),

    /// Line break. An empty line advances by one line height.
    Newline,

    /// Blank box. Reserves `width` for intrinsic sizing and advances by
    /// `height`. Spacers use `width: 0`.
    Gap { width: usize, height: usize },

    // ========== Graphics ==========
    /// 1-bit raster, packed MSB first, `ceil(width/8)` bytes per row.
    Raster {
        width: usize,
        height: usize,
        data: Vec<u8>,
    },

    /// QR code, encoded at layout time.
    QrCode {
        data: String,
        cell_size: u8,
        error_level: QrErrorLevel,
    },
}

/// A built display list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Add an op to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Add multiple ops to the program.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Get the number of ops in the program.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
