//! # Declarative Components
//!
//! Component trees for content that gets printed as a bitmap: headers,
//! styled text, two-column rows, QR codes, logos loaded from disk or the
//! network.
//!
//! ## Design Philosophy
//!
//! Instead of drawing pixels, you describe *what* you want:
//!
//! ```
//! use starprnt::components::*;
//!
//! let header = Column::new()
//!     .child(Text::new("CHURRA MART").center().bold().size(1, 1))
//!     .child(Divider::dashed())
//!     .child(Columns::new("Espresso", "$4.50"))
//!     .child(QrCode::new("https://example.com"));
//!
//! // Build to a display list (inspectable)
//! let program = header.build_program(576).unwrap();
//! assert!(!program.is_empty());
//! ```
//!
//! ## Widget Trait
//!
//! All components implement [`Widget`], which emits display list ops into a
//! [`BuildContext`]. Building may fail; the off-screen renderer turns a
//! failed build into "no image".

mod barcode;
mod graphics;
mod layout;
mod text;

pub use barcode::*;
pub use graphics::*;
pub use layout::*;
pub use text::*;

use std::sync::Arc;

use thiserror::Error;

use crate::ir::{Op, Program};
use crate::protocol::Alignment;
use crate::render::context::{ImageResource, ImageSource, ResourceTable};

/// Errors raised while building a component tree.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A component could not produce its content.
    #[error("Component '{component}' failed to build: {reason}")]
    Component {
        component: &'static str,
        reason: String,
    },

    /// The shared resource table was poisoned by a panicking loader.
    #[error("Resource table unavailable")]
    ResourcesPoisoned,
}

/// Direction in which text flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left
    Rtl,
}

/// Alignment relative to the reading direction.
///
/// `Start` and `End` resolve through the [`TextDirection`] in effect;
/// `Left`, `Center` and `Right` are absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Resolve to a physical alignment.
    pub fn resolve(self, direction: TextDirection) -> Alignment {
        match (self, direction) {
            (TextAlign::Start, TextDirection::Ltr) | (TextAlign::End, TextDirection::Rtl) => {
                Alignment::Left
            }
            (TextAlign::Start, TextDirection::Rtl) | (TextAlign::End, TextDirection::Ltr) => {
                Alignment::Right
            }
            (TextAlign::Left, _) => Alignment::Left,
            (TextAlign::Center, _) => Alignment::Center,
            (TextAlign::Right, _) => Alignment::Right,
        }
    }
}

/// Per-pass build state handed to every widget.
///
/// Collects the display list, carries the inherited text direction and the
/// available width, and exposes the asynchronously loaded resources of the
/// pipeline that owns this pass.
pub struct BuildContext<'a> {
    ops: Vec<Op>,
    direction: TextDirection,
    max_width: usize,
    resources: &'a ResourceTable,
    requested: Vec<ImageSource>,
}

impl<'a> BuildContext<'a> {
    /// Create a context for one build pass.
    pub fn new(max_width: usize, direction: TextDirection, resources: &'a ResourceTable) -> Self {
        Self {
            ops: Vec::new(),
            direction,
            max_width,
            resources,
            requested: Vec::new(),
        }
    }

    /// Emit a display list op.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Emit several ops.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Text direction inherited from the nearest [`Directionality`].
    pub fn text_direction(&self) -> TextDirection {
        self.direction
    }

    /// Width available to the tree, in logical units.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Run `f` with a different inherited text direction.
    pub fn with_direction<R>(
        &mut self,
        direction: TextDirection,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = std::mem::replace(&mut self.direction, direction);
        let result = f(self);
        self.direction = saved;
        result
    }

    /// Current state of an asynchronously loaded image, if it was ever requested.
    pub fn resource(&self, source: &ImageSource) -> Option<&ImageResource> {
        self.resources.get(source)
    }

    /// Ask the owning pipeline to start loading `source` after this pass.
    pub fn request(&mut self, source: ImageSource) {
        if !self.requested.contains(&source) {
            self.requested.push(source);
        }
    }

    /// Finish the pass, yielding the display list and the new load requests.
    pub(crate) fn finish(self) -> (Program, Vec<ImageSource>) {
        (Program { ops: self.ops }, self.requested)
    }
}

/// Trait for declarative components.
///
/// Widgets emit display list ops when built. A build pass may run more than
/// once per rasterization, so `build` must not assume it is called once.
pub trait Widget: Send + Sync {
    /// Emit ops for this widget into the build context.
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError>;
}

/// Extension trait for building widgets outside a pipeline.
pub trait WidgetExt: Widget {
    /// Build this widget once, left-to-right, with no loaded resources.
    fn build_program(&self, max_width: usize) -> Result<Program, BuildError> {
        let resources = ResourceTable::new();
        let mut cx = BuildContext::new(max_width, TextDirection::Ltr, &resources);
        self.build(&mut cx)?;
        Ok(cx.finish().0)
    }
}

// Blanket implementation for all widgets
impl<T: Widget + ?Sized> WidgetExt for T {}

// Allow boxed widgets
impl Widget for Box<dyn Widget> {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        self.as_ref().build(cx)
    }
}

// Allow shared widgets
impl<T: Widget + ?Sized> Widget for Arc<T> {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        self.as_ref().build(cx)
    }
}

// Allow references to widgets
impl<T: Widget + ?Sized> Widget for &T {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        (*self).build(cx)
    }
}

/// Vertical container. Children are built top to bottom.
///
/// ## Example
///
/// ```
/// use starprnt::components::{Column, Spacer, Text};
///
/// let column = Column::new()
///     .child(Text::new("Table 4"))
///     .child(Spacer::dots(12))
///     .child(Text::new("Thank you!").center());
/// ```
#[derive(Default)]
pub struct Column {
    children: Vec<Box<dyn Widget>>,
}

impl Column {
    /// Create an empty column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child widget.
    pub fn child<W: Widget + 'static>(mut self, widget: W) -> Self {
        self.children.push(Box::new(widget));
        self
    }

    /// Add multiple child widgets.
    pub fn children<I, W>(mut self, widgets: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Widget + 'static,
    {
        for w in widgets {
            self.children.push(Box::new(w));
        }
        self
    }
}

impl Widget for Column {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        for child in &self.children {
            child.build(cx)?;
        }
        Ok(())
    }
}

/// Sets the text direction for a subtree.
///
/// The off-screen renderer wraps every tree in one of these, so widgets
/// always see a resolved direction.
pub struct Directionality<W> {
    direction: TextDirection,
    child: W,
}

impl<W: Widget> Directionality<W> {
    pub fn new(direction: TextDirection, child: W) -> Self {
        Self { direction, child }
    }
}

impl<W: Widget> Widget for Directionality<W> {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        cx.with_direction(self.direction, |cx| self.child.build(cx))
    }
}
