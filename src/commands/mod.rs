//! # Printer Command Lists
//!
//! A [`CommandList`] accumulates [`Instruction`]s for a Star printer SDK:
//! encoding changes, cuts, cash-drawer kicks, text and bitmaps. Bitmaps come
//! from a file path, inline bytes, SDK-rendered text, or a component tree
//! rasterized by a [`Rasterizer`](crate::render::Rasterizer).
//!
//! Nothing is validated here. Tokens, ports and sizes pass through to the
//! SDK as given.
//!
//! ## Example
//!
//! ```no_run
//! use starprnt::commands::{BitmapWidget, CommandList};
//! use starprnt::components::{Column, Text};
//! use starprnt::printer::DeviceMetrics;
//! use starprnt::protocol::CutPaperAction;
//! use starprnt::render::OffscreenRenderer;
//!
//! # async fn demo() -> Result<(), starprnt::StarPrntError> {
//! let renderer = OffscreenRenderer::new();
//! let receipt = Column::new()
//!     .child(Text::new("CHURRA MART").center().bold())
//!     .child(Text::new("Thank you!").center());
//!
//! let mut commands = CommandList::new();
//! commands
//!     .append_bitmap_widget(&renderer, BitmapWidget::new(DeviceMetrics::default(), receipt))
//!     .await?;
//! commands.append_cut_paper(CutPaperAction::PartialCutWithFeed);
//! # Ok(())
//! # }
//! ```

mod instruction;
mod list;
mod widget;

pub use instruction::*;
pub use list::CommandList;
pub use widget::{BitmapWidget, render_widget_bitmap};
