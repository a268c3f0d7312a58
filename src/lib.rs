//! # starprnt - Star Printer Command Lists
//!
//! starprnt builds instruction lists for Star Micronics receipt printer SDKs
//! and rasterizes declarative component trees into bitmaps to print. It
//! provides:
//!
//! - **Command lists**: encoding, cut, cash drawer, text and bitmap instructions
//! - **Components**: text, dividers, columns, images and QR codes as a tree
//! - **Off-screen rendering**: component tree → PNG, with async image loading
//! - **Transport seam**: hand a finished list to whatever talks to the printer
//!
//! ## Quick Start
//!
//! ```no_run
//! use starprnt::{
//!     commands::{BitmapWidget, CommandList},
//!     components::{Column, Divider, QrCode, Text},
//!     printer::{DeviceMetrics, PrinterConfig},
//!     protocol::{CutPaperAction, Encoding},
//!     render::OffscreenRenderer,
//!     transport::JsonTransport,
//! };
//!
//! # async fn demo() -> Result<(), starprnt::StarPrntError> {
//! let metrics = DeviceMetrics::for_printer(&PrinterConfig::TSP650II);
//! let receipt = Column::new()
//!     .child(Text::new("CHURRA MART").center().bold().size(1, 1))
//!     .child(Divider::dashed())
//!     .child(QrCode::new("https://example.com/r/1234"));
//!
//! let mut commands = CommandList::new();
//! commands.append_encoding(Encoding::Utf8);
//! commands
//!     .append_bitmap_widget(&OffscreenRenderer::new(), BitmapWidget::new(metrics, receipt))
//!     .await?;
//! commands.append_cut_paper(CutPaperAction::PartialCutWithFeed);
//!
//! commands.send(&mut JsonTransport::new(std::io::stdout()))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`commands`] | Instruction records and the command list |
//! | [`components`] | Declarative component trees |
//! | [`ir`] | Display list emitted by component builds |
//! | [`render`] | Off-screen rasterization and dithering |
//! | [`protocol`] | Wire tokens for SDK options |
//! | [`printer`] | Printer presets and device metrics |
//! | [`transport`] | Delivery seam |
//! | [`error`] | Error types |

pub mod commands;
pub mod components;
pub mod error;
pub mod ir;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use commands::{CommandList, Instruction};
pub use error::StarPrntError;
pub use printer::{DeviceMetrics, PrinterConfig};
pub use render::OffscreenRenderer;
