//! # StarPRNT SDK Vocabulary
//!
//! The printer SDK takes its enumerated options as opaque strings. This
//! module holds the closed sets this crate knows about, each with a fixed
//! wire token.
//!
//! ## Module Structure
//!
//! - [`tokens`]: Encodings, cut actions, alignments and bitmap rotations
//!
//! ## Usage Example
//!
//! ```
//! use starprnt::protocol::{CutPaperAction, Encoding};
//!
//! assert_eq!(Encoding::Utf8.token(), "UTF-8");
//! assert_eq!("PartialCutWithFeed".parse(), Ok(CutPaperAction::PartialCutWithFeed));
//! ```
//!
//! Which tokens a given model accepts varies; nothing here validates a
//! token against a printer.

pub mod tokens;

pub use tokens::{Alignment, CutPaperAction, Encoding, Rotation};
