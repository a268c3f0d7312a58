//! # Display List
//!
//! The flat op sequence a component tree builds into. It sits between the
//! declarative components and the off-screen painter:
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────┐     ┌──────────┐
//! │ Components  │ ──► │   Program   │ ──► │  Layout  │ ──► │  Paint   │
//! │(declarative)│     │  (Vec<Op>)  │     │ (measure)│     │ (pixels) │
//! └─────────────┘     └─────────────┘     └──────────┘     └──────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use starprnt::ir::{Op, Program};
//! use starprnt::protocol::Alignment;
//!
//! let mut program = Program::new();
//! program.push(Op::SetAlign(Alignment::Center));
//! program.push(Op::SetBold(true));
//! program.push(Op::Text("HELLO".into()));
//! program.push(Op::Newline);
//! assert_eq!(program.len(), 4);
//! ```

mod ops;

pub use ops::*;
