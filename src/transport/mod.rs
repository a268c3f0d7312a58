//! # Printer Transport Layer
//!
//! The seam between a finished [`CommandList`](crate::commands::CommandList)
//! and whatever delivers it to a printer (a Bluetooth, USB or LAN SDK).
//!
//! ## Available Transports
//!
//! - [`JsonTransport`]: writes the instruction records as a JSON array to any
//!   [`Write`], for SDK bridges that take JSON (and for inspection)

use std::io::Write;

use tracing::{info, instrument};

use crate::StarPrntError;
use crate::commands::Instruction;

/// Delivers instructions to a printer.
pub trait Transport {
    /// Send instructions, in order.
    fn send(&mut self, commands: &[Instruction]) -> Result<(), StarPrntError>;
}

/// Writes each batch of instructions as one JSON array followed by a newline.
#[derive(Debug)]
pub struct JsonTransport<W: Write> {
    writer: W,
}

impl<W: Write> JsonTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for JsonTransport<W> {
    #[instrument(skip_all, fields(count = commands.len()))]
    fn send(&mut self, commands: &[Instruction]) -> Result<(), StarPrntError> {
        serde_json::to_writer(&mut self.writer, commands)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        info!("command list handed to transport");
        Ok(())
    }
}
