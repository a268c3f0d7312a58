//! The command list.

use serde_json::Value;
use tracing::debug;

use crate::StarPrntError;
use crate::protocol::{Alignment, CutPaperAction, Encoding};
use crate::render::Rasterizer;
use crate::transport::Transport;

use super::instruction::{
    AppendText, BitmapBytes, BitmapPath, BitmapText, CutPaper, Instruction, LineFeed, OpenDrawer,
    SetAlignment, SetEncoding, UnitFeed,
};
use super::widget::{BitmapWidget, render_bitmap_bytes};

/// Ordered printer instructions. The printer executes them in append order.
///
/// ```
/// use starprnt::commands::{BitmapPath, CommandList};
/// use starprnt::protocol::{CutPaperAction, Encoding};
///
/// let mut commands = CommandList::new();
/// commands.append_encoding(Encoding::Utf8);
/// commands.append_bitmap(BitmapPath::new("logo.png"));
/// commands.append_cut_paper(CutPaperAction::PartialCutWithFeed);
/// assert_eq!(commands.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandList {
    instructions: Vec<Instruction>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_encoding(&mut self, encoding: Encoding) {
        self.push(Instruction::SetEncoding(SetEncoding { encoding }));
    }

    pub fn append_cut_paper(&mut self, action: CutPaperAction) {
        self.push(Instruction::CutPaper(CutPaper { action }));
    }

    /// Port numbers are not validated; the printer rejects bad ones.
    pub fn open_cash_drawer(&mut self, port: i32) {
        self.push(Instruction::OpenDrawer(OpenDrawer { port }));
    }

    pub fn append_bitmap(&mut self, bitmap: BitmapPath) {
        self.push(Instruction::BitmapFromPath(bitmap));
    }

    pub fn append_bitmap_byte(&mut self, bitmap: BitmapBytes) {
        self.push(Instruction::BitmapFromBytes(bitmap));
    }

    pub fn append_bitmap_text(&mut self, bitmap: BitmapText) {
        self.push(Instruction::BitmapFromText(bitmap));
    }

    /// Rasterize a component tree and append it as an `appendBitmapByte`.
    ///
    /// The list stays borrowed until rasterization finishes, so the bitmap
    /// lands exactly where this call was made.
    ///
    /// # Errors
    ///
    /// [`StarPrntError::ImageGeneration`] if the rasterizer produced no
    /// image. Nothing is appended in that case.
    pub async fn append_bitmap_widget(
        &mut self,
        rasterizer: &dyn Rasterizer,
        bitmap: BitmapWidget,
    ) -> Result<(), StarPrntError> {
        let bytes = render_bitmap_bytes(rasterizer, &bitmap).await?;
        debug!(bytes = bytes.bytes.len(), "widget rasterized");
        self.append_bitmap_byte(bytes);
        Ok(())
    }

    /// Plain text in the current encoding.
    pub fn append_text(&mut self, text: impl Into<String>) {
        self.push(Instruction::Text(AppendText { text: text.into() }));
    }

    pub fn append_line_feed(&mut self, lines: u32) {
        self.push(Instruction::LineFeed(LineFeed { lines }));
    }

    /// Feed paper by `units` dots.
    pub fn append_unit_feed(&mut self, units: u32) {
        self.push(Instruction::UnitFeed(UnitFeed { units }));
    }

    pub fn append_alignment(&mut self, alignment: Alignment) {
        self.push(Instruction::Alignment(SetAlignment { alignment }));
    }

    /// Append an instruction unchanged.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    /// Current instructions, in execution order.
    pub fn commands(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// The list as a JSON array of SDK records.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.instructions)
    }

    /// Hand the current instructions to a transport.
    pub fn send<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<(), StarPrntError> {
        transport.send(&self.instructions)
    }
}

impl From<Vec<Instruction>> for CommandList {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl Extend<Instruction> for CommandList {
    fn extend<I: IntoIterator<Item = Instruction>>(&mut self, iter: I) {
        self.instructions.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CommandList {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl IntoIterator for CommandList {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}
