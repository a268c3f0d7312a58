//! Bitmaps rasterized from component trees.

use std::sync::Arc;
use std::time::Duration;

use crate::StarPrntError;
use crate::components::{TextDirection, Widget};
use crate::printer::DeviceMetrics;
use crate::protocol::{Alignment, Rotation};
use crate::render::{Rasterizer, RenderRequest, Size};

use super::instruction::{BitmapBytes, DEFAULT_BITMAP_WIDTH, Instruction, Placement};

/// A component tree to print as a bitmap, plus how to rasterize and place it.
#[derive(Clone)]
pub struct BitmapWidget {
    pub widget: Arc<dyn Widget>,
    /// Device the tree is laid out for; supplies default sizes.
    pub metrics: DeviceMetrics,
    pub diffusion: bool,
    pub width: u32,
    pub both_scale: bool,
    pub placement: Placement,
    pub wait: Option<Duration>,
    pub logical_size: Option<Size>,
    pub image_size: Option<Size>,
    pub text_direction: TextDirection,
}

impl BitmapWidget {
    pub fn new(metrics: DeviceMetrics, widget: impl Widget + 'static) -> Self {
        Self {
            widget: Arc::new(widget),
            metrics,
            diffusion: true,
            width: DEFAULT_BITMAP_WIDTH,
            both_scale: true,
            placement: Placement::default(),
            wait: None,
            logical_size: None,
            image_size: None,
            text_direction: TextDirection::Ltr,
        }
    }

    pub fn diffusion(mut self, diffusion: bool) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn both_scale(mut self, both_scale: bool) -> Self {
        self.both_scale = both_scale;
        self
    }

    pub fn absolute_position(mut self, dots: i32) -> Self {
        self.placement.absolute_position = Some(dots);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.placement.alignment = Some(alignment);
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.placement.rotation = Some(rotation);
        self
    }

    /// Settle delay for trees with asynchronously loaded content.
    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn logical_size(mut self, size: Size) -> Self {
        self.logical_size = Some(size);
        self
    }

    pub fn image_size(mut self, size: Size) -> Self {
        self.image_size = Some(size);
        self
    }

    pub fn text_direction(mut self, direction: TextDirection) -> Self {
        self.text_direction = direction;
        self
    }

    fn render_request(&self) -> RenderRequest {
        RenderRequest {
            metrics: self.metrics,
            widget: Arc::clone(&self.widget),
            wait: self.wait,
            logical_size: self.logical_size,
            image_size: self.image_size,
            text_direction: self.text_direction,
        }
    }
}

impl std::fmt::Debug for BitmapWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapWidget")
            .field("metrics", &self.metrics)
            .field("width", &self.width)
            .field("placement", &self.placement)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

/// Rasterize a widget into bitmap parameters carrying the PNG.
pub(super) async fn render_bitmap_bytes(
    rasterizer: &dyn Rasterizer,
    bitmap: &BitmapWidget,
) -> Result<BitmapBytes, StarPrntError> {
    let png = rasterizer
        .render(bitmap.render_request())
        .await
        .ok_or_else(|| StarPrntError::ImageGeneration("rasterizer returned no image".into()))?;

    Ok(BitmapBytes {
        bytes: png,
        diffusion: bitmap.diffusion,
        width: bitmap.width,
        both_scale: bitmap.both_scale,
        placement: bitmap.placement,
    })
}

/// Rasterize a widget into a finished `appendBitmapByte` instruction.
///
/// Unlike [`CommandList::append_bitmap_widget`](super::CommandList::append_bitmap_widget)
/// this borrows no list, so several widgets can render at once and be
/// pushed in whatever order the caller picks.
pub async fn render_widget_bitmap(
    rasterizer: &dyn Rasterizer,
    bitmap: &BitmapWidget,
) -> Result<Instruction, StarPrntError> {
    render_bitmap_bytes(rasterizer, bitmap)
        .await
        .map(Instruction::BitmapFromBytes)
}
