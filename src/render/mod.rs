//! # Off-screen Rendering
//!
//! Turns a component tree into a PNG without a display attached, for
//! printing as a bitmap.
//!
//! ## Modules
//!
//! - [`context`]: image loading shared by rasterizations
//! - [`dither`]: Bayer 8x8 ordered dithering for binary conversion
//!
//! ## Usage Example
//!
//! ```no_run
//! use starprnt::components::{Column, Text};
//! use starprnt::printer::DeviceMetrics;
//! use starprnt::render::{OffscreenRenderer, RenderRequest};
//!
//! # async fn demo() {
//! let tree = Column::new().child(Text::new("Table 4").center());
//! let request = RenderRequest::new(DeviceMetrics::default(), tree);
//!
//! let png = OffscreenRenderer::new().create_image_from_widget(request).await;
//! assert!(png.is_some());
//! # }
//! ```

mod canvas;
pub mod context;
pub mod dither;
mod font;
mod pipeline;
mod text;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{GrayImage, ImageFormat};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::components::{BuildError, Directionality, TextDirection, Widget};
use crate::printer::DeviceMetrics;
use context::RenderContext;
use pipeline::{BuildOwner, PipelineOwner};

/// A width and height in whole units (logical units or pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Exact aspect-ratio comparison.
    pub fn same_aspect_ratio(&self, other: &Size) -> bool {
        self.width as u64 * other.height as u64 == self.height as u64 * other.width as u64
    }
}

/// Errors inside one rasterization. They never leave the renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Content could not be laid out (e.g. QR data too long).
    #[error("Layout failed: {0}")]
    Layout(String),

    #[error("Nothing to paint: laid out to {width}x{height}")]
    EmptyLayout { width: usize, height: usize },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// One rasterization job.
///
/// Sizes left unset default to the device: the logical size to
/// `physical_size / pixel_ratio`, the image size to `physical_size`.
#[derive(Clone)]
pub struct RenderRequest {
    pub metrics: DeviceMetrics,
    pub widget: Arc<dyn Widget>,
    /// Settle delay between the two build passes.
    pub wait: Option<Duration>,
    pub logical_size: Option<Size>,
    pub image_size: Option<Size>,
    pub text_direction: TextDirection,
}

impl RenderRequest {
    pub fn new(metrics: DeviceMetrics, widget: impl Widget + 'static) -> Self {
        Self::shared(metrics, Arc::new(widget))
    }

    /// A request for a tree that is already shared.
    pub fn shared(metrics: DeviceMetrics, widget: Arc<dyn Widget>) -> Self {
        Self {
            metrics,
            widget,
            wait: None,
            logical_size: None,
            image_size: None,
            text_direction: TextDirection::Ltr,
        }
    }

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

    /// Logical size after defaulting.
    pub fn resolved_logical_size(&self) -> Size {
        self.logical_size.unwrap_or_else(|| self.metrics.logical_size())
    }

    /// Whether both sizes come from the device. They then agree up to the
    /// rounding of `physical_size / pixel_ratio`.
    pub fn uses_device_sizes(&self) -> bool {
        self.logical_size.is_none() && self.image_size.is_none()
    }

    /// Output image size after defaulting.
    pub fn resolved_image_size(&self) -> Size {
        self.image_size.unwrap_or(self.metrics.physical_size)
    }
}

impl std::fmt::Debug for RenderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderRequest")
            .field("metrics", &self.metrics)
            .field("wait", &self.wait)
            .field("logical_size", &self.logical_size)
            .field("image_size", &self.image_size)
            .field("text_direction", &self.text_direction)
            .finish_non_exhaustive()
    }
}

/// Something that can turn a component tree into image bytes.
///
/// `None` means the tree could not be rendered.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn render(&self, request: RenderRequest) -> Option<Vec<u8>>;
}

/// The in-crate rasterizer. Every call builds and discards its own pipeline.
#[derive(Debug, Clone, Default)]
pub struct OffscreenRenderer {
    context: RenderContext,
}

impl OffscreenRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load async images through an existing context (e.g. a shared HTTP client).
    pub fn with_context(context: RenderContext) -> Self {
        Self { context }
    }

    /// Rasterize a component tree to PNG bytes.
    ///
    /// # Panics
    ///
    /// If the logical size and the image size have different aspect ratios.
    /// Sizes that both default to the device are not checked.
    #[instrument(skip_all, fields(wait = ?request.wait))]
    pub async fn create_image_from_widget(&self, request: RenderRequest) -> Option<Vec<u8>> {
        let logical = request.resolved_logical_size();
        let image = request.resolved_image_size();
        assert!(
            request.uses_device_sizes() || logical.same_aspect_ratio(&image),
            "logical size {}x{} and image size {}x{} must share an aspect ratio",
            logical.width,
            logical.height,
            image.width,
            image.height
        );

        match self.rasterize(&request, logical, image).await {
            Ok(png) => Some(png),
            Err(e) => {
                warn!(error = %e, "widget rasterization failed");
                None
            }
        }
    }

    async fn rasterize(
        &self,
        request: &RenderRequest,
        logical: Size,
        image: Size,
    ) -> Result<Vec<u8>, RenderError> {
        let root = Directionality::new(request.text_direction, Arc::clone(&request.widget));
        let max_width = logical.width as usize;
        let pixel_ratio = if logical.width == 0 {
            1.0
        } else {
            image.width as f32 / logical.width as f32
        };

        let mut build_owner = BuildOwner::new(self.context.clone());
        let pipeline_owner = PipelineOwner::new(logical, pixel_ratio);

        if let Err(e) = build_owner.build_scope(&root, max_width, request.text_direction) {
            build_owner.finalize_tree();
            return Err(e.into());
        }

        if let Some(wait) = request.wait {
            debug!(?wait, "waiting for async content to settle");
            tokio::time::sleep(wait).await;
        }

        let second = build_owner.build_scope(&root, max_width, request.text_direction);
        build_owner.finalize_tree();
        let program = second?;

        let layout = pipeline_owner.flush_layout(&program)?;
        let canvas = pipeline_owner.flush_paint(&program, layout)?;
        let captured = pipeline_owner.capture(&canvas);
        debug!(
            width = captured.width(),
            height = captured.height(),
            "captured"
        );

        encode_png(&captured)
    }
}

#[async_trait]
impl Rasterizer for OffscreenRenderer {
    async fn render(&self, request: RenderRequest) -> Option<Vec<u8>> {
        self.create_image_from_widget(request).await
    }
}

/// Rasterize with a default [`OffscreenRenderer`].
pub async fn create_image_from_widget(request: RenderRequest) -> Option<Vec<u8>> {
    OffscreenRenderer::new().create_image_from_widget(request).await
}

fn encode_png(image: &GrayImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(bytes)
}
