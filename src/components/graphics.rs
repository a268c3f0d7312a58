//! # Graphics Components
//!
//! Components for images, either already in memory or loaded while the
//! tree is being rasterized.

use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use tracing::debug;

use super::{BuildContext, BuildError, TextAlign, Widget};
use crate::ir::Op;
use crate::render::context::{ImageResource, ImageSource};
use crate::render::dither;

/// Pixel content of an [`Image`].
#[derive(Debug, Clone)]
enum ImageData {
    /// Decoded image, dithered at build time.
    Decoded(Arc<DynamicImage>),
    /// Pre-packed 1-bit raster.
    Raster {
        width: usize,
        height: usize,
        data: Vec<u8>,
    },
}

/// A static image.
///
/// Decoded images are resized to fit the available width (or the width set
/// with [`Image::width`]) and Bayer-dithered to black and white.
///
/// ## Example
///
/// ```
/// use starprnt::components::Image;
///
/// let logo = image::DynamicImage::new_luma8(64, 32);
/// let img = Image::new(logo).width(128);
///
/// // From raw raster data (1 bit per pixel, MSB first)
/// let bars = Image::from_raster(16, 2, vec![0xF0, 0x0F, 0xF0, 0x0F]);
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    data: ImageData,
    width: Option<usize>,
    max_height: Option<usize>,
    align: TextAlign,
}

impl Image {
    /// Create an image from a decoded image.
    pub fn new(image: impl Into<Arc<DynamicImage>>) -> Self {
        Self {
            data: ImageData::Decoded(image.into()),
            width: None,
            max_height: None,
            align: TextAlign::Center,
        }
    }

    /// Create an image from raw raster data.
    ///
    /// Data should be packed bits (1 bit per pixel, MSB first).
    /// Length must be `ceil(width/8) * height`.
    pub fn from_raster(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            data: ImageData::Raster {
                width,
                height,
                data,
            },
            width: None,
            max_height: None,
            align: TextAlign::Center,
        }
    }

    /// Target width in logical units (decoded images only).
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Maximum height in logical units (decoded images only).
    pub fn max_height(mut self, height: usize) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set the alignment (default: center).
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

impl Widget for Image {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        cx.push(Op::SetAlign(self.align.resolve(cx.text_direction())));
        match &self.data {
            ImageData::Decoded(image) => {
                emit_decoded(cx, "Image", image, self.width, self.max_height)
            }
            ImageData::Raster {
                width,
                height,
                data,
            } => {
                let expected = width.div_ceil(8) * height;
                if data.len() < expected {
                    return Err(BuildError::Component {
                        component: "Image",
                        reason: format!(
                            "raster {}x{} needs {} bytes, got {}",
                            width,
                            height,
                            expected,
                            data.len()
                        ),
                    });
                }
                cx.push(Op::Raster {
                    width: *width,
                    height: *height,
                    data: data.clone(),
                });
                Ok(())
            }
        }
    }
}

/// Resize, dither and emit a decoded image.
fn emit_decoded(
    cx: &mut BuildContext<'_>,
    component: &'static str,
    image: &DynamicImage,
    width: Option<usize>,
    max_height: Option<usize>,
) -> Result<(), BuildError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(BuildError::Component {
            component,
            reason: "image has no pixels".to_string(),
        });
    }

    let target_width = width
        .unwrap_or(image.width() as usize)
        .min(cx.max_width())
        .max(1);
    let raster = dither::dither_image(image, target_width, max_height);
    cx.push(Op::Raster {
        width: raster.width,
        height: raster.height,
        data: raster.data,
    });
    Ok(())
}

/// An image loaded asynchronously while the tree is being rasterized.
///
/// The first build pass requests the load and paints a placeholder. If the
/// load finishes before the renderer's second build pass (give it a settle
/// delay), the image appears; otherwise the placeholder stays. A failed load
/// also keeps the placeholder.
///
/// The placeholder is a blank box of the configured `width` × `height`, or
/// nothing if either is unset.
///
/// ## Example
///
/// ```
/// use starprnt::components::AsyncImage;
///
/// let logo = AsyncImage::network("https://example.com/logo.png").width(256).height(96);
/// let local = AsyncImage::file("assets/logo.png");
/// ```
#[derive(Debug, Clone)]
pub struct AsyncImage {
    source: ImageSource,
    width: Option<usize>,
    height: Option<usize>,
    align: TextAlign,
}

impl AsyncImage {
    /// Create an image from any source.
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            width: None,
            height: None,
            align: TextAlign::Center,
        }
    }

    /// Load from a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(ImageSource::path(path))
    }

    /// Download over HTTP(S).
    pub fn network(url: impl Into<String>) -> Self {
        Self::new(ImageSource::url(url))
    }

    /// Width in logical units, for both the placeholder and the loaded image.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Height in logical units: placeholder height and the loaded image's maximum.
    pub fn height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the alignment (default: center).
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    fn placeholder(&self, cx: &mut BuildContext<'_>) {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            cx.push(Op::Gap {
                width: width.min(cx.max_width()),
                height,
            });
        }
    }
}

impl Widget for AsyncImage {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        cx.push(Op::SetAlign(self.align.resolve(cx.text_direction())));
        let loaded = match cx.resource(&self.source) {
            Some(ImageResource::Ready(image)) => Some(Arc::clone(image)),
            Some(ImageResource::Pending) => {
                debug!(source = %self.source, "image still loading, painting placeholder");
                None
            }
            Some(ImageResource::Failed(_)) => None,
            None => {
                cx.request(self.source.clone());
                None
            }
        };

        match loaded {
            Some(image) => emit_decoded(cx, "AsyncImage", &image, self.width, self.height),
            None => {
                self.placeholder(cx);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{TextDirection, WidgetExt};
    use crate::render::context::ResourceTable;
    use image::{GrayImage, Luma};

    fn black_square(size: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(size, size, Luma([0])))
    }

    #[test]
    fn test_image_fits_available_width() {
        let program = Image::new(black_square(100)).build_program(40).unwrap();
        match &program.ops[1] {
            Op::Raster { width, height, data } => {
                assert_eq!(*width, 40);
                assert_eq!(*height, 40);
                assert!(data.iter().all(|&b| b == 0xFF));
            }
            other => panic!("expected raster, got {:?}", other),
        }
    }

    #[test]
    fn test_raster_length_is_checked() {
        let err = Image::from_raster(16, 4, vec![0; 3]).build_program(576);
        assert!(matches!(err, Err(BuildError::Component { component: "Image", .. })));
    }

    #[test]
    fn test_empty_image_fails_build() {
        let empty = DynamicImage::new_luma8(0, 0);
        assert!(Image::new(empty).build_program(576).is_err());
    }

    #[test]
    fn test_async_image_requests_and_reserves_placeholder() {
        let resources = ResourceTable::new();
        let mut cx = BuildContext::new(576, TextDirection::Ltr, &resources);
        AsyncImage::file("logo.png").width(64).height(32).build(&mut cx).unwrap();
        let (program, requested) = cx.finish();
        assert_eq!(requested, vec![ImageSource::path("logo.png")]);
        assert!(program.ops.contains(&Op::Gap { width: 64, height: 32 }));
    }

    #[test]
    fn test_async_image_uses_loaded_resource() {
        let mut resources = ResourceTable::new();
        resources.insert(
            ImageSource::path("logo.png"),
            ImageResource::Ready(Arc::new(black_square(16))),
        );
        let mut cx = BuildContext::new(576, TextDirection::Ltr, &resources);
        AsyncImage::file("logo.png").build(&mut cx).unwrap();
        let (program, requested) = cx.finish();
        assert!(requested.is_empty());
        assert!(matches!(program.ops[1], Op::Raster { width: 16, height: 16, .. }));
    }

    #[test]
    fn test_failed_load_keeps_placeholder() {
        let mut resources = ResourceTable::new();
        resources.insert(
            ImageSource::url("https://example.invalid/x.png"),
            ImageResource::Failed("dns".into()),
        );
        let mut cx = BuildContext::new(576, TextDirection::Ltr, &resources);
        AsyncImage::network("https://example.invalid/x.png")
            .build(&mut cx)
            .unwrap();
        let (program, requested) = cx.finish();
        assert!(requested.is_empty());
        assert_eq!(program.len(), 1);
    }
}
