//! # Detached Rendering Pipeline
//!
//! One rasterization owns one [`BuildOwner`] and one [`PipelineOwner`].
//! Neither is shared with any other call, so concurrent rasterizations can
//! never see each other's resources or layout state.
//!
//! ```text
//! BuildOwner:    build_scope ─► (settle) ─► build_scope ─► finalize_tree
//!                      │ requests                │ program
//!                      ▼                         ▼
//!                load tasks             PipelineOwner: flush_layout ─► flush_paint ─► capture
//! ```

use std::sync::{Arc, RwLock};

use image::GrayImage;
use image::imageops::{self, FilterType};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::RenderError;
use super::Size;
use super::canvas::Canvas;
use super::context::{ImageResource, ImageSource, RenderContext, ResourceTable};
use crate::components::{BuildContext, BuildError, TextDirection, Widget};
use crate::ir::Program;

/// Owns the build side of one rasterization: the resource table that
/// asynchronous components read, and the tasks filling it.
pub struct BuildOwner {
    context: RenderContext,
    resources: Arc<RwLock<ResourceTable>>,
    loads: Vec<JoinHandle<()>>,
}

impl BuildOwner {
    pub fn new(context: RenderContext) -> Self {
        Self {
            context,
            resources: Arc::new(RwLock::new(ResourceTable::new())),
            loads: Vec::new(),
        }
    }

    /// Run one build pass over `root` and start loading whatever it requested.
    ///
    /// The pass itself never suspends.
    pub fn build_scope(
        &mut self,
        root: &dyn Widget,
        max_width: usize,
        direction: TextDirection,
    ) -> Result<Program, BuildError> {
        let (program, requested) = {
            let table = self
                .resources
                .read()
                .map_err(|_| BuildError::ResourcesPoisoned)?;
            let mut cx = BuildContext::new(max_width, direction, &table);
            root.build(&mut cx)?;
            cx.finish()
        };

        for source in requested {
            self.schedule_load(source)?;
        }

        debug!(ops = program.len(), pending = self.loads.len(), "build pass complete");
        Ok(program)
    }

    fn schedule_load(&mut self, source: ImageSource) -> Result<(), BuildError> {
        {
            let mut table = self
                .resources
                .write()
                .map_err(|_| BuildError::ResourcesPoisoned)?;
            if table.contains_key(&source) {
                return Ok(());
            }
            table.insert(source.clone(), ImageResource::Pending);
        }

        debug!(%source, "loading image");
        let context = self.context.clone();
        let resources = Arc::clone(&self.resources);
        self.loads.push(tokio::spawn(async move {
            let state = match context.fetch_image(&source).await {
                Ok(image) => ImageResource::Ready(Arc::new(image)),
                Err(e) => {
                    warn!(%source, error = %e, "image load failed");
                    ImageResource::Failed(e.to_string())
                }
            };
            if let Ok(mut table) = resources.write() {
                table.insert(source, state);
            }
        }));
        Ok(())
    }

    /// Tear down build state. Loads still in flight are aborted.
    pub fn finalize_tree(self) {
        for load in &self.loads {
            if !load.is_finished() {
                load.abort();
            }
        }
    }
}

/// Laid-out size of the tree, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSize {
    pub width: usize,
    pub height: usize,
}

/// Owns layout, paint and capture for one rasterization.
///
/// The root view has the request's logical size; the tree inside it is
/// sized to its intrinsic width and height, clipped to the root.
pub struct PipelineOwner {
    root: Size,
    pixel_ratio: f32,
}

impl PipelineOwner {
    pub fn new(root: Size, pixel_ratio: f32) -> Self {
        Self { root, pixel_ratio }
    }

    /// Measure the intrinsic size of a built program.
    pub fn flush_layout(&self, program: &Program) -> Result<LayoutSize, RenderError> {
        let mut canvas = Canvas::measure(self.root.width as usize);
        canvas.run(program)?;

        let width = canvas.intrinsic_width();
        let natural_height = canvas.intrinsic_height();
        let height = natural_height.min(self.root.height as usize);
        if height < natural_height {
            warn!(
                natural_height,
                max_height = self.root.height,
                "content taller than the logical size, clipping"
            );
        }
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyLayout { width, height });
        }

        debug!(width, height, "layout complete");
        Ok(LayoutSize { width, height })
    }

    /// Paint a program into a surface of exactly the laid-out size.
    pub fn flush_paint(
        &self,
        program: &Program,
        layout: LayoutSize,
    ) -> Result<Canvas, RenderError> {
        let mut canvas = Canvas::paint(layout.width, layout.height);
        canvas.run(program)?;
        Ok(canvas)
    }

    /// Capture the painted surface at the output pixel ratio.
    pub fn capture(&self, canvas: &Canvas) -> GrayImage {
        let image = canvas.to_image();
        if (self.pixel_ratio - 1.0).abs() < f32::EPSILON {
            return image;
        }
        let (width, height) = image.dimensions();
        let scaled_width = ((width as f32 * self.pixel_ratio).round() as u32).max(1);
        let scaled_height = ((height as f32 * self.pixel_ratio).round() as u32).max(1);
        imageops::resize(&image, scaled_width, scaled_height, FilterType::Nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AsyncImage, Text};
    use crate::ir::Op;

    #[test]
    fn test_layout_is_intrinsic() {
        let owner = PipelineOwner::new(Size::new(576, 1000), 1.0);
        let program = Program {
            ops: vec![Op::Text("Hi".into()), Op::Newline],
        };
        assert_eq!(
            owner.flush_layout(&program).unwrap(),
            LayoutSize {
                width: 24,
                height: 24
            }
        );
    }

    #[test]
    fn test_layout_clips_to_root_height() {
        let owner = PipelineOwner::new(Size::new(576, 30), 1.0);
        let program = Program {
            ops: vec![Op::Gap {
                width: 10,
                height: 500,
            }],
        };
        assert_eq!(owner.flush_layout(&program).unwrap().height, 30);
    }

    #[test]
    fn test_empty_program_has_no_layout() {
        let owner = PipelineOwner::new(Size::new(576, 1000), 1.0);
        assert!(matches!(
            owner.flush_layout(&Program::new()),
            Err(RenderError::EmptyLayout { .. })
        ));
    }

    #[test]
    fn test_capture_scales_by_pixel_ratio() {
        let owner = PipelineOwner::new(Size::new(576, 1000), 2.0);
        let program = Program {
            ops: vec![Op::Text("Hi".into()), Op::Newline],
        };
        let layout = owner.flush_layout(&program).unwrap();
        let canvas = owner.flush_paint(&program, layout).unwrap();
        assert_eq!(owner.capture(&canvas).dimensions(), (48, 48));
    }

    #[tokio::test]
    async fn test_build_scope_schedules_each_source_once() {
        let mut owner = BuildOwner::new(RenderContext::empty());
        let tree = crate::components::Column::new()
            .child(Text::new("logo"))
            .child(AsyncImage::file("/nonexistent/a.png"))
            .child(AsyncImage::file("/nonexistent/a.png"));
        owner.build_scope(&tree, 576, TextDirection::Ltr).unwrap();
        owner.build_scope(&tree, 576, TextDirection::Ltr).unwrap();
        assert_eq!(owner.loads.len(), 1);
        owner.finalize_tree();
    }
}
