//! Off-screen rasterization of component trees.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use pretty_assertions::assert_eq;
use starprnt::components::{
    AsyncImage, BuildContext, BuildError, Column, Columns, QrCode, Text, TextDirection, Widget,
};
use starprnt::printer::{DeviceMetrics, PrinterConfig};
use starprnt::render::{OffscreenRenderer, RenderRequest, Size};

fn metrics() -> DeviceMetrics {
    DeviceMetrics {
        physical_size: Size::new(576, 1000),
        pixel_ratio: 1.0,
    }
}

async fn render(request: RenderRequest) -> Option<DynamicImage> {
    let png = OffscreenRenderer::new().create_image_from_widget(request).await?;
    Some(image::load_from_memory(&png).expect("renderer output should be a valid PNG"))
}

fn is_black(image: &DynamicImage, x: u32, y: u32) -> bool {
    image.get_pixel(x, y)[0] == 0
}

#[tokio::test]
async fn test_static_tree_is_sized_to_content() {
    let tree = Column::new()
        .child(Text::new("TABLE 4"))
        .child(Text::new("2 x Espresso"));
    let image = render(RenderRequest::new(metrics(), tree)).await.unwrap();

    // Widest line is 12 cells of 12 dots; two lines of 24
    assert_eq!(image.dimensions(), (144, 48));
    assert!((0..144).any(|x| (0..24).any(|y| is_black(&image, x, y))));
}

#[tokio::test]
async fn test_printer_preset_defaults() {
    let request = RenderRequest::new(
        DeviceMetrics::for_printer(&PrinterConfig::TSP650II),
        Columns::new("Total", "$9.00"),
    );
    assert_eq!(request.resolved_logical_size(), request.resolved_image_size());

    let image = render(request).await.unwrap();
    assert_eq!(image.dimensions(), (576, 24));
}

#[tokio::test]
async fn test_pixel_ratio_scales_output() {
    let metrics = DeviceMetrics {
        physical_size: Size::new(576, 1000),
        pixel_ratio: 2.0,
    };
    let image = render(RenderRequest::new(metrics, Text::new("Hi")))
        .await
        .unwrap();
    assert_eq!(image.dimensions(), (48, 48));
}

#[tokio::test]
async fn test_fractional_device_ratio_renders_with_defaults() {
    let metrics = DeviceMetrics {
        physical_size: Size::new(1080, 2340),
        pixel_ratio: 2.625,
    };
    let image = render(RenderRequest::new(metrics, Text::new("ABCD")))
        .await
        .unwrap();
    // 48x24 logical, scaled by 1080 / 411
    assert_eq!(image.dimensions(), (126, 63));
}

#[tokio::test]
async fn test_explicit_sizes_override_device() {
    let request = RenderRequest::new(metrics(), Text::new("ABCDEFGHIJ"))
        .logical_size(Size::new(60, 100))
        .image_size(Size::new(120, 200));
    let image = render(request).await.unwrap();

    // 60 logical units wrap ten cells into two lines, then scale by 2
    assert_eq!(image.dimensions(), (120, 96));
}

#[tokio::test]
async fn test_rtl_swaps_columns() {
    let ltr = render(RenderRequest::new(metrics(), Columns::new("A", "B").width(4)))
        .await
        .unwrap();
    let rtl = render(
        RenderRequest::new(metrics(), Columns::new("A", "B").width(4))
            .text_direction(TextDirection::Rtl),
    )
    .await
    .unwrap();

    assert_eq!(ltr.dimensions(), (48, 24));
    assert_eq!(ltr.dimensions(), rtl.dimensions());
    assert_ne!(ltr.to_luma8(), rtl.to_luma8());
}

struct Broken;

impl Widget for Broken {
    fn build(&self, _cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        Err(BuildError::Component {
            component: "Broken",
            reason: "no data".into(),
        })
    }
}

#[tokio::test]
async fn test_build_failure_yields_none() {
    let tree = Column::new().child(Text::new("ok")).child(Broken);
    assert!(render(RenderRequest::new(metrics(), tree)).await.is_none());
}

#[tokio::test]
async fn test_unencodable_qr_yields_none() {
    let tree = QrCode::new("x".repeat(8000)).error_level_high();
    assert!(render(RenderRequest::new(metrics(), tree)).await.is_none());
}

#[tokio::test]
async fn test_empty_tree_yields_none() {
    assert!(
        render(RenderRequest::new(metrics(), Column::new()))
            .await
            .is_none()
    );
}

/// Records whether it was ever built.
struct Tripwire(Arc<AtomicBool>);

impl Widget for Tripwire {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        self.0.store(true, Ordering::SeqCst);
        Text::new("built").build(cx)
    }
}

#[tokio::test]
async fn test_aspect_mismatch_panics_before_building() {
    let built = Arc::new(AtomicBool::new(false));
    let request = RenderRequest::new(metrics(), Tripwire(Arc::clone(&built)))
        .logical_size(Size::new(576, 1000))
        .image_size(Size::new(576, 999));

    let result = tokio::spawn(async move {
        OffscreenRenderer::new()
            .create_image_from_widget(request)
            .await
    })
    .await;

    assert!(result.unwrap_err().is_panic());
    assert!(!built.load(Ordering::SeqCst));
}

fn write_logo(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("starprnt-{}-{}.png", name, std::process::id()));
    GrayImage::from_pixel(64, 64, Luma([0]))
        .save(&path)
        .expect("temp dir should be writable");
    path
}

#[tokio::test]
async fn test_async_image_needs_settle_delay() {
    let path = write_logo("settle");
    let tree = Arc::new(
        Column::new()
            .child(Text::new("logo:"))
            .child(AsyncImage::file(&path).width(64)),
    );

    let without_wait = render(RenderRequest::shared(metrics(), tree.clone()))
        .await
        .unwrap();
    let settled = RenderRequest::shared(metrics(), tree).wait(Duration::from_millis(300));
    let with_wait = render(settled).await.unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(without_wait.dimensions(), (60, 24));
    assert_eq!(with_wait.dimensions(), (64, 88));
    assert!(is_black(&with_wait, 32, 56));
}

#[tokio::test]
async fn test_async_image_placeholder_on_failure() {
    let tree = Column::new()
        .child(Text::new("logo:"))
        .child(
            AsyncImage::file("/nonexistent/starprnt/logo.png")
                .width(100)
                .height(40),
        );
    let image = render(RenderRequest::new(metrics(), tree).wait(Duration::from_millis(100)))
        .await
        .unwrap();

    assert_eq!(image.dimensions(), (100, 64));
    assert!((24..64).all(|y| !is_black(&image, 50, y)));
}
