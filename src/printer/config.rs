//! # Printer Configuration
//!
//! This module defines hardware specifications for supported Star printers
//! and the device metrics the off-screen renderer falls back to when a
//! bitmap request does not name its own sizes.
//!
//! ## Supported Printers
//!
//! | Model | Paper | Width (dots) | Resolution |
//! |-------|-------|--------------|------------|
//! | TSP650II | 80mm | 576 | 203 DPI |
//! | TSP100IV | 80mm | 576 | 203 DPI |
//! | mPOP | 58mm | 384 | 203 DPI |
//! | SM-L200 | 58mm | 384 | 203 DPI |
//!
//! ## Usage
//!
//! ```
//! use starprnt::printer::{DeviceMetrics, PrinterConfig};
//!
//! let config = PrinterConfig::TSP650II;
//! let metrics = DeviceMetrics::for_printer(&config);
//! assert_eq!(metrics.physical_size.width, 576);
//! ```

use crate::render::Size;

/// Length of the virtual page used for default rendering sizes, in mm.
///
/// Receipts are continuous, so this only caps how tall a rasterized
/// component tree may grow before it is clipped.
pub const DEFAULT_PAGE_LENGTH_MM: f32 = 300.0;

/// # Printer Configuration
///
/// Defines the hardware characteristics of a Star receipt printer.
///
/// ## Calculations
///
/// ```text
/// dots_per_mm = dpi / 25.4
/// width_mm = width_dots / dots_per_mm
///
/// For TSP650II:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   width_mm = 576 / 8 = 72mm
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Maximum print width in dots (pixels)
    pub width_dots: u16,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Paper roll width in millimeters
    pub paper_width_mm: u8,
}

impl PrinterConfig {
    /// # Star TSP650II Configuration
    ///
    /// 80mm paper width thermal receipt printer.
    ///
    /// ```text
    /// ├── 4mm ──┼────── 72mm printable ──────┼── 4mm ──┤
    /// │ margin  │         576 dots           │ margin  │
    /// ```
    pub const TSP650II: Self = Self {
        name: "Star TSP650II",
        width_dots: 576,
        dpi: 203,
        paper_width_mm: 80,
    };

    /// Star TSP100IV, 80mm paper.
    pub const TSP100IV: Self = Self {
        name: "Star TSP100IV",
        width_dots: 576,
        dpi: 203,
        paper_width_mm: 80,
    };

    /// Star mPOP, 58mm paper (48mm printable).
    pub const MPOP: Self = Self {
        name: "Star mPOP",
        width_dots: 384,
        dpi: 203,
        paper_width_mm: 58,
    };

    /// Star SM-L200 portable, 58mm paper.
    pub const SM_L200: Self = Self {
        name: "Star SM-L200",
        width_dots: 384,
        dpi: 203,
        paper_width_mm: 58,
    };

    /// All built-in presets.
    pub const BUILT_IN: [Self; 4] = [Self::TSP650II, Self::TSP100IV, Self::MPOP, Self::SM_L200];

    /// Look up a preset by short id (`"tsp650ii"`, `"mpop"`, ...) or display name.
    ///
    /// ```
    /// use starprnt::printer::PrinterConfig;
    ///
    /// assert_eq!(PrinterConfig::by_name("mpop"), Ok(PrinterConfig::MPOP));
    /// assert_eq!(PrinterConfig::by_name("Star TSP650II"), Ok(PrinterConfig::TSP650II));
    /// assert!(PrinterConfig::by_name("tm-t88").is_err());
    /// ```
    pub fn by_name(s: &str) -> Result<Self, String> {
        if let Some(config) = Self::BUILT_IN.into_iter().find(|c| c.name == s) {
            return Ok(config);
        }

        match s.to_lowercase().replace('-', "").as_str() {
            "tsp650ii" => Ok(Self::TSP650II),
            "tsp100iv" => Ok(Self::TSP100IV),
            "mpop" => Ok(Self::MPOP),
            "sml200" => Ok(Self::SM_L200),
            _ => Err(format!(
                "Unknown printer '{}'. Use one of: tsp650ii, tsp100iv, mpop, sm-l200",
                s
            )),
        }
    }

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Calculate print width in millimeters
    #[inline]
    pub fn width_mm(&self) -> f32 {
        self.width_dots as f32 / self.dots_per_mm()
    }

    /// Convert millimeters to dots
    #[inline]
    pub fn mm_to_dots(&self, mm: f32) -> u16 {
        (mm * self.dots_per_mm()).round() as u16
    }

    /// Convert dots to millimeters
    #[inline]
    pub fn dots_to_mm(&self, dots: u16) -> f32 {
        dots as f32 / self.dots_per_mm()
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::TSP650II
    }
}

// ============================================================================
// DEVICE METRICS
// ============================================================================

/// Display metrics of the device a component tree is rasterized for.
///
/// The off-screen renderer only uses these to default the logical size
/// (`physical_size / pixel_ratio`) and the output image size
/// (`physical_size`) when a request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceMetrics {
    /// Full device surface in physical pixels (printer dots).
    pub physical_size: Size,
    /// Physical pixels per logical unit.
    pub pixel_ratio: f32,
}

impl DeviceMetrics {
    /// Metrics for a printer: one logical unit per dot, page length capped
    /// at [`DEFAULT_PAGE_LENGTH_MM`].
    pub fn for_printer(config: &PrinterConfig) -> Self {
        Self {
            physical_size: Size::new(
                config.width_dots as u32,
                config.mm_to_dots(DEFAULT_PAGE_LENGTH_MM) as u32,
            ),
            pixel_ratio: 1.0,
        }
    }

    /// Logical size of the full device surface.
    pub fn logical_size(&self) -> Size {
        let ratio = if self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        Size::new(
            (self.physical_size.width as f32 / ratio).round() as u32,
            (self.physical_size.height as f32 / ratio).round() as u32,
        )
    }
}

impl Default for DeviceMetrics {
    fn default() -> Self {
        Self::for_printer(&PrinterConfig::TSP650II)
    }
}

impl From<PrinterConfig> for DeviceMetrics {
    fn from(config: PrinterConfig) -> Self {
        Self::for_printer(&config)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsp650ii_dimensions() {
        let config = PrinterConfig::TSP650II;
        assert_eq!(config.width_dots, 576);
        assert_eq!(config.paper_width_mm, 80);
    }

    #[test]
    fn test_width_mm() {
        // 576 dots / 8 dpmm = 72mm
        assert!((PrinterConfig::TSP650II.width_mm() - 72.0).abs() < 1.0);
        // 384 dots / 8 dpmm = 48mm
        assert!((PrinterConfig::MPOP.width_mm() - 48.0).abs() < 1.0);
    }

    #[test]
    fn test_mm_dots_conversion() {
        let config = PrinterConfig::TSP650II;
        let dots = config.mm_to_dots(10.0);
        assert!((dots as i32 - 80).abs() < 2);
        assert!((config.dots_to_mm(80) - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_by_name_is_case_insensitive() {
        assert_eq!(PrinterConfig::by_name("TSP650II"), Ok(PrinterConfig::TSP650II));
        assert_eq!(PrinterConfig::by_name("SM-L200"), Ok(PrinterConfig::SM_L200));
        assert_eq!(PrinterConfig::by_name("Star mPOP"), Ok(PrinterConfig::MPOP));
    }

    #[test]
    fn test_default_metrics_follow_tsp650ii() {
        let metrics = DeviceMetrics::default();
        assert_eq!(metrics.physical_size.width, 576);
        assert_eq!(
            metrics.physical_size.height,
            PrinterConfig::TSP650II.mm_to_dots(DEFAULT_PAGE_LENGTH_MM) as u32
        );
        assert_eq!(metrics.logical_size(), metrics.physical_size);
    }

    #[test]
    fn test_logical_size_divides_by_pixel_ratio() {
        let metrics = DeviceMetrics {
            physical_size: Size::new(1080, 1920),
            pixel_ratio: 3.0,
        };
        assert_eq!(metrics.logical_size(), Size::new(360, 640));
    }
}
