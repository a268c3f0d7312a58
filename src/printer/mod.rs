//! # Printer Module
//!
//! This module provides printer-specific configurations and utilities.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware specifications and rendering device metrics

pub mod config;

pub use config::{DeviceMetrics, PrinterConfig};
