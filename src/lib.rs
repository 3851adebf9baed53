//! Gradient palettes for book covers.
//!
//! Decoded cover pixels are reduced by median-cut quantization to a handful
//! of representative colors, ordered brightest first and formatted as
//! `#rrggbb` stops.

pub mod cli;
pub mod color;
pub mod extractor;
pub mod gradient;
pub mod palette;
pub mod pipeline;
pub mod preview;
pub mod raster;
pub mod tui;

pub use crate::color::Color;
pub use crate::extractor::PaletteExtractor;
pub use crate::palette::{DegenerateFilter, Palette};
pub use crate::pipeline::quantize::{MedianCut, SplitMode};
pub use crate::pipeline::{extract_palette, QuantizeOptions};
pub use crate::raster::{DecodeError, ImageRasterizer, ImageRef, PixelBuffer, Rasterizer};
