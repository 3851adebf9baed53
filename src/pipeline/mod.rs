pub mod extract;
pub mod order;
pub mod quantize;
pub mod range;

use log::debug;

use crate::palette::{DegenerateFilter, Palette};
use crate::raster::PixelBuffer;

use quantize::{MedianCut, SplitMode, DEFAULT_MAX_DEPTH};

/// Tuning for a single palette extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeOptions {
    pub max_depth: u32,
    pub split: SplitMode,
    pub filter: DegenerateFilter,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            split: SplitMode::default(),
            filter: DegenerateFilter::default(),
        }
    }
}

/// Decoded pixels in, gradient palette out.
pub fn extract_palette(buffer: &PixelBuffer, options: &QuantizeOptions) -> Palette {
    let mut colors = extract::colors_from_buffer(buffer);
    debug!(
        "extracting palette from {}x{} buffer ({} samples)",
        buffer.width(),
        buffer.height(),
        colors.len()
    );

    let mut representatives =
        MedianCut::new(options.max_depth, options.split).quantize(&mut colors);
    order::sort_by_luminance(&mut representatives);
    Palette::from_sorted(&representatives, options.filter)
}
