use std::cmp::Ordering;

use crate::color::Color;

/// Sort brightest first by BT.709 luma.
pub fn sort_by_luminance(colors: &mut [Color]) {
    colors.sort_unstable_by(|a, b| b.luma().partial_cmp(&a.luma()).unwrap_or(Ordering::Equal));
}
