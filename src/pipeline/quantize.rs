use log::debug;

use crate::color::Color;

use super::range::biggest_range_channel;

pub const DEFAULT_MAX_DEPTH: u32 = 4;
/// Deepest split the quantizer will perform; larger depths are clamped.
pub const MAX_DEPTH_LIMIT: u32 = 16;

/// How a sorted slice is divided around its midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// `[0, mid)` and `[mid, len)`: every sample lands in exactly one half.
    #[default]
    Inclusive,
    /// `[0, mid)` and `(mid, len)`: the median sample is discarded.
    ///
    /// Reproduces palettes generated by the web client, which
    /// sliced past the midpoint.
    DropMedian,
}

/// Recursive median-cut over a working set of color samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianCut {
    pub max_depth: u32,
    pub split: SplitMode,
}

impl Default for MedianCut {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            split: SplitMode::default(),
        }
    }
}

impl MedianCut {
    /// `max_depth` is clamped to [`MAX_DEPTH_LIMIT`].
    pub fn new(max_depth: u32, split: SplitMode) -> Self {
        Self {
            max_depth: max_depth.min(MAX_DEPTH_LIMIT),
            split,
        }
    }

    fn depth_limit(&self) -> u32 {
        self.max_depth.min(MAX_DEPTH_LIMIT)
    }

    /// Reduce `colors` to at most `2^max_depth` representatives.
    ///
    /// The slice is reordered in place. Buckets that end up empty contribute
    /// nothing, so small inputs yield fewer colors.
    pub fn quantize(&self, colors: &mut [Color]) -> Vec<Color> {
        let mut out = Vec::new();
        self.cut(colors, 0, &mut out);
        debug!(
            "median cut: {} samples -> {} colors (depth {}, {:?})",
            colors.len(),
            out.len(),
            self.depth_limit(),
            self.split
        );
        out
    }

    fn cut(&self, colors: &mut [Color], depth: u32, out: &mut Vec<Color>) {
        if colors.is_empty() {
            return;
        }
        if depth >= self.depth_limit() {
            out.push(average(colors));
            return;
        }
        // An inclusive split of one sample only yields the sample again.
        if let ([only], SplitMode::Inclusive) = (&*colors, self.split) {
            out.push(*only);
            return;
        }

        let channel = biggest_range_channel(colors);
        colors.sort_by_key(|c| channel.of(*c));

        let mid = colors.len() / 2;
        let (left, right) = colors.split_at_mut(mid);
        let right = match self.split {
            SplitMode::Inclusive => right,
            SplitMode::DropMedian => &mut right[1..],
        };

        self.cut(left, depth + 1, out);
        self.cut(right, depth + 1, out);
    }
}

/// Channel-wise mean, rounded half up. `colors` must not be empty.
fn average(colors: &[Color]) -> Color {
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for c in colors {
        r += c.r as u64;
        g += c.g as u64;
        b += c.b as u64;
    }
    let n = colors.len() as u64;
    let mean = |sum: u64| ((2 * sum + n) / (2 * n)) as u8;
    Color::new(mean(r), mean(g), mean(b))
}
