use clap::Parser;

use crate::palette::DegenerateFilter;
use crate::pipeline::quantize::{SplitMode, DEFAULT_MAX_DEPTH};
use crate::pipeline::QuantizeOptions;
use crate::raster::ImageRef;

/// Extract a gradient palette from book cover images.
#[derive(Parser, Debug)]
#[command(name = "coverhue", version, about)]
pub struct Args {
    /// Image paths or http(s) URLs
    #[arg(required = true)]
    pub images: Vec<String>,

    /// Median-cut depth; the palette holds at most 2^depth colors
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::value_parser!(u32).range(1..=8)
    )]
    pub depth: u32,

    /// Drop the median sample at every split, as the web client did
    #[arg(long)]
    pub drop_median: bool,

    /// Keep colors that have a zero channel
    #[arg(long)]
    pub keep_degenerate: bool,

    /// Downscale so neither side exceeds this many pixels (0 = never)
    #[arg(long, default_value_t = 256)]
    pub max_dim: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Hex)]
    pub format: OutputFormat,

    /// Angle of the CSS gradient in degrees
    #[arg(long, default_value_t = 180, value_parser = clap::value_parser!(u16).range(0..360))]
    pub angle: u16,

    /// Print a colored terminal preview of each palette
    #[arg(long)]
    pub preview: bool,

    /// Browse the images in an interactive viewer
    #[arg(long, conflicts_with_all = ["preview", "format"])]
    pub tui: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `#rrggbb` per line
    Hex,
    /// A CSS `linear-gradient(...)` value
    Css,
}

impl Args {
    pub fn quantize_options(&self) -> QuantizeOptions {
        QuantizeOptions {
            max_depth: self.depth,
            split: if self.drop_median {
                SplitMode::DropMedian
            } else {
                SplitMode::Inclusive
            },
            filter: if self.keep_degenerate {
                DegenerateFilter::Keep
            } else {
                DegenerateFilter::Skip
            },
        }
    }

    pub fn max_dim(&self) -> Option<u32> {
        (self.max_dim > 0).then_some(self.max_dim)
    }

    pub fn image_refs(&self) -> Vec<ImageRef> {
        self.images.iter().map(|s| ImageRef::new(s.as_str())).collect()
    }
}
