use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use coverhue::cli::{Args, OutputFormat};
use coverhue::extractor::PaletteExtractor;
use coverhue::preview::write_preview;
use coverhue::raster::{ImageRasterizer, Rasterizer};
use coverhue::tui::{self, TuiApp};

const PREVIEW_STRIP_WIDTH: usize = 48;
const DECODE_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rasterizer: Arc<dyn Rasterizer> = Arc::new(ImageRasterizer::new(args.max_dim()));
    let mut extractor = PaletteExtractor::new(rasterizer, args.quantize_options());

    if args.tui {
        return tui::run(TuiApp::new(args.image_refs(), extractor));
    }

    let images = args.image_refs().len();
    let failures = write_palettes(
        &args,
        &mut extractor,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;
    if failures == images {
        bail!("no palette could be extracted from {} image(s)", failures);
    }
    Ok(())
}

/// Print each image's palette to `out` and diagnostics to `err`.
///
/// Returns how many images failed to decode. An image that decodes but
/// whose colors are all filtered out is reported, not counted.
fn write_palettes<W: Write, E: Write>(
    args: &Args,
    extractor: &mut PaletteExtractor,
    out: &mut W,
    err: &mut E,
) -> Result<usize> {
    let images = args.image_refs();
    let with_headers = images.len() > 1;
    let mut failures = 0;

    for image in &images {
        extractor.request(Some(image.clone()));
        if !extractor.wait(DECODE_TIMEOUT) {
            writeln!(err, "coverhue: timed out decoding {image}")?;
            failures += 1;
            continue;
        }
        if let Some(cause) = extractor.error() {
            writeln!(err, "coverhue: {image}: {cause}")?;
            failures += 1;
            continue;
        }

        let palette = extractor.palette();
        if palette.is_empty() {
            writeln!(err, "coverhue: {image}: every color was filtered out")?;
            continue;
        }

        if with_headers {
            writeln!(out, "# {image}")?;
        }
        match args.format {
            OutputFormat::Hex => {
                for hex in palette.hex_codes() {
                    writeln!(out, "{hex}")?;
                }
            }
            OutputFormat::Css => {
                if let Some(css) = palette.to_css_gradient(args.angle) {
                    writeln!(out, "{css}")?;
                }
            }
        }
        if args.preview {
            write_preview(out, palette, PREVIEW_STRIP_WIDTH)?;
        }
    }

    Ok(failures)
}
