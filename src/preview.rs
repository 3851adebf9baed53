use std::io::Write;

use anyhow::Result;
use crossterm::queue;
use crossterm::style::{
    Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor,
};

use crate::color::Color;
use crate::gradient::Gradient;
use crate::palette::Palette;

const SWATCH_WIDTH: usize = 9;

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Black or white text, whichever reads better on `c`.
fn label_color(c: Color) -> TermColor {
    if c.luma() > 140.0 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

/// Print one labelled swatch per palette entry, then a gradient strip of
/// `strip_width` cells.
pub fn write_preview<W: Write>(out: &mut W, palette: &Palette, strip_width: usize) -> Result<()> {
    if palette.is_empty() {
        writeln!(out, "(empty palette)")?;
        return Ok(());
    }

    for &c in palette.colors() {
        queue!(
            out,
            SetBackgroundColor(term_color(c)),
            SetForegroundColor(label_color(c)),
            Print(format!("{:^width$}", c.to_hex(), width = SWATCH_WIDTH)),
            ResetColor,
            Print(" ")
        )?;
    }
    queue!(out, Print("\n"))?;

    for c in Gradient::new(palette).strip(strip_width) {
        queue!(out, SetBackgroundColor(term_color(c)), Print(" "))?;
    }
    queue!(out, ResetColor, Print("\n"))?;
    out.flush()?;
    Ok(())
}
