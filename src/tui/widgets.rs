use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::Color as AppColor;
use crate::gradient::Gradient;
use crate::palette::{DegenerateFilter, Palette};
use crate::pipeline::quantize::SplitMode;

use super::TuiApp;

fn to_color(c: AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: AppColor) -> Color {
    if c.luma() > 140.0 {
        Color::Black
    } else {
        Color::White
    }
}

/// Fills its area with the palette as a left-to-right gradient, the way the
/// book page paints it behind the cover.
pub struct GradientWidget<'a> {
    palette: &'a Palette,
}

impl<'a> GradientWidget<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }
}

impl Widget for GradientWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Gradient");
        let inner = block.inner(area);
        block.render(area, buf);

        let strip = Gradient::new(self.palette).strip(inner.width as usize);
        if strip.is_empty() {
            Paragraph::new("  no palette")
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
            return;
        }

        for (dx, c) in strip.into_iter().enumerate() {
            let x = inner.x + dx as u16;
            for y in inner.top()..inner.bottom() {
                buf[(x, y)].set_char(' ').set_bg(to_color(c));
            }
        }
    }
}

/// One swatch per palette entry with its hex code.
pub struct SwatchListWidget<'a> {
    palette: &'a Palette,
}

impl<'a> SwatchListWidget<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }
}

fn swatch_line(index: usize, c: AppColor) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>4} ", index), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("  {}  ", c.to_hex()),
            Style::default().bg(to_color(c)).fg(contrast_fg(c)),
        ),
        Span::raw(format!("  luma {:.1}", c.luma())),
    ])
}

impl Widget for SwatchListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(format!("Palette ({})", self.palette.len()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .palette
            .colors()
            .iter()
            .enumerate()
            .map(|(i, &c)| swatch_line(i, c))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Current image, request state, and active options.
pub struct StatusWidget<'a> {
    app: &'a TuiApp,
}

impl<'a> StatusWidget<'a> {
    pub fn new(app: &'a TuiApp) -> Self {
        Self { app }
    }
}

fn status_line(app: &TuiApp) -> Line<'static> {
    let image = match app.current_image() {
        Some(img) => format!(
            " {} [{}/{}]",
            img.file_name(),
            app.selected + 1,
            app.images.len()
        ),
        None => " no image".to_string(),
    };
    let state = if app.extractor.is_pending() {
        Span::styled("  decoding…", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("  ready", Style::default().fg(Color::Green))
    };

    let options = app.extractor.options();
    let split = match options.split {
        SplitMode::Inclusive => "inclusive",
        SplitMode::DropMedian => "drop-median",
    };
    let filter = match options.filter {
        DegenerateFilter::Skip => "skip-degenerate",
        DegenerateFilter::Keep => "keep-degenerate",
    };

    Line::from(vec![
        Span::styled(image, Style::default().add_modifier(Modifier::BOLD)),
        state,
        Span::raw(format!(
            "  depth {} · {split} · {filter}",
            options.max_depth
        )),
        Span::styled(
            "   ←/→ image  d split  k filter  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered();
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(status_line(self.app)).render(inner, buf);
    }
}
