pub mod widgets;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::Terminal;

use crate::extractor::PaletteExtractor;
use crate::palette::DegenerateFilter;
use crate::pipeline::quantize::SplitMode;
use crate::raster::ImageRef;

use widgets::{GradientWidget, StatusWidget, SwatchListWidget};

const TICK: Duration = Duration::from_millis(100);

/// State for the interactive viewer.
pub struct TuiApp {
    pub images: Vec<ImageRef>,
    pub selected: usize,
    pub extractor: PaletteExtractor,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(images: Vec<ImageRef>, extractor: PaletteExtractor) -> Self {
        Self {
            images,
            selected: 0,
            extractor,
            should_quit: false,
        }
    }

    pub fn current_image(&self) -> Option<&ImageRef> {
        self.images.get(self.selected)
    }

    /// Ask for the palette of the selected image, superseding older requests.
    pub fn refresh(&mut self) {
        let image = self.current_image().cloned();
        self.extractor.request(image);
    }

    /// Apply one key press. Returns `true` if a new palette was requested.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Right | KeyCode::Char('l') if !self.images.is_empty() => {
                self.selected = (self.selected + 1) % self.images.len();
                self.refresh();
                true
            }
            KeyCode::Left | KeyCode::Char('h') if !self.images.is_empty() => {
                self.selected = (self.selected + self.images.len() - 1) % self.images.len();
                self.refresh();
                true
            }
            KeyCode::Char('d') => {
                let mut options = self.extractor.options();
                options.split = match options.split {
                    SplitMode::Inclusive => SplitMode::DropMedian,
                    SplitMode::DropMedian => SplitMode::Inclusive,
                };
                self.extractor.set_options(options);
                self.refresh();
                true
            }
            KeyCode::Char('k') => {
                let mut options = self.extractor.options();
                options.filter = match options.filter {
                    DegenerateFilter::Skip => DegenerateFilter::Keep,
                    DegenerateFilter::Keep => DegenerateFilter::Skip,
                };
                self.extractor.set_options(options);
                self.refresh();
                true
            }
            _ => false,
        }
    }
}

/// Raw mode and the alternate screen, undone on drop so every exit path
/// (including a panic in the loop) leaves a usable terminal.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}

/// Launch the viewer and block until the user quits.
pub fn run(mut app: TuiApp) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    event_loop(&mut terminal, &mut app)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
) -> Result<()> {
    app.refresh();

    while !app.should_quit {
        app.extractor.poll();

        let view: &TuiApp = app;
        terminal.draw(|frame| {
            let [gradient_area, swatch_area, status_area] = Layout::vertical([
                Constraint::Percentage(40),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .areas(frame.area());

            let palette = view.extractor.palette();
            frame.render_widget(GradientWidget::new(palette), gradient_area);
            frame.render_widget(SwatchListWidget::new(palette), swatch_area);
            frame.render_widget(StatusWidget::new(view), status_area);
        })?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }
    Ok(())
}
