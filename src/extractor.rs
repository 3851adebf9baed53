//! Image-to-palette orchestration.
//!
//! Each request decodes on its own worker thread and reports back over a
//! channel tagged with the generation it was issued under. Only the outcome
//! for the most recent generation is applied, so a slow decode for an older
//! image can never overwrite the palette of a newer one.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::palette::Palette;
use crate::pipeline::{extract_palette, QuantizeOptions};
use crate::raster::{DecodeError, ImageRef, Rasterizer};

struct Outcome {
    generation: u64,
    image: ImageRef,
    result: Result<Palette, DecodeError>,
}

pub struct PaletteExtractor {
    rasterizer: Arc<dyn Rasterizer>,
    options: QuantizeOptions,
    generation: u64,
    pending: bool,
    current: Option<ImageRef>,
    palette: Palette,
    error: Option<DecodeError>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl PaletteExtractor {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, options: QuantizeOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rasterizer,
            options,
            generation: 0,
            pending: false,
            current: None,
            palette: Palette::empty(),
            error: None,
            tx,
            rx,
        }
    }

    pub fn options(&self) -> QuantizeOptions {
        self.options
    }

    /// Change tuning. Takes effect on the next `request`.
    pub fn set_options(&mut self, options: QuantizeOptions) {
        self.options = options;
    }

    /// Start extracting a palette for `image`, superseding any request still
    /// in flight. `None` clears the palette without doing any work.
    ///
    /// Returns the generation assigned to this request.
    pub fn request(&mut self, image: Option<ImageRef>) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        self.error = None;

        let Some(image) = image else {
            debug!("generation {generation}: no image, clearing palette");
            self.current = None;
            self.pending = false;
            self.palette = Palette::empty();
            return generation;
        };

        debug!("generation {generation}: requesting palette for {image}");
        self.current = Some(image.clone());
        self.pending = true;

        let rasterizer = Arc::clone(&self.rasterizer);
        let options = self.options;
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = rasterizer
                .decode(&image)
                .map(|buffer| extract_palette(&buffer, &options));
            let _ = tx.send(Outcome {
                generation,
                image,
                result,
            });
        });

        generation
    }

    /// Apply any finished work without blocking. Returns `true` if the
    /// current request resolved.
    pub fn poll(&mut self) -> bool {
        let mut resolved = false;
        while let Ok(outcome) = self.rx.try_recv() {
            resolved |= self.apply(outcome);
        }
        resolved
    }

    /// Block until the current request resolves or `timeout` elapses.
    /// Returns `true` if it resolved.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        if self.poll() || !self.pending {
            return !self.pending;
        }

        let deadline = Instant::now() + timeout;
        while self.pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                // We hold a sender ourselves, so this never happens.
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "discarding stale palette for {} (generation {}, current {})",
                outcome.image, outcome.generation, self.generation
            );
            return false;
        }

        self.pending = false;
        match outcome.result {
            Ok(palette) => {
                debug!(
                    "generation {}: {} colors for {}",
                    outcome.generation,
                    palette.len(),
                    outcome.image
                );
                self.palette = palette;
            }
            Err(e) => {
                warn!("no palette for {}: {e}", outcome.image);
                self.palette = Palette::empty();
                self.error = Some(e);
            }
        }
        true
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Why the current request failed, if it did. An empty palette with no
    /// error means the image decoded but every color was filtered out.
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn current_image(&self) -> Option<&ImageRef> {
        self.current.as_ref()
    }
}
