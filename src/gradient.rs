use palette::{Mix, Srgb};

use crate::color::Color;
use crate::palette::Palette;

/// Evenly spaced linear gradient over palette stops, interpolated in
/// gamma-encoded sRGB like a CSS `linear-gradient`.
#[derive(Debug, Clone)]
pub struct Gradient {
    stops: Vec<Srgb<f32>>,
}

impl Gradient {
    pub fn new(palette: &Palette) -> Self {
        let stops = palette
            .colors()
            .iter()
            .map(|c| c.to_srgb_u8().into_format::<f32>())
            .collect();
        Self { stops }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Color at position `t` in `[0, 1]` (clamped). `None` without stops.
    pub fn sample(&self, t: f32) -> Option<Color> {
        let last = self.stops.len().checked_sub(1)?;
        if last == 0 {
            return Some(to_color(self.stops[0]));
        }

        let pos = t.clamp(0.0, 1.0) * last as f32;
        let i = (pos.floor() as usize).min(last - 1);
        let frac = pos - i as f32;
        Some(to_color(self.stops[i].mix(self.stops[i + 1], frac)))
    }

    /// `width` evenly spaced samples from the first stop to the last.
    pub fn strip(&self, width: usize) -> Vec<Color> {
        match width {
            0 => Vec::new(),
            1 => self.sample(0.0).into_iter().collect(),
            _ => (0..width)
                .filter_map(|x| self.sample(x as f32 / (width - 1) as f32))
                .collect(),
        }
    }
}

fn to_color(srgb: Srgb<f32>) -> Color {
    Color::from_srgb_u8(srgb.into_format::<u8>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DegenerateFilter;

    fn palette(colors: &[Color]) -> Palette {
        Palette::from_sorted(colors, DegenerateFilter::Keep)
    }

    #[test]
    fn empty_palette_has_no_samples() {
        let g = Gradient::new(&Palette::empty());
        assert!(g.is_empty());
        assert_eq!(g.sample(0.5), None);
        assert!(g.strip(10).is_empty());
    }

    #[test]
    fn single_stop_is_flat() {
        let c = Color::new(40, 80, 120);
        let g = Gradient::new(&palette(&[c]));
        assert_eq!(g.strip(5), vec![c; 5]);
    }

    #[test]
    fn endpoints_match_stops() {
        let a = Color::new(250, 240, 230);
        let b = Color::new(10, 20, 30);
        let g = Gradient::new(&palette(&[a, b]));
        assert_eq!(g.sample(0.0), Some(a));
        assert_eq!(g.sample(1.0), Some(b));
        assert_eq!(g.sample(-3.0), Some(a));
        assert_eq!(g.sample(7.0), Some(b));
    }

    #[test]
    fn midpoint_interpolates() {
        let g = Gradient::new(&palette(&[Color::new(200, 200, 200), Color::new(100, 100, 100)]));
        let mid = g.sample(0.5).unwrap();
        assert!((mid.r as i16 - 150).abs() <= 1, "got {mid}");
    }

    #[test]
    fn middle_stop_hit_exactly() {
        let stops = [
            Color::new(255, 255, 255),
            Color::new(128, 64, 32),
            Color::new(1, 1, 1),
        ];
        let g = Gradient::new(&palette(&stops));
        assert_eq!(g.sample(0.5), Some(stops[1]));
    }

    #[test]
    fn strip_spans_first_to_last() {
        let a = Color::new(250, 240, 230);
        let b = Color::new(10, 20, 30);
        let strip = Gradient::new(&palette(&[a, b])).strip(12);
        assert_eq!(strip.len(), 12);
        assert_eq!(strip[0], a);
        assert_eq!(strip[11], b);
    }
}
