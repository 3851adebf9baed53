use crate::color::Color;

/// What to do with colors that have a zero channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegenerateFilter {
    /// Omit them, matching palettes produced by the web client.
    #[default]
    Skip,
    /// Format every color.
    Keep,
}

impl DegenerateFilter {
    fn admits(self, color: Color) -> bool {
        match self {
            DegenerateFilter::Skip => !color.is_degenerate(),
            DegenerateFilter::Keep => true,
        }
    }
}

/// Ordered gradient stops extracted from an image, brightest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from luminance-sorted colors, applying `filter` and dropping
    /// repeated entries (the first occurrence keeps its position).
    pub fn from_sorted(sorted: &[Color], filter: DegenerateFilter) -> Self {
        let mut colors: Vec<Color> = Vec::with_capacity(sorted.len());
        for &c in sorted {
            if filter.admits(c) && !colors.contains(&c) {
                colors.push(c);
            }
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `#rrggbb` strings in palette order.
    pub fn hex_codes(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    /// CSS `linear-gradient(...)` value, or `None` for an empty palette.
    /// A one-color palette repeats its stop so the gradient stays valid.
    pub fn to_css_gradient(&self, angle_deg: u16) -> Option<String> {
        let mut stops = self.hex_codes();
        match stops.len() {
            0 => return None,
            1 => stops.push(stops[0].clone()),
            _ => {}
        }
        Some(format!("linear-gradient({angle_deg}deg, {})", stops.join(", ")))
    }
}
