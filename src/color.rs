use palette::Srgb;

/// BT.709 luma weights applied to gamma-encoded 0-255 channel values.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// An 8-bit sRGB color sample.
/// Produced from decoded pixel data and consumed by every pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    pub fn from_srgb_u8(srgb: Srgb<u8>) -> Self {
        Self {
            r: srgb.red,
            g: srgb.green,
            b: srgb.blue,
        }
    }

    /// Relative luminance on the raw channel values (no linearization).
    ///
    /// Ranges from 0.0 (black) to 255.0 (white). Only used for ordering, so
    /// the scale does not matter.
    pub fn luma(self) -> f32 {
        LUMA_R * self.r as f32 + LUMA_G * self.g as f32 + LUMA_B * self.b as f32
    }

    /// A color with at least one zero channel.
    ///
    /// The palette formatter drops these by default, which also removes
    /// pure primaries and black.
    pub fn is_degenerate(self) -> bool {
        self.r == 0 || self.g == 0 || self.b == 0
    }
}

impl From<Srgb<u8>> for Color {
    fn from(srgb: Srgb<u8>) -> Self {
        Self::from_srgb_u8(srgb)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Self {
        color.to_srgb_u8()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
