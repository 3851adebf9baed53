use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn of(self, color: Color) -> u8 {
        match self {
            Channel::Red => color.r,
            Channel::Green => color.g,
            Channel::Blue => color.b,
        }
    }
}

/// Per-channel spread (max - min) across `colors`, as `(r, g, b)`.
///
/// An empty slice has zero spread on every channel.
pub fn channel_ranges(colors: &[Color]) -> (u8, u8, u8) {
    if colors.is_empty() {
        return (0, 0, 0);
    }

    let (mut r_min, mut r_max) = (u8::MAX, u8::MIN);
    let (mut g_min, mut g_max) = (u8::MAX, u8::MIN);
    let (mut b_min, mut b_max) = (u8::MAX, u8::MIN);

    for c in colors {
        (r_min, r_max) = (r_min.min(c.r), r_max.max(c.r));
        (g_min, g_max) = (g_min.min(c.g), g_max.max(c.g));
        (b_min, b_max) = (b_min.min(c.b), b_max.max(c.b));
    }

    (r_max - r_min, g_max - g_min, b_max - b_min)
}

/// The channel with the widest spread. Ties resolve red, then green, then blue.
pub fn biggest_range_channel(colors: &[Color]) -> Channel {
    let (r, g, b) = channel_ranges(colors);
    if r >= g && r >= b {
        Channel::Red
    } else if g >= b {
        Channel::Green
    } else {
        Channel::Blue
    }
}
