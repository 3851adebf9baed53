use crate::color::Color;
use crate::raster::PixelBuffer;

/// Reshape packed RGBA bytes into color samples, ignoring alpha.
///
/// A trailing partial pixel (fewer than four bytes) is ignored.
pub fn rgb_from_rgba(data: &[u8]) -> Vec<Color> {
    data.chunks_exact(4)
        .map(|px| Color::new(px[0], px[1], px[2]))
        .collect()
}

/// All pixels of a decoded buffer as color samples, in row-major order.
pub fn colors_from_buffer(buffer: &PixelBuffer) -> Vec<Color> {
    rgb_from_rgba(buffer.data())
}
