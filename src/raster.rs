//! Image decoding: turns an image reference into a flat RGBA pixel buffer.
//!
//! The palette pipeline never touches files or the network itself; it is
//! handed a [`Rasterizer`] and only sees the resulting [`PixelBuffer`].

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

const HTTP_TIMEOUT: Duration = Duration::from_secs(8);
const MAX_REMOTE_BYTES: u64 = 5 * 1024 * 1024;
const USER_AGENT: &str = concat!("coverhue/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported or corrupt image: {reference}")]
    Unsupported {
        reference: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("remote image {url} exceeds {bytes} bytes")]
    TooLarge { url: String, bytes: u64 },

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    BufferLength { len: usize, width: u32, height: u32 },
}

/// A decoded bitmap in RGBA8 layout, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(DecodeError::BufferLength {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }
}

impl From<image::RgbaImage> for PixelBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

/// Where an image comes from: a local path or an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_remote(&self) -> bool {
        let lower = self.0.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Short label for display: the last path segment.
    pub fn file_name(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
        without_query
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Path> for ImageRef {
    fn from(p: &Path) -> Self {
        Self(p.display().to_string())
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can turn an image reference into pixels.
///
/// Implementations are called from worker threads.
pub trait Rasterizer: Send + Sync {
    fn decode(&self, image: &ImageRef) -> Result<PixelBuffer, DecodeError>;
}

/// Default rasterizer backed by the `image` crate, with `ureq` for URLs.
pub struct ImageRasterizer {
    max_dim: Option<u32>,
    agent: ureq::Agent,
}

impl ImageRasterizer {
    /// `max_dim` bounds both sides of the decoded image; `None` keeps the
    /// source resolution.
    pub fn new(max_dim: Option<u32>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            max_dim: max_dim.filter(|&d| d > 0),
            agent,
        }
    }

    fn load(&self, image: &ImageRef) -> Result<DynamicImage, DecodeError> {
        if image.is_remote() {
            let bytes = self.fetch(image.as_str())?;
            image::load_from_memory(&bytes).map_err(|source| DecodeError::Unsupported {
                reference: image.to_string(),
                source,
            })
        } else {
            let path = Path::new(image.as_str());
            if !path.exists() {
                return Err(DecodeError::NotFound(path.to_path_buf()));
            }
            image::open(path).map_err(|source| DecodeError::Unsupported {
                reference: image.to_string(),
                source,
            })
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
        let fetch_err = |reason: String| DecodeError::Fetch {
            url: url.to_string(),
            reason,
        };

        let resp = self
            .agent
            .get(url)
            .call()
            .map_err(|e| fetch_err(e.to_string()))?;
        if resp.status() != 200 {
            return Err(fetch_err(format!("HTTP {}", resp.status())));
        }
        if let Some(len) = resp.header("Content-Length") {
            if let Ok(n) = len.parse::<u64>() {
                if n > MAX_REMOTE_BYTES {
                    return Err(DecodeError::TooLarge {
                        url: url.to_string(),
                        bytes: MAX_REMOTE_BYTES,
                    });
                }
            }
        }

        let mut bytes = Vec::new();
        resp.into_reader()
            .take(MAX_REMOTE_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| fetch_err(e.to_string()))?;
        if bytes.len() as u64 > MAX_REMOTE_BYTES {
            return Err(DecodeError::TooLarge {
                url: url.to_string(),
                bytes: MAX_REMOTE_BYTES,
            });
        }
        if bytes.is_empty() {
            return Err(fetch_err("empty response body".to_string()));
        }
        Ok(bytes)
    }
}

impl Default for ImageRasterizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Rasterizer for ImageRasterizer {
    fn decode(&self, image: &ImageRef) -> Result<PixelBuffer, DecodeError> {
        let img = self.load(image)?;

        let img = match self.max_dim {
            Some(max) if img.width() > max || img.height() > max => {
                img.resize(max, max, FilterType::Triangle)
            }
            _ => img,
        };

        Ok(PixelBuffer::from(img.to_rgba8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::net::TcpListener;

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn create_test_image_solid(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
        let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb(rgb));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        img.save(path).unwrap();
    }

    #[test]
    fn buffer_length_must_match_dimensions() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::BufferLength {
                len: 15,
                width: 2,
                height: 2
            }
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let err = PixelBuffer::new(u32::MAX, u32::MAX, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::BufferLength {
                len: 0,
                width: u32::MAX,
                height: u32::MAX
            }
        ));
    }

    #[test]
    fn empty_buffer_is_valid() {
        let buf = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        assert_eq!(buf.pixel_count(), 0);
    }

    #[test]
    fn image_ref_detects_remote() {
        assert!(ImageRef::from("https://covers.example.org/b/id/1-L.jpg").is_remote());
        assert!(ImageRef::from("HTTP://example.org/a.png").is_remote());
        assert!(!ImageRef::from("covers/dune.png").is_remote());
    }

    #[test]
    fn image_ref_file_name() {
        assert_eq!(
            ImageRef::from("https://covers.example.org/b/id/1-L.jpg?default=false").file_name(),
            "1-L.jpg"
        );
        assert_eq!(ImageRef::from("covers/dune.png").file_name(), "dune.png");
        assert_eq!(ImageRef::from("dune.png").file_name(), "dune.png");
    }

    #[test]
    fn decode_png_as_rgba() {
        let path = fixture_path("raster_3x2.png");
        create_test_image_solid(&path, 3, 2, [10, 20, 30]);

        let buf = ImageRasterizer::default()
            .decode(&ImageRef::from(path.as_path()))
            .unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.data().len(), 24);
        assert_eq!(&buf.data()[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decode_downscales_preserving_aspect_ratio() {
        let path = fixture_path("raster_64x32.png");
        create_test_image_solid(&path, 64, 32, [90, 90, 90]);

        let buf = ImageRasterizer::new(Some(16))
            .decode(&ImageRef::from(path.as_path()))
            .unwrap();
        assert_eq!((buf.width(), buf.height()), (16, 8));
    }

    #[test]
    fn zero_max_dim_disables_downscaling() {
        let path = fixture_path("raster_40x40.png");
        create_test_image_solid(&path, 40, 40, [90, 90, 90]);

        let buf = ImageRasterizer::new(Some(0))
            .decode(&ImageRef::from(path.as_path()))
            .unwrap();
        assert_eq!((buf.width(), buf.height()), (40, 40));
    }

    #[test]
    fn decode_missing_file() {
        let err = ImageRasterizer::default()
            .decode(&ImageRef::from("/nonexistent/cover.png"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::NotFound(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn decode_unsupported_format() {
        let path = fixture_path("not_a_cover.txt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "this is not an image").unwrap();

        let err = ImageRasterizer::default()
            .decode(&ImageRef::from(path.as_path()))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Unsupported { .. }));
    }

    /// Answers a single HTTP request with `response`, returning the URL.
    fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            // The client may hang up early once it has seen enough.
            let _ = stream.write_all(&response);
        });
        format!("http://{addr}/covers/1-L.png")
    }

    fn http_response(head: &str, body: &[u8]) -> Vec<u8> {
        let mut response = format!("HTTP/1.1 {head}\r\nConnection: close\r\n").into_bytes();
        response.extend_from_slice(body);
        response
    }

    #[test]
    fn fetch_decodes_remote_png() {
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(4, 2, image::Rgb([1, 2, 3])))
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let mut body = format!("Content-Length: {}\r\n\r\n", png.len()).into_bytes();
        body.extend_from_slice(&png);
        let url = serve_once(http_response("200 OK", &body));

        let buf = ImageRasterizer::default()
            .decode(&ImageRef::from(url))
            .unwrap();
        assert_eq!((buf.width(), buf.height()), (4, 2));
        assert_eq!(&buf.data()[0..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn fetch_rejects_error_status() {
        let url = serve_once(http_response(
            "404 Not Found",
            b"Content-Length: 9\r\n\r\nnot found",
        ));

        let err = ImageRasterizer::default()
            .decode(&ImageRef::from(url.as_str()))
            .unwrap_err();
        match err {
            DecodeError::Fetch { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[test]
    fn fetch_rejects_declared_oversize() {
        let head = format!("Content-Length: {}\r\n\r\n", MAX_REMOTE_BYTES + 1);
        let url = serve_once(http_response("200 OK", head.as_bytes()));

        let err = ImageRasterizer::default()
            .decode(&ImageRef::from(url))
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TooLarge {
                bytes: MAX_REMOTE_BYTES,
                ..
            }
        ));
    }

    #[test]
    fn fetch_caps_undeclared_body() {
        let mut body = b"\r\n".to_vec();
        body.resize(2 + MAX_REMOTE_BYTES as usize + 16, b'x');
        let url = serve_once(http_response("200 OK", &body));

        let err = ImageRasterizer::default()
            .decode(&ImageRef::from(url))
            .unwrap_err();
        assert!(matches!(err, DecodeError::TooLarge { .. }));
    }

    #[test]
    fn fetch_rejects_empty_body() {
        let url = serve_once(http_response("200 OK", b"Content-Length: 0\r\n\r\n"));

        let err = ImageRasterizer::default()
            .decode(&ImageRef::from(url))
            .unwrap_err();
        match err {
            DecodeError::Fetch { reason, .. } => assert_eq!(reason, "empty response body"),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
