//! The in-memory pixel buffer handed between state, history, and operations.
//!
//! [`ImageBuffer`] is a value type: cloning produces an independent deep
//! copy, equality is full by-value comparison, and no two owners ever share
//! mutable pixel storage. This is the discipline that keeps the undo/redo
//! stacks safe without locks.

use blake3::Hasher;
use image::DynamicImage;

use crate::error::EditError;

/// An owned pixel grid with dimension and channel metadata.
///
/// Pixels are stored row-major with interleaved channels: 1 channel is
/// grayscale, 3 is RGB, 4 is RGBA. The buffer length is always exactly
/// `width * height * channels`.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl ImageBuffer {
    /// Create a buffer from raw pixel data.
    ///
    /// Fails if the channel count is unsupported or the data length does
    /// not match `width * height * channels`. An empty (zero-dimension)
    /// buffer is representable but is rejected by load/update and by every
    /// operation.
    pub fn from_pixels(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Self, EditError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(EditError::InvalidInput(format!(
                "unsupported channel count: {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(EditError::InvalidInput(format!(
                "pixel data length {} does not match {}x{}x{}",
                pixels.len(),
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
            channels,
        })
    }

    /// Create a buffer filled with a single value. Handy for synthetic
    /// images in callers and tests.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Result<Self, EditError> {
        let len = width as usize * height as usize * channels as usize;
        Self::from_pixels(vec![value; len], width, height, channels)
    }

    /// Convert a decoded [`DynamicImage`] into a buffer.
    ///
    /// Luma8, Rgb8, and Rgba8 map directly; every other storage format is
    /// normalized to Rgb8.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => Self {
                width: gray.width(),
                height: gray.height(),
                channels: 1,
                pixels: gray.as_raw().clone(),
            },
            DynamicImage::ImageRgb8(rgb) => Self {
                width: rgb.width(),
                height: rgb.height(),
                channels: 3,
                pixels: rgb.as_raw().clone(),
            },
            DynamicImage::ImageRgba8(rgba) => Self {
                width: rgba.width(),
                height: rgba.height(),
                channels: 4,
                pixels: rgba.as_raw().clone(),
            },
            other => {
                let rgb = other.to_rgb8();
                Self {
                    width: rgb.width(),
                    height: rgb.height(),
                    channels: 3,
                    pixels: rgb.into_raw(),
                }
            }
        }
    }

    /// View the buffer as a [`DynamicImage`] for filtering and encoding.
    pub fn to_dynamic(&self) -> DynamicImage {
        let (w, h) = (self.width, self.height);
        match self.channels {
            1 => image::GrayImage::from_raw(w, h, self.pixels.clone())
                .map(DynamicImage::ImageLuma8),
            3 => image::RgbImage::from_raw(w, h, self.pixels.clone())
                .map(DynamicImage::ImageRgb8),
            4 => image::RgbaImage::from_raw(w, h, self.pixels.clone())
                .map(DynamicImage::ImageRgba8),
            _ => None,
        }
        // The length invariant is enforced at construction, so this arm is
        // unreachable for any buffer built through the public constructors.
        .unwrap_or_else(|| DynamicImage::ImageRgb8(image::RgbImage::new(0, 0)))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of interleaved channels (1, 3, or 4).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Dimensions as a `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw pixel bytes, row-major, channels interleaved.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty() || self.width == 0 || self.height == 0
    }

    /// BLAKE3 digest of dimensions, channel count, and pixel content.
    ///
    /// Two buffers with equal digests are almost certainly equal; the
    /// history layer still falls back to a full comparison before treating
    /// a push as a duplicate.
    pub fn content_digest(&self) -> blake3::Hash {
        let mut hasher = Hasher::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(&[self.channels]);
        hasher.update(&self.pixels);
        hasher.finalize()
    }
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_validates_length() {
        let result = ImageBuffer::from_pixels(vec![0u8; 10], 2, 2, 3);
        assert!(result.is_err());

        let result = ImageBuffer::from_pixels(vec![0u8; 12], 2, 2, 3);
        assert!(result.is_ok());
    }

    #[test]
    fn test_from_pixels_rejects_bad_channel_count() {
        let result = ImageBuffer::from_pixels(vec![0u8; 8], 2, 2, 2);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_buffer_is_representable() {
        let buffer = ImageBuffer::from_pixels(vec![], 0, 0, 3).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let a = ImageBuffer::filled(4, 4, 3, 100).unwrap();
        let b = a.clone();
        assert_eq!(a, b);

        // Rebuild b with one differing byte; a must be unaffected
        let mut pixels = b.pixels().to_vec();
        pixels[0] = 7;
        let b = ImageBuffer::from_pixels(pixels, 4, 4, 3).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.pixels()[0], 100);
    }

    #[test]
    fn test_digest_tracks_content() {
        let a = ImageBuffer::filled(4, 4, 3, 100).unwrap();
        let b = ImageBuffer::filled(4, 4, 3, 100).unwrap();
        let c = ImageBuffer::filled(4, 4, 3, 101).unwrap();
        assert_eq!(a.content_digest(), b.content_digest());
        assert_ne!(a.content_digest(), c.content_digest());
    }

    #[test]
    fn test_digest_tracks_shape() {
        // Same byte content, different layout
        let a = ImageBuffer::from_pixels(vec![0u8; 12], 4, 1, 3).unwrap();
        let b = ImageBuffer::from_pixels(vec![0u8; 12], 1, 4, 3).unwrap();
        assert_ne!(a.content_digest(), b.content_digest());
    }

    #[test]
    fn test_dynamic_roundtrip_rgb() {
        let buffer = ImageBuffer::filled(5, 3, 3, 42).unwrap();
        let restored = ImageBuffer::from_dynamic(&buffer.to_dynamic());
        assert_eq!(buffer, restored);
    }

    #[test]
    fn test_dynamic_roundtrip_gray() {
        let buffer = ImageBuffer::filled(5, 3, 1, 42).unwrap();
        let restored = ImageBuffer::from_dynamic(&buffer.to_dynamic());
        assert_eq!(buffer, restored);
        assert_eq!(restored.channels(), 1);
    }

    #[test]
    fn test_dynamic_roundtrip_rgba() {
        let buffer = ImageBuffer::filled(2, 2, 4, 9).unwrap();
        let restored = ImageBuffer::from_dynamic(&buffer.to_dynamic());
        assert_eq!(buffer, restored);
        assert_eq!(restored.channels(), 4);
    }
}
