//! Shared pixel plumbing for the operation catalog.
//!
//! Filters from `imageproc` operate on single-channel images, so color
//! buffers are split into per-channel planes, filtered independently, and
//! reassembled. Pointwise arithmetic works directly on the raw bytes and
//! leaves the alpha channel untouched.

use image::GrayImage;

use crate::buffer::ImageBuffer;
use crate::error::OperationError;

/// Reject empty buffers before any pixel work.
pub(crate) fn ensure_nonempty(buffer: &ImageBuffer) -> Result<(), OperationError> {
    if buffer.is_empty() {
        return Err(OperationError::InvalidImage("empty buffer".into()));
    }
    Ok(())
}

/// Rebuild a buffer from computed bytes, mapping the (unreachable for
/// correctly sized data) constructor error into an operation error.
pub(crate) fn rebuild(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
) -> Result<ImageBuffer, OperationError> {
    ImageBuffer::from_pixels(pixels, width, height, channels)
        .map_err(|e| OperationError::InvalidImage(e.to_string()))
}

/// Split a buffer into one grayscale plane per channel.
pub(crate) fn planes(buffer: &ImageBuffer) -> Vec<GrayImage> {
    let (w, h) = buffer.dimensions();
    let channels = buffer.channels() as usize;
    let pixels = buffer.pixels();
    (0..channels)
        .map(|c| {
            GrayImage::from_fn(w, h, |x, y| {
                let idx = (y as usize * w as usize + x as usize) * channels + c;
                image::Luma([pixels[idx]])
            })
        })
        .collect()
}

/// Reassemble per-channel planes into an interleaved buffer.
pub(crate) fn from_planes(
    planes: &[GrayImage],
    width: u32,
    height: u32,
) -> Result<ImageBuffer, OperationError> {
    let channels = planes.len();
    let mut pixels = vec![0u8; width as usize * height as usize * channels];
    for (c, plane) in planes.iter().enumerate() {
        for (x, y, value) in plane.enumerate_pixels() {
            let idx = (y as usize * width as usize + x as usize) * channels + c;
            pixels[idx] = value.0[0];
        }
    }
    rebuild(pixels, width, height, channels as u8)
}

/// Apply a single-channel filter to every plane and reassemble.
pub(crate) fn filter_planes<F>(buffer: &ImageBuffer, f: F) -> Result<ImageBuffer, OperationError>
where
    F: Fn(&GrayImage) -> GrayImage,
{
    let (w, h) = buffer.dimensions();
    let filtered: Vec<GrayImage> = planes(buffer).iter().map(|p| f(p)).collect();
    from_planes(&filtered, w, h)
}

/// Apply a single-channel filter to the color planes only, passing any
/// alpha plane through untouched.
pub(crate) fn filter_color_planes<F>(
    buffer: &ImageBuffer,
    f: F,
) -> Result<ImageBuffer, OperationError>
where
    F: Fn(&GrayImage) -> GrayImage,
{
    let (w, h) = buffer.dimensions();
    let color_count = color_channels(buffer);
    let filtered: Vec<GrayImage> = planes(buffer)
        .iter()
        .enumerate()
        .map(|(c, p)| if c < color_count { f(p) } else { p.clone() })
        .collect();
    from_planes(&filtered, w, h)
}

/// Number of color channels (alpha excluded).
pub(crate) fn color_channels(buffer: &ImageBuffer) -> usize {
    match buffer.channels() {
        4 => 3,
        c => c as usize,
    }
}

/// Pointwise transform of the color bytes; alpha bytes pass through.
pub(crate) fn map_color_bytes<F>(buffer: &ImageBuffer, f: F) -> Result<ImageBuffer, OperationError>
where
    F: Fn(u8) -> u8,
{
    let channels = buffer.channels() as usize;
    let color = color_channels(buffer);
    let pixels: Vec<u8> = buffer
        .pixels()
        .iter()
        .enumerate()
        .map(|(i, &v)| if i % channels < color { f(v) } else { v })
        .collect();
    rebuild(pixels, buffer.width(), buffer.height(), buffer.channels())
}

/// Weighted blend of two same-shape buffers:
/// `clamp(a * alpha + b * beta + gamma)` on color bytes, alpha from `a`.
pub(crate) fn blend_weighted(
    a: &ImageBuffer,
    b: &ImageBuffer,
    alpha: f32,
    beta: f32,
    gamma: f32,
) -> Result<ImageBuffer, OperationError> {
    ensure_same_shape(a, b)?;
    let channels = a.channels() as usize;
    let color = color_channels(a);
    let pixels: Vec<u8> = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .enumerate()
        .map(|(i, (&av, &bv))| {
            if i % channels < color {
                clamp_u8(av as f32 * alpha + bv as f32 * beta + gamma)
            } else {
                av
            }
        })
        .collect();
    rebuild(pixels, a.width(), a.height(), a.channels())
}

/// Saturating per-byte subtraction on color bytes, alpha from `a`.
pub(crate) fn saturating_sub(
    a: &ImageBuffer,
    b: &ImageBuffer,
) -> Result<ImageBuffer, OperationError> {
    combine_color_bytes(a, b, u8::saturating_sub)
}

/// Saturating per-byte addition on color bytes, alpha from `a`.
pub(crate) fn saturating_add(
    a: &ImageBuffer,
    b: &ImageBuffer,
) -> Result<ImageBuffer, OperationError> {
    combine_color_bytes(a, b, u8::saturating_add)
}

fn combine_color_bytes<F>(
    a: &ImageBuffer,
    b: &ImageBuffer,
    f: F,
) -> Result<ImageBuffer, OperationError>
where
    F: Fn(u8, u8) -> u8,
{
    ensure_same_shape(a, b)?;
    let channels = a.channels() as usize;
    let color = color_channels(a);
    let pixels: Vec<u8> = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .enumerate()
        .map(|(i, (&av, &bv))| if i % channels < color { f(av, bv) } else { av })
        .collect();
    rebuild(pixels, a.width(), a.height(), a.channels())
}

fn ensure_same_shape(a: &ImageBuffer, b: &ImageBuffer) -> Result<(), OperationError> {
    if a.dimensions() != b.dimensions() || a.channels() != b.channels() {
        return Err(OperationError::InvalidImage(format!(
            "shape mismatch: {}x{}x{} vs {}x{}x{}",
            a.width(),
            a.height(),
            a.channels(),
            b.width(),
            b.height(),
            b.channels()
        )));
    }
    Ok(())
}

/// Luminance view of the buffer.
pub(crate) fn to_luma(buffer: &ImageBuffer) -> GrayImage {
    buffer.to_dynamic().to_luma8()
}

/// Expand a grayscale result back to the channel layout of the source
/// buffer. Alpha, when present, is fully opaque.
pub(crate) fn expand_gray(
    gray: &GrayImage,
    channels: u8,
) -> Result<ImageBuffer, OperationError> {
    let (w, h) = gray.dimensions();
    let out_channels = channels as usize;
    let color = match channels {
        4 => 3,
        c => c as usize,
    };
    let mut pixels = vec![255u8; w as usize * h as usize * out_channels];
    for (x, y, value) in gray.enumerate_pixels() {
        let base = (y as usize * w as usize + x as usize) * out_channels;
        for c in 0..color {
            pixels[base + c] = value.0[0];
        }
    }
    rebuild(pixels, w, h, channels)
}

/// Mean of the color bytes.
pub(crate) fn color_mean(buffer: &ImageBuffer) -> f64 {
    let channels = buffer.channels() as usize;
    let color = color_channels(buffer);
    let mut sum = 0u64;
    let mut count = 0u64;
    for (i, &v) in buffer.pixels().iter().enumerate() {
        if i % channels < color {
            sum += v as u64;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Extract a rectangular region as an independent buffer. The region must
/// lie within bounds.
pub(crate) fn crop(
    buffer: &ImageBuffer,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<ImageBuffer, OperationError> {
    if x + width > buffer.width() || y + height > buffer.height() {
        return Err(OperationError::InvalidImage(format!(
            "crop region {}x{}+{}+{} exceeds {}x{}",
            width,
            height,
            x,
            y,
            buffer.width(),
            buffer.height()
        )));
    }
    let channels = buffer.channels() as usize;
    let src_stride = buffer.width() as usize * channels;
    let row_len = width as usize * channels;
    let mut pixels = Vec::with_capacity(height as usize * row_len);
    for row in y..y + height {
        let start = row as usize * src_stride + x as usize * channels;
        pixels.extend_from_slice(&buffer.pixels()[start..start + row_len]);
    }
    rebuild(pixels, width, height, buffer.channels())
}

/// Copy `patch` into `base` at the given offset, returning a new buffer.
/// The patch must fit within the base.
pub(crate) fn paste(
    base: &ImageBuffer,
    patch: &ImageBuffer,
    x: u32,
    y: u32,
) -> Result<ImageBuffer, OperationError> {
    if patch.channels() != base.channels()
        || x + patch.width() > base.width()
        || y + patch.height() > base.height()
    {
        return Err(OperationError::InvalidImage(format!(
            "patch {}x{}x{} does not fit in {}x{}x{} at +{}+{}",
            patch.width(),
            patch.height(),
            patch.channels(),
            base.width(),
            base.height(),
            base.channels(),
            x,
            y
        )));
    }
    let channels = base.channels() as usize;
    let dst_stride = base.width() as usize * channels;
    let src_stride = patch.width() as usize * channels;
    let mut pixels = base.pixels().to_vec();
    for row in 0..patch.height() {
        let dst_start = (y + row) as usize * dst_stride + x as usize * channels;
        let src_start = row as usize * src_stride;
        pixels[dst_start..dst_start + src_stride]
            .copy_from_slice(&patch.pixels()[src_start..src_start + src_stride]);
    }
    rebuild(pixels, base.width(), base.height(), base.channels())
}

/// Clamp a float to the u8 range with rounding.
pub(crate) fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_rgb() -> ImageBuffer {
        let pixels: Vec<u8> = (0..4 * 4 * 3).map(|i| (i * 5) as u8).collect();
        ImageBuffer::from_pixels(pixels, 4, 4, 3).unwrap()
    }

    #[test]
    fn test_planes_roundtrip() {
        let buffer = gradient_rgb();
        let split = planes(&buffer);
        assert_eq!(split.len(), 3);
        let restored = from_planes(&split, 4, 4).unwrap();
        assert_eq!(buffer, restored);
    }

    #[test]
    fn test_map_color_bytes_preserves_alpha() {
        let buffer = ImageBuffer::filled(2, 2, 4, 100).unwrap();
        let result = map_color_bytes(&buffer, |v| v.saturating_add(50)).unwrap();
        for chunk in result.pixels().chunks(4) {
            assert_eq!(&chunk[..3], &[150, 150, 150]);
            assert_eq!(chunk[3], 100);
        }
    }

    #[test]
    fn test_blend_weighted_midpoint() {
        let a = ImageBuffer::filled(2, 2, 3, 0).unwrap();
        let b = ImageBuffer::filled(2, 2, 3, 200).unwrap();
        let mid = blend_weighted(&a, &b, 0.5, 0.5, 0.0).unwrap();
        assert!(mid.pixels().iter().all(|&v| v == 100));
    }

    #[test]
    fn test_blend_rejects_shape_mismatch() {
        let a = ImageBuffer::filled(2, 2, 3, 0).unwrap();
        let b = ImageBuffer::filled(3, 2, 3, 0).unwrap();
        assert!(blend_weighted(&a, &b, 0.5, 0.5, 0.0).is_err());
    }

    #[test]
    fn test_saturating_arithmetic() {
        let a = ImageBuffer::filled(2, 2, 1, 200).unwrap();
        let b = ImageBuffer::filled(2, 2, 1, 100).unwrap();
        assert!(saturating_add(&a, &b).unwrap().pixels().iter().all(|&v| v == 255));
        assert!(saturating_sub(&b, &a).unwrap().pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_expand_gray_rgba_sets_opaque_alpha() {
        let gray = GrayImage::from_pixel(2, 2, image::Luma([77]));
        let expanded = expand_gray(&gray, 4).unwrap();
        for chunk in expanded.pixels().chunks(4) {
            assert_eq!(chunk, &[77, 77, 77, 255]);
        }
    }

    #[test]
    fn test_color_mean_excludes_alpha() {
        let mut pixels = Vec::new();
        for _ in 0..4 {
            pixels.extend_from_slice(&[10, 20, 30, 255]);
        }
        let buffer = ImageBuffer::from_pixels(pixels, 2, 2, 4).unwrap();
        assert!((color_mean(&buffer) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crop_and_paste_roundtrip() {
        let buffer = gradient_rgb();
        let region = crop(&buffer, 1, 1, 2, 2).unwrap();
        assert_eq!(region.dimensions(), (2, 2));
        let restored = paste(&buffer, &region, 1, 1).unwrap();
        assert_eq!(buffer, restored);
    }

    #[test]
    fn test_crop_out_of_bounds_rejected() {
        let buffer = gradient_rgb();
        assert!(crop(&buffer, 3, 3, 2, 2).is_err());
    }
}
