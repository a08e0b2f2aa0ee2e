//! Edge detection over the luminance channel.
//!
//! Gradient operators (Roberts, Prewitt, Sobel, Scharr) convolve a kernel
//! pair and combine the responses into a magnitude image. The result is
//! expanded back to the channel layout of the source buffer.

use std::str::FromStr;

use image::GrayImage;

use crate::buffer::ImageBuffer;
use crate::error::OpResult;
use crate::ops::config::OpConfig;
use crate::ops::support;

/// Edge detection strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Roberts cross (2x2 diagonal differences)
    Roberts,
    /// Prewitt operator
    Prewitt,
    /// Sobel operator
    Sobel,
    /// Scharr operator (rotationally more accurate than Sobel)
    Scharr,
    /// Laplacian second-derivative response
    Laplacian,
    /// Canny detector with thresholds derived from the luma median
    Canny,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Roberts => "roberts",
            EdgeKind::Prewitt => "prewitt",
            EdgeKind::Sobel => "sobel",
            EdgeKind::Scharr => "scharr",
            EdgeKind::Laplacian => "laplacian",
            EdgeKind::Canny => "canny",
        }
    }
}

impl FromStr for EdgeKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "roberts" => Ok(EdgeKind::Roberts),
            "prewitt" => Ok(EdgeKind::Prewitt),
            "sobel" => Ok(EdgeKind::Sobel),
            "scharr" => Ok(EdgeKind::Scharr),
            "laplacian" => Ok(EdgeKind::Laplacian),
            "canny" => Ok(EdgeKind::Canny),
            other => Err(format!("unknown edge kind '{other}'")),
        }
    }
}

const ROBERTS_X: ([f32; 4], u32) = ([1.0, 0.0, 0.0, -1.0], 2);
const ROBERTS_Y: ([f32; 4], u32) = ([0.0, 1.0, -1.0, 0.0], 2);

const PREWITT_X: [f32; 9] = [-1.0, 0.0, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0];
const PREWITT_Y: [f32; 9] = [-1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

const SCHARR_X: [f32; 9] = [-3.0, 0.0, 3.0, -10.0, 0.0, 10.0, -3.0, 0.0, 3.0];
const SCHARR_Y: [f32; 9] = [-3.0, -10.0, -3.0, 0.0, 0.0, 0.0, 3.0, 10.0, 3.0];

const LAPLACIAN: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

pub(crate) fn process(
    kind: EdgeKind,
    buffer: &ImageBuffer,
    config: &OpConfig,
) -> OpResult<ImageBuffer> {
    let luma = support::to_luma(buffer);
    let edges = match kind {
        EdgeKind::Roberts => gradient_magnitude(&luma, &ROBERTS_X.0, &ROBERTS_Y.0, ROBERTS_X.1),
        EdgeKind::Prewitt => gradient_magnitude(&luma, &PREWITT_X, &PREWITT_Y, 3),
        EdgeKind::Sobel => gradient_magnitude(&luma, &SOBEL_X, &SOBEL_Y, 3),
        EdgeKind::Scharr => gradient_magnitude(&luma, &SCHARR_X, &SCHARR_Y, 3),
        EdgeKind::Laplacian => {
            let response = convolve(&luma, &LAPLACIAN, 3);
            let (w, h) = luma.dimensions();
            GrayImage::from_fn(w, h, |x, y| {
                let idx = y as usize * w as usize + x as usize;
                image::Luma([support::clamp_u8(response[idx].abs())])
            })
        }
        EdgeKind::Canny => {
            let sigma = config.get_f32("sigma").unwrap_or(0.33);
            let median = luma_median(&luma) as f32;
            let low = ((1.0 - sigma) * median).max(0.0);
            let high = ((1.0 + sigma) * median).min(255.0).max(low + 1.0);
            imageproc::edges::canny(&luma, low, high)
        }
    };
    support::expand_gray(&edges, buffer.channels())
}

/// Convolve a square kernel over the gray image with clamped borders,
/// returning the raw float responses.
fn convolve(image: &GrayImage, kernel: &[f32], size: u32) -> Vec<f32> {
    let (w, h) = image.dimensions();
    let half = (size / 2) as i64;
    let mut out = vec![0.0f32; w as usize * h as usize];
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut acc = 0.0f32;
            for ky in 0..size as i64 {
                for kx in 0..size as i64 {
                    let sx = (x + kx - half).clamp(0, w as i64 - 1) as u32;
                    let sy = (y + ky - half).clamp(0, h as i64 - 1) as u32;
                    let weight = kernel[(ky * size as i64 + kx) as usize];
                    acc += image.get_pixel(sx, sy).0[0] as f32 * weight;
                }
            }
            out[(y * w as i64 + x) as usize] = acc;
        }
    }
    out
}

/// Combined magnitude of a horizontal/vertical kernel pair.
fn gradient_magnitude(image: &GrayImage, kx: &[f32], ky: &[f32], size: u32) -> GrayImage {
    let gx = convolve(image, kx, size);
    let gy = convolve(image, ky, size);
    let (w, h) = image.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let idx = y as usize * w as usize + x as usize;
        let magnitude = (gx[idx] * gx[idx] + gy[idx] * gy[idx]).sqrt();
        image::Luma([support::clamp_u8(magnitude)])
    })
}

/// Median luma value, used for Canny auto-thresholds.
fn luma_median(image: &GrayImage) -> u8 {
    let mut histogram = [0usize; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }
    let total = image.width() as usize * image.height() as usize;
    let mut seen = 0usize;
    for (value, &count) in histogram.iter().enumerate() {
        seen += count;
        if seen * 2 >= total {
            return value as u8;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_edge() -> ImageBuffer {
        let pixels: Vec<u8> = (0..10 * 10)
            .flat_map(|i| {
                let value = if i % 10 < 5 { 0u8 } else { 255u8 };
                [value, value, value]
            })
            .collect();
        ImageBuffer::from_pixels(pixels, 10, 10, 3).unwrap()
    }

    #[test]
    fn test_sobel_highlights_the_edge() {
        let buffer = vertical_edge();
        let result = process(EdgeKind::Sobel, &buffer, &OpConfig::new()).unwrap();
        // Strong response at the boundary, none in the flat interior
        let at_edge = result.pixels()[(5 * 10 + 4) * 3];
        let in_flat = result.pixels()[(5 * 10 + 1) * 3];
        assert!(at_edge > 200, "edge response too weak: {at_edge}");
        assert_eq!(in_flat, 0);
    }

    #[test]
    fn test_all_gradient_kinds_preserve_shape() {
        let buffer = vertical_edge();
        for kind in [
            EdgeKind::Roberts,
            EdgeKind::Prewitt,
            EdgeKind::Sobel,
            EdgeKind::Scharr,
            EdgeKind::Laplacian,
        ] {
            let result = process(kind, &buffer, &OpConfig::new()).unwrap();
            assert_eq!(result.dimensions(), buffer.dimensions());
            assert_eq!(result.channels(), 3);
        }
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let buffer = ImageBuffer::filled(8, 8, 3, 130).unwrap();
        let result = process(EdgeKind::Prewitt, &buffer, &OpConfig::new()).unwrap();
        assert!(result.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_canny_marks_boundary() {
        let buffer = vertical_edge();
        let result = process(EdgeKind::Canny, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(result.dimensions(), buffer.dimensions());
        // Canny output is binary: some white edge pixels must exist
        assert!(result.pixels().iter().any(|&v| v == 255));
    }

    #[test]
    fn test_gray_input_stays_gray() {
        let pixels: Vec<u8> = (0..8 * 8)
            .map(|i| if i % 8 < 4 { 0u8 } else { 255u8 })
            .collect();
        let buffer = ImageBuffer::from_pixels(pixels, 8, 8, 1).unwrap();
        let result = process(EdgeKind::Sobel, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(result.channels(), 1);
    }

    #[test]
    fn test_luma_median() {
        let image = GrayImage::from_fn(4, 1, |x, _| image::Luma([(x * 10) as u8]));
        // Values 0, 10, 20, 30 -> median lands on 10
        assert_eq!(luma_median(&image), 10);
    }
}
