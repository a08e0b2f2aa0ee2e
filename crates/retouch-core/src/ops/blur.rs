//! Smoothing filters: box, gaussian, median, and bilateral.

use std::str::FromStr;

use crate::buffer::ImageBuffer;
use crate::error::{OpResult, OperationError};
use crate::ops::config::OpConfig;
use crate::ops::support;

/// Blur strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurKind {
    /// Box filter over a `kernel_size` window
    Average,
    /// Gaussian smoothing driven by `sigma`
    Gaussian,
    /// Median filter over a `kernel_size` window, good for salt-and-pepper noise
    Median,
    /// Edge-preserving filter driven by `d`, `sigma_color`, `sigma_space`
    Bilateral,
}

impl BlurKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlurKind::Average => "average",
            BlurKind::Gaussian => "gaussian",
            BlurKind::Median => "median",
            BlurKind::Bilateral => "bilateral",
        }
    }
}

impl FromStr for BlurKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "average" => Ok(BlurKind::Average),
            "gaussian" => Ok(BlurKind::Gaussian),
            "median" => Ok(BlurKind::Median),
            "bilateral" => Ok(BlurKind::Bilateral),
            other => Err(format!("unknown blur kind '{other}'")),
        }
    }
}

pub(crate) fn process(
    kind: BlurKind,
    buffer: &ImageBuffer,
    config: &OpConfig,
) -> OpResult<ImageBuffer> {
    match kind {
        BlurKind::Average => {
            let (kw, kh) = config.get_pair("kernel_size").unwrap_or((5, 5));
            if kw == 0 || kh == 0 {
                return Err(OperationError::InvalidOption {
                    option: "kernel_size".into(),
                    message: "kernel dimensions must be > 0".into(),
                });
            }
            support::filter_planes(buffer, |plane| {
                imageproc::filter::box_filter(plane, kw / 2, kh / 2)
            })
        }
        BlurKind::Gaussian => {
            let sigma = config.get_f32("sigma").unwrap_or(1.0);
            // imageproc panics on non-positive sigma; treat it as "no blur"
            if sigma <= 0.0 {
                return Ok(buffer.clone());
            }
            support::filter_planes(buffer, |plane| {
                imageproc::filter::gaussian_blur_f32(plane, sigma)
            })
        }
        BlurKind::Median => {
            let (kw, kh) = config.get_pair("kernel_size").unwrap_or((5, 5));
            if kw == 0 || kh == 0 {
                return Err(OperationError::InvalidOption {
                    option: "kernel_size".into(),
                    message: "kernel dimensions must be > 0".into(),
                });
            }
            support::filter_planes(buffer, |plane| {
                imageproc::filter::median_filter(plane, kw / 2, kh / 2)
            })
        }
        BlurKind::Bilateral => {
            let d = config.get_u32("d").unwrap_or(9).max(1);
            let sigma_color = config.get_f32("sigma_color").unwrap_or(75.0);
            let sigma_space = config.get_f32("sigma_space").unwrap_or(75.0);
            if sigma_color <= 0.0 || sigma_space <= 0.0 {
                return Err(OperationError::InvalidOption {
                    option: "sigma_color/sigma_space".into(),
                    message: "sigmas must be > 0".into(),
                });
            }
            bilateral(buffer, d / 2, sigma_color, sigma_space)
        }
    }
}

/// Edge-preserving smoothing: each output pixel is a weighted average of
/// its window, weighted by spatial proximity and color similarity. Pixels
/// across a strong edge get near-zero weight, so edges survive.
pub(crate) fn bilateral(
    buffer: &ImageBuffer,
    radius: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> OpResult<ImageBuffer> {
    let (w, h) = buffer.dimensions();
    let channels = buffer.channels() as usize;
    let color = support::color_channels(buffer);
    let src = buffer.pixels();
    let radius = radius.max(1);
    let color_norm = 2.0 * sigma_color * sigma_color;
    let space_norm = 2.0 * sigma_space * sigma_space;

    let mut out = src.to_vec();
    let mut sums = vec![0.0f32; color];
    for y in 0..h {
        for x in 0..w {
            let center_base = (y as usize * w as usize + x as usize) * channels;
            for s in sums.iter_mut() {
                *s = 0.0;
            }
            let mut weight_sum = 0.0f32;

            let y_start = y.saturating_sub(radius);
            let y_end = (y + radius + 1).min(h);
            let x_start = x.saturating_sub(radius);
            let x_end = (x + radius + 1).min(w);
            for ny in y_start..y_end {
                for nx in x_start..x_end {
                    let base = (ny as usize * w as usize + nx as usize) * channels;
                    let mut color_dist_sq = 0.0f32;
                    for c in 0..color {
                        let diff = src[base + c] as f32 - src[center_base + c] as f32;
                        color_dist_sq += diff * diff;
                    }
                    let dx = nx as f32 - x as f32;
                    let dy = ny as f32 - y as f32;
                    let spatial_dist_sq = dx * dx + dy * dy;
                    let weight =
                        (-color_dist_sq / color_norm - spatial_dist_sq / space_norm).exp();
                    for (c, s) in sums.iter_mut().enumerate() {
                        *s += src[base + c] as f32 * weight;
                    }
                    weight_sum += weight;
                }
            }

            if weight_sum > 0.0 {
                for (c, s) in sums.iter().enumerate() {
                    out[center_base + c] = support::clamp_u8(s / weight_sum);
                }
            }
        }
    }
    support::rebuild(out, w, h, buffer.channels())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_and_half() -> ImageBuffer {
        // Left half dark, right half bright
        let pixels: Vec<u8> = (0..8 * 8)
            .flat_map(|i| {
                let value = if i % 8 < 4 { 10u8 } else { 240u8 };
                [value, value, value]
            })
            .collect();
        ImageBuffer::from_pixels(pixels, 8, 8, 3).unwrap()
    }

    #[test]
    fn test_average_blur_softens_boundary() {
        let buffer = half_and_half();
        let blurred = process(BlurKind::Average, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(blurred.dimensions(), buffer.dimensions());
        // The boundary column must now hold intermediate values
        let mid = blurred.pixels()[(4 * 8 + 3) * 3];
        assert!(mid > 10 && mid < 240, "boundary not smoothed: {mid}");
    }

    #[test]
    fn test_gaussian_zero_sigma_is_identity() {
        let buffer = half_and_half();
        let config = OpConfig::new().with("sigma", 0.0);
        let result = process(BlurKind::Gaussian, &buffer, &config).unwrap();
        assert_eq!(result, buffer);
    }

    #[test]
    fn test_gaussian_blur_changes_pixels() {
        let buffer = half_and_half();
        let config = OpConfig::new().with("sigma", 2.0);
        let result = process(BlurKind::Gaussian, &buffer, &config).unwrap();
        assert_ne!(result, buffer);
        assert_eq!(result.dimensions(), buffer.dimensions());
    }

    #[test]
    fn test_median_on_uniform_image_is_identity() {
        let buffer = ImageBuffer::filled(6, 6, 3, 80).unwrap();
        let result = process(BlurKind::Median, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(result, buffer);
    }

    #[test]
    fn test_zero_kernel_rejected() {
        let buffer = half_and_half();
        let config = OpConfig::new().with("kernel_size", 0);
        assert!(process(BlurKind::Average, &buffer, &config).is_err());
    }

    #[test]
    fn test_bilateral_preserves_uniform_image() {
        let buffer = ImageBuffer::filled(6, 6, 3, 120).unwrap();
        let result = process(BlurKind::Bilateral, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(result, buffer);
    }

    #[test]
    fn test_bilateral_keeps_hard_edge() {
        let buffer = half_and_half();
        let config = OpConfig::new()
            .with("d", 5)
            .with("sigma_color", 20.0)
            .with("sigma_space", 20.0);
        let result = process(BlurKind::Bilateral, &buffer, &config).unwrap();
        // With a tight color sigma the two sides stay well separated
        let left = result.pixels()[(4 * 8 + 1) * 3];
        let right = result.pixels()[(4 * 8 + 6) * 3];
        assert!(left < 60, "left side drifted: {left}");
        assert!(right > 190, "right side drifted: {right}");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("gaussian".parse::<BlurKind>().unwrap(), BlurKind::Gaussian);
        assert!("gauss".parse::<BlurKind>().is_err());
    }
}
