//! Sharpening strategies: kernel, laplacian, unsharp mask, highpass.

use std::str::FromStr;

use crate::buffer::ImageBuffer;
use crate::error::{OpResult, OperationError};
use crate::ops::config::OpConfig;
use crate::ops::support;

/// Sharpen strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharpenKind {
    /// 3x3 sharpening kernel scaled by `strength`
    Basic,
    /// Laplacian response added back with weight `strength`
    Laplacian,
    /// Unsharp masking: subtract a gaussian blur, re-add the residual
    UnsharpMask,
    /// Add the highpass residual of a gaussian lowpass
    Highpass,
}

impl SharpenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharpenKind::Basic => "basic",
            SharpenKind::Laplacian => "laplacian",
            SharpenKind::UnsharpMask => "unsharp_mask",
            SharpenKind::Highpass => "highpass",
        }
    }
}

impl FromStr for SharpenKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "basic" => Ok(SharpenKind::Basic),
            "laplacian" => Ok(SharpenKind::Laplacian),
            "unsharp_mask" => Ok(SharpenKind::UnsharpMask),
            "highpass" => Ok(SharpenKind::Highpass),
            other => Err(format!("unknown sharpen kind '{other}'")),
        }
    }
}

pub(crate) fn process(
    kind: SharpenKind,
    buffer: &ImageBuffer,
    config: &OpConfig,
) -> OpResult<ImageBuffer> {
    match kind {
        SharpenKind::Basic => {
            let strength = config.get_f32("strength").unwrap_or(1.0);
            let s = strength.max(0.0);
            let center = 1.0 + 4.0 * s;
            let kernel = [0.0, -s, 0.0, -s, center, -s, 0.0, -s, 0.0];
            let sharpened = buffer.to_dynamic().filter3x3(&kernel);
            Ok(ImageBuffer::from_dynamic(&sharpened))
        }
        SharpenKind::Laplacian => {
            let strength = config.get_f32("strength").unwrap_or(1.0);
            let kernel = [
                0.0, 1.0, 0.0, //
                1.0, -4.0, 1.0, //
                0.0, 1.0, 0.0,
            ];
            let response = ImageBuffer::from_dynamic(&buffer.to_dynamic().filter3x3(&kernel));
            support::blend_weighted(buffer, &response, 1.0, strength, 0.0)
        }
        SharpenKind::UnsharpMask => {
            let sigma = config.get_f32("sigma").unwrap_or(1.0);
            let amount = config.get_f32("amount").unwrap_or(1.0);
            let threshold = config.get_u32("threshold").unwrap_or(0);
            if sigma <= 0.0 {
                return Err(OperationError::InvalidOption {
                    option: "sigma".into(),
                    message: "sigma must be > 0".into(),
                });
            }
            let blurred = ImageBuffer::from_dynamic(&buffer.to_dynamic().blur(sigma));
            let mut mask = support::saturating_sub(buffer, &blurred)?;
            if threshold > 0 {
                let cutoff = threshold.min(255) as u8;
                mask = support::map_color_bytes(&mask, |v| if v < cutoff { 0 } else { v })?;
            }
            support::blend_weighted(buffer, &mask, 1.0, amount, 0.0)
        }
        SharpenKind::Highpass => {
            let (k, _) = config.get_pair("kernel_size").unwrap_or((3, 3));
            if k == 0 {
                return Err(OperationError::InvalidOption {
                    option: "kernel_size".into(),
                    message: "kernel dimensions must be > 0".into(),
                });
            }
            // Sigma derived from the kernel size the way OpenCV does for
            // an unspecified sigma
            let sigma = 0.3 * ((k as f32 - 1.0) * 0.5 - 1.0) + 0.8;
            let lowpass = ImageBuffer::from_dynamic(&buffer.to_dynamic().blur(sigma.max(0.1)));
            let highpass = support::saturating_sub(buffer, &lowpass)?;
            support::saturating_add(buffer, &highpass)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soft_edge() -> ImageBuffer {
        // A gentle horizontal ramp: sharpening should steepen it
        let pixels: Vec<u8> = (0..8 * 8)
            .flat_map(|i| {
                let x = i % 8;
                let value = (x as u32 * 255 / 7) as u8;
                [value, value, value]
            })
            .collect();
        ImageBuffer::from_pixels(pixels, 8, 8, 3).unwrap()
    }

    #[test]
    fn test_basic_zero_strength_is_identity() {
        let buffer = soft_edge();
        let config = OpConfig::new().with("strength", 0.0);
        let result = process(SharpenKind::Basic, &buffer, &config).unwrap();
        assert_eq!(result, buffer);
    }

    #[test]
    fn test_basic_preserves_shape() {
        let buffer = soft_edge();
        let result = process(SharpenKind::Basic, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(result.dimensions(), buffer.dimensions());
        assert_eq!(result.channels(), buffer.channels());
    }

    #[test]
    fn test_basic_flat_region_unchanged() {
        let buffer = ImageBuffer::filled(6, 6, 3, 90).unwrap();
        let result = process(SharpenKind::Basic, &buffer, &OpConfig::new()).unwrap();
        // Kernel sums to one, so constant regions stay constant
        let center = result.pixels()[(3 * 6 + 3) * 3];
        assert_eq!(center, 90);
    }

    #[test]
    fn test_unsharp_mask_leaves_flat_regions_nearly_untouched() {
        let flat = ImageBuffer::filled(6, 6, 3, 90).unwrap();
        let result = process(SharpenKind::UnsharpMask, &flat, &OpConfig::new()).unwrap();
        for (&out, &src) in result.pixels().iter().zip(flat.pixels()) {
            assert!((out as i16 - src as i16).abs() <= 2, "{out} vs {src}");
        }
    }

    #[test]
    fn test_unsharp_mask_steepens_edges() {
        let edgy = soft_edge();
        let result = process(SharpenKind::UnsharpMask, &edgy, &OpConfig::new()).unwrap();
        assert_ne!(result, edgy);
        assert_eq!(result.dimensions(), edgy.dimensions());
    }

    #[test]
    fn test_unsharp_rejects_zero_sigma() {
        let buffer = soft_edge();
        let config = OpConfig::new().with("sigma", 0.0);
        assert!(process(SharpenKind::UnsharpMask, &buffer, &config).is_err());
    }

    #[test]
    fn test_highpass_preserves_shape() {
        let buffer = soft_edge();
        let result = process(SharpenKind::Highpass, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(result.dimensions(), buffer.dimensions());
    }

    #[test]
    fn test_laplacian_deterministic() {
        let buffer = soft_edge();
        let a = process(SharpenKind::Laplacian, &buffer, &OpConfig::new()).unwrap();
        let b = process(SharpenKind::Laplacian, &buffer, &OpConfig::new()).unwrap();
        assert_eq!(a, b);
    }
}
