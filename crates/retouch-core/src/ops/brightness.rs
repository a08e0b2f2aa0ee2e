//! Brightness, contrast, and gamma adjustments.

use std::str::FromStr;

use crate::buffer::ImageBuffer;
use crate::error::{OpResult, OperationError};
use crate::ops::config::OpConfig;
use crate::ops::support;

/// Brightness strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightnessKind {
    /// Add `value` to every color byte
    Increase,
    /// Subtract `value` from every color byte
    Decrease,
    /// Linear `alpha * x + beta` rescale
    Contrast,
    /// Gamma correction through a lookup table
    Gamma,
    /// Shift the image toward `target_mean`
    Auto,
}

impl BrightnessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrightnessKind::Increase => "increase",
            BrightnessKind::Decrease => "decrease",
            BrightnessKind::Contrast => "contrast",
            BrightnessKind::Gamma => "gamma",
            BrightnessKind::Auto => "auto",
        }
    }
}

impl FromStr for BrightnessKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "increase" => Ok(BrightnessKind::Increase),
            "decrease" => Ok(BrightnessKind::Decrease),
            "contrast" => Ok(BrightnessKind::Contrast),
            "gamma" => Ok(BrightnessKind::Gamma),
            "auto" => Ok(BrightnessKind::Auto),
            other => Err(format!("unknown brightness kind '{other}'")),
        }
    }
}

pub(crate) fn process(
    kind: BrightnessKind,
    buffer: &ImageBuffer,
    config: &OpConfig,
) -> OpResult<ImageBuffer> {
    match kind {
        BrightnessKind::Increase => {
            let value = config.get_i64("value").unwrap_or(50).unsigned_abs() as i32;
            shift(buffer, value)
        }
        BrightnessKind::Decrease => {
            let value = config.get_i64("value").unwrap_or(50).unsigned_abs() as i32;
            shift(buffer, -value)
        }
        BrightnessKind::Contrast => {
            let alpha = config.get_f32("alpha").unwrap_or(1.0);
            let beta = config.get_f32("beta").unwrap_or(0.0);
            support::map_color_bytes(buffer, |v| support::clamp_u8(v as f32 * alpha + beta))
        }
        BrightnessKind::Gamma => {
            let gamma = config.get_f32("gamma").unwrap_or(1.0);
            if gamma <= 0.0 {
                return Err(OperationError::InvalidOption {
                    option: "gamma".into(),
                    message: "gamma must be > 0".into(),
                });
            }
            let inv = 1.0 / gamma;
            let table: Vec<u8> = (0..256u32)
                .map(|i| support::clamp_u8((i as f32 / 255.0).powf(inv) * 255.0))
                .collect();
            support::map_color_bytes(buffer, |v| table[v as usize])
        }
        BrightnessKind::Auto => {
            let target = config.get_i64("target_mean").unwrap_or(128) as f64;
            let diff = (target - support::color_mean(buffer)).round() as i32;
            shift(buffer, diff)
        }
    }
}

/// Add a signed offset to every color byte with clamping.
pub(crate) fn shift(buffer: &ImageBuffer, value: i32) -> OpResult<ImageBuffer> {
    support::map_color_bytes(buffer, |v| (v as i32 + value).clamp(0, 255) as u8)
}
