//! Histogram-based tonal corrections.

use std::str::FromStr;

use crate::buffer::ImageBuffer;
use crate::error::OpResult;
use crate::ops::config::OpConfig;
use crate::ops::support;

/// Histogram strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramKind {
    /// Classic histogram equalization, channel by channel
    Equalize,
    /// Linear stretch of each channel to the full [0, 255] range
    Stretch,
}

impl HistogramKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistogramKind::Equalize => "equalize",
            HistogramKind::Stretch => "stretch",
        }
    }
}

impl FromStr for HistogramKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "equalize" => Ok(HistogramKind::Equalize),
            "stretch" => Ok(HistogramKind::Stretch),
            other => Err(format!("unknown histogram kind '{other}'")),
        }
    }
}

pub(crate) fn process(
    kind: HistogramKind,
    buffer: &ImageBuffer,
    _config: &OpConfig,
) -> OpResult<ImageBuffer> {
    match kind {
        HistogramKind::Equalize => support::filter_color_planes(buffer, |plane| {
            imageproc::contrast::equalize_histogram(plane)
        }),
        HistogramKind::Stretch => support::filter_color_planes(buffer, stretch_plane),
    }
}

/// Map the observed [min, max] of a plane linearly onto [0, 255].
/// A constant plane is left untouched.
fn stretch_plane(plane: &image::GrayImage) -> image::GrayImage {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for pixel in plane.pixels() {
        min = min.min(pixel.0[0]);
        max = max.max(pixel.0[0]);
    }
    if min >= max {
        return plane.clone();
    }
    let range = (max - min) as f32;
    let (w, h) = plane.dimensions();
    image::GrayImage::from_fn(w, h, |x, y| {
        let value = plane.get_pixel(x, y).0[0];
        image::Luma([support::clamp_u8((value - min) as f32 * 255.0 / range)])
    })
}
