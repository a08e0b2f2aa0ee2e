//! Morphological operators over a rectangular structuring element.
//!
//! Grayscale morphology: erosion takes the window minimum, dilation the
//! window maximum; the compound operators are built from those two.

use std::str::FromStr;

use crate::buffer::ImageBuffer;
use crate::error::{OpResult, OperationError};
use crate::ops::config::OpConfig;
use crate::ops::support;

/// Morphology strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphologyKind {
    /// Window minimum: thins bright regions, removes speckle
    Erode,
    /// Window maximum: thickens bright regions, fills pinholes
    Dilate,
    /// Erosion then dilation: removes small bright noise
    Open,
    /// Dilation then erosion: closes small dark gaps
    Close,
    /// Dilation minus erosion: outlines region boundaries
    Gradient,
    /// Source minus opening: isolates small bright details
    TopHat,
    /// Closing minus source: isolates small dark details
    BlackHat,
}

impl MorphologyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MorphologyKind::Erode => "erode",
            MorphologyKind::Dilate => "dilate",
            MorphologyKind::Open => "open",
            MorphologyKind::Close => "close",
            MorphologyKind::Gradient => "gradient",
            MorphologyKind::TopHat => "top_hat",
            MorphologyKind::BlackHat => "black_hat",
        }
    }
}

impl FromStr for MorphologyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "erode" => Ok(MorphologyKind::Erode),
            "dilate" => Ok(MorphologyKind::Dilate),
            "open" => Ok(MorphologyKind::Open),
            "close" => Ok(MorphologyKind::Close),
            "gradient" => Ok(MorphologyKind::Gradient),
            "top_hat" => Ok(MorphologyKind::TopHat),
            "black_hat" => Ok(MorphologyKind::BlackHat),
            other => Err(format!("unknown morphology kind '{other}'")),
        }
    }
}

pub(crate) fn process(
    kind: MorphologyKind,
    buffer: &ImageBuffer,
    config: &OpConfig,
) -> OpResult<ImageBuffer> {
    let (kw, kh) = config.get_pair("kernel_size").unwrap_or((3, 3));
    if kw == 0 || kh == 0 {
        return Err(OperationError::InvalidOption {
            option: "kernel_size".into(),
            message: "kernel dimensions must be > 0".into(),
        });
    }
    let iterations = config.get_u32("iterations").unwrap_or(1).max(1);
    let rx = kw / 2;
    let ry = kh / 2;

    match kind {
        MorphologyKind::Erode => repeat(buffer, iterations, |b| window_min(b, rx, ry)),
        MorphologyKind::Dilate => repeat(buffer, iterations, |b| window_max(b, rx, ry)),
        MorphologyKind::Open => {
            let eroded = window_min(buffer, rx, ry)?;
            window_max(&eroded, rx, ry)
        }
        MorphologyKind::Close => {
            let dilated = window_max(buffer, rx, ry)?;
            window_min(&dilated, rx, ry)
        }
        MorphologyKind::Gradient => {
            let dilated = window_max(buffer, rx, ry)?;
            let eroded = window_min(buffer, rx, ry)?;
            support::saturating_sub(&dilated, &eroded)
        }
        MorphologyKind::TopHat => {
            let eroded = window_min(buffer, rx, ry)?;
            let opened = window_max(&eroded, rx, ry)?;
            support::saturating_sub(buffer, &opened)
        }
        MorphologyKind::BlackHat => {
            let dilated = window_max(buffer, rx, ry)?;
            let closed = window_min(&dilated, rx, ry)?;
            support::saturating_sub(&closed, buffer)
        }
    }
}

fn repeat<F>(buffer: &ImageBuffer, iterations: u32, f: F) -> OpResult<ImageBuffer>
where
    F: Fn(&ImageBuffer) -> OpResult<ImageBuffer>,
{
    let mut result = f(buffer)?;
    for _ in 1..iterations {
        result = f(&result)?;
    }
    Ok(result)
}

fn window_min(buffer: &ImageBuffer, rx: u32, ry: u32) -> OpResult<ImageBuffer> {
    window_extremum(buffer, rx, ry, u8::min)
}

fn window_max(buffer: &ImageBuffer, rx: u32, ry: u32) -> OpResult<ImageBuffer> {
    window_extremum(buffer, rx, ry, u8::max)
}

/// Rectangular min/max filter over the color channels; alpha untouched.
fn window_extremum<F>(buffer: &ImageBuffer, rx: u32, ry: u32, pick: F) -> OpResult<ImageBuffer>
where
    F: Fn(u8, u8) -> u8,
{
    let (w, h) = buffer.dimensions();
    let channels = buffer.channels() as usize;
    let color = support::color_channels(buffer);
    let src = buffer.pixels();
    let mut out = src.to_vec();

    for y in 0..h {
        for x in 0..w {
            let y_start = y.saturating_sub(ry);
            let y_end = (y + ry + 1).min(h);
            let x_start = x.saturating_sub(rx);
            let x_end = (x + rx + 1).min(w);
            let center = (y as usize * w as usize + x as usize) * channels;
            for c in 0..color {
                let mut extremum = src[center + c];
                for ny in y_start..y_end {
                    for nx in x_start..x_end {
                        let idx = (ny as usize * w as usize + nx as usize) * channels + c;
                        extremum = pick(extremum, src[idx]);
                    }
                }
                out[center + c] = extremum;
            }
        }
    }
    support::rebuild(out, w, h, buffer.channels())
}
