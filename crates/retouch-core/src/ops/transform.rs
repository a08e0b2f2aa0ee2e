//! Geometric transforms: rotation, mirroring, and centered zoom.

use std::str::FromStr;

use image::imageops::FilterType;

use crate::buffer::ImageBuffer;
use crate::error::{OpResult, OperationError};
use crate::ops::config::OpConfig;
use crate::ops::support;

/// Transform strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Rotate 90 degrees clockwise
    Rotate90Cw,
    /// Rotate 90 degrees counter-clockwise
    Rotate90Ccw,
    /// Rotate 180 degrees
    Rotate180,
    /// Mirror along the vertical axis
    FlipHorizontal,
    /// Mirror along the horizontal axis
    FlipVertical,
    /// Enlarge by `zoom_factor` and crop back to the original frame
    ZoomIn,
    /// Shrink by `zoom_factor` and letterbox into the original frame
    ZoomOut,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Rotate90Cw => "rotate90_cw",
            TransformKind::Rotate90Ccw => "rotate90_ccw",
            TransformKind::Rotate180 => "rotate180",
            TransformKind::FlipHorizontal => "flip_horizontal",
            TransformKind::FlipVertical => "flip_vertical",
            TransformKind::ZoomIn => "zoom_in",
            TransformKind::ZoomOut => "zoom_out",
        }
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rotate90_cw" => Ok(TransformKind::Rotate90Cw),
            "rotate90_ccw" => Ok(TransformKind::Rotate90Ccw),
            "rotate180" => Ok(TransformKind::Rotate180),
            "flip_horizontal" => Ok(TransformKind::FlipHorizontal),
            "flip_vertical" => Ok(TransformKind::FlipVertical),
            "zoom_in" => Ok(TransformKind::ZoomIn),
            "zoom_out" => Ok(TransformKind::ZoomOut),
            other => Err(format!("unknown transform kind '{other}'")),
        }
    }
}

pub(crate) fn process(
    kind: TransformKind,
    buffer: &ImageBuffer,
    config: &OpConfig,
) -> OpResult<ImageBuffer> {
    match kind {
        TransformKind::Rotate90Cw => Ok(ImageBuffer::from_dynamic(&buffer.to_dynamic().rotate90())),
        TransformKind::Rotate90Ccw => {
            Ok(ImageBuffer::from_dynamic(&buffer.to_dynamic().rotate270()))
        }
        TransformKind::Rotate180 => Ok(ImageBuffer::from_dynamic(&buffer.to_dynamic().rotate180())),
        TransformKind::FlipHorizontal => {
            Ok(ImageBuffer::from_dynamic(&buffer.to_dynamic().fliph()))
        }
        TransformKind::FlipVertical => Ok(ImageBuffer::from_dynamic(&buffer.to_dynamic().flipv())),
        TransformKind::ZoomIn => {
            let factor = config.get_f32("zoom_factor").unwrap_or(1.3);
            if factor <= 1.0 {
                return Err(OperationError::InvalidOption {
                    option: "zoom_factor".into(),
                    message: "zoom in requires a factor > 1.0".into(),
                });
            }
            zoom_in(buffer, factor)
        }
        TransformKind::ZoomOut => {
            let factor = config.get_f32("zoom_factor").unwrap_or(0.7);
            if factor <= 0.0 || factor >= 1.0 {
                return Err(OperationError::InvalidOption {
                    option: "zoom_factor".into(),
                    message: "zoom out requires a factor in (0, 1)".into(),
                });
            }
            zoom_out(buffer, factor)
        }
    }
}

/// Scale up, then crop the center back to the source frame.
fn zoom_in(buffer: &ImageBuffer, factor: f32) -> OpResult<ImageBuffer> {
    let (w, h) = buffer.dimensions();
    let new_w = ((w as f32 * factor) as u32).max(w);
    let new_h = ((h as f32 * factor) as u32).max(h);
    let resized = buffer
        .to_dynamic()
        .resize_exact(new_w, new_h, FilterType::Triangle);
    let enlarged = ImageBuffer::from_dynamic(&resized);
    let x = (new_w - w) / 2;
    let y = (new_h - h) / 2;
    support::crop(&enlarged, x, y, w, h)
}

/// Scale down, then center the result on a black canvas of the source frame.
fn zoom_out(buffer: &ImageBuffer, factor: f32) -> OpResult<ImageBuffer> {
    let (w, h) = buffer.dimensions();
    let new_w = ((w as f32 * factor) as u32).max(1);
    let new_h = ((h as f32 * factor) as u32).max(1);
    let resized = buffer
        .to_dynamic()
        .resize_exact(new_w, new_h, FilterType::Triangle);
    let shrunk = ImageBuffer::from_dynamic(&resized);
    let canvas_len = w as usize * h as usize * buffer.channels() as usize;
    let canvas = support::rebuild(vec![0u8; canvas_len], w, h, buffer.channels())?;
    let x = (w - new_w) / 2;
    let y = (h - new_h) / 2;
    support::paste(&canvas, &shrunk, x, y)
}
