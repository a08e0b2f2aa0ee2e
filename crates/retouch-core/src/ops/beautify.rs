//! Face beautification over detector-supplied regions.
//!
//! The detector itself (a cascade classifier in the full application) is an
//! external collaborator behind the [`FaceDetector`] trait. Callers
//! construct a detector once at the application root and inject it into the
//! operation; nothing here caches or owns global detector state.

use std::str::FromStr;

use crate::buffer::ImageBuffer;
use crate::error::OpResult;
use crate::ops::blur;
use crate::ops::brightness;
use crate::ops::config::OpConfig;
use crate::ops::support;

/// An axis-aligned face rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Locates faces in a buffer.
///
/// Implementations must be pure queries: same buffer in, same regions out,
/// no retained mutable state.
pub trait FaceDetector: Send + Sync {
    fn detect_faces(&self, buffer: &ImageBuffer) -> Vec<FaceRegion>;
}

/// A detector that never finds a face. Region-based beautify strategies
/// report "no change" through it; useful as a placeholder wiring and in
/// headless contexts without a classifier.
#[derive(Debug, Default)]
pub struct NullDetector;

impl FaceDetector for NullDetector {
    fn detect_faces(&self, _buffer: &ImageBuffer) -> Vec<FaceRegion> {
        Vec::new()
    }
}

/// Beautify strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeautifyKind {
    /// Edge-preserving smoothing blended into each face region
    SmoothSkin,
    /// Brightness lift on each face region
    BrightenFace,
    /// Contrast boost on each face region
    EnhanceContrast,
    /// Whole-image soft-focus blend; needs no detector
    SoftFilter,
}

impl BeautifyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeautifyKind::SmoothSkin => "smooth_skin",
            BeautifyKind::BrightenFace => "brighten_face",
            BeautifyKind::EnhanceContrast => "enhance_contrast",
            BeautifyKind::SoftFilter => "soft_filter",
        }
    }
}

impl FromStr for BeautifyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "smooth_skin" => Ok(BeautifyKind::SmoothSkin),
            "brighten_face" => Ok(BeautifyKind::BrightenFace),
            "enhance_contrast" => Ok(BeautifyKind::EnhanceContrast),
            "soft_filter" => Ok(BeautifyKind::SoftFilter),
            other => Err(format!("unknown beautify kind '{other}'")),
        }
    }
}

pub(crate) fn process(
    kind: BeautifyKind,
    detector: &dyn FaceDetector,
    buffer: &ImageBuffer,
    config: &OpConfig,
) -> OpResult<Option<ImageBuffer>> {
    if kind == BeautifyKind::SoftFilter {
        let intensity = config.get_f32("intensity").unwrap_or(0.3).clamp(0.0, 1.0);
        let blurred = ImageBuffer::from_dynamic(&buffer.to_dynamic().blur(3.0));
        let result = support::blend_weighted(buffer, &blurred, 1.0 - intensity, intensity, 0.0)?;
        return Ok(Some(result));
    }

    let faces: Vec<FaceRegion> = detector
        .detect_faces(buffer)
        .into_iter()
        .filter_map(|face| clamp_region(face, buffer))
        .collect();
    if faces.is_empty() {
        // Nothing to beautify; report "no change produced"
        return Ok(None);
    }

    let mut result = buffer.clone();
    for face in faces {
        let region = support::crop(&result, face.x, face.y, face.width, face.height)?;
        let treated = match kind {
            BeautifyKind::SmoothSkin => {
                let level = config.get_f32("smooth_level").unwrap_or(0.3).clamp(0.0, 1.0);
                let d = (9.0 + level * 20.0) as u32;
                let sigma = 50.0 + level * 100.0;
                let smoothed = blur::bilateral(&region, d / 2, sigma, sigma)?;
                let alpha = 0.3 + level * 0.7;
                support::blend_weighted(&region, &smoothed, 1.0 - alpha, alpha, 0.0)?
            }
            BeautifyKind::BrightenFace => {
                let value = config.get_i64("brightness_value").unwrap_or(30) as i32;
                brightness::shift(&region, value)?
            }
            BeautifyKind::EnhanceContrast => {
                let contrast = config.get_f32("contrast").unwrap_or(1.3);
                support::map_color_bytes(&region, |v| support::clamp_u8(v as f32 * contrast))?
            }
            // Handled before the detector query; kept for exhaustiveness
            BeautifyKind::SoftFilter => region,
        };
        result = support::paste(&result, &treated, face.x, face.y)?;
    }
    Ok(Some(result))
}

/// Clip a detected region to the buffer bounds; degenerate regions vanish.
fn clamp_region(face: FaceRegion, buffer: &ImageBuffer) -> Option<FaceRegion> {
    let (w, h) = buffer.dimensions();
    if face.x >= w || face.y >= h {
        return None;
    }
    let width = face.width.min(w - face.x);
    let height = face.height.min(h - face.y);
    if width == 0 || height == 0 {
        return None;
    }
    Some(FaceRegion {
        x: face.x,
        y: face.y,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test detector reporting a fixed region list.
    struct FixedDetector(Vec<FaceRegion>);

    impl FaceDetector for FixedDetector {
        fn detect_faces(&self, _buffer: &ImageBuffer) -> Vec<FaceRegion> {
            self.0.clone()
        }
    }

    fn portrait() -> ImageBuffer {
        ImageBuffer::filled(16, 16, 3, 100).unwrap()
    }

    #[test]
    fn test_no_faces_reports_no_change() {
        let result = process(
            BeautifyKind::BrightenFace,
            &NullDetector,
            &portrait(),
            &OpConfig::new(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_brighten_face_touches_region_only() {
        let detector = FixedDetector(vec![FaceRegion {
            x: 4,
            y: 4,
            width: 8,
            height: 8,
        }]);
        let result = process(
            BeautifyKind::BrightenFace,
            &detector,
            &portrait(),
            &OpConfig::new().with("brightness_value", 40),
        )
        .unwrap()
        .unwrap();

        let inside = (8 * 16 + 8) * 3;
        let outside = 0;
        assert_eq!(result.pixels()[inside], 140);
        assert_eq!(result.pixels()[outside], 100);
    }

    #[test]
    fn test_enhance_contrast_scales_region() {
        let detector = FixedDetector(vec![FaceRegion {
            x: 0,
            y: 0,
            width: 16,
            height: 16,
        }]);
        let result = process(
            BeautifyKind::EnhanceContrast,
            &detector,
            &portrait(),
            &OpConfig::new().with("contrast", 1.5),
        )
        .unwrap()
        .unwrap();
        assert!(result.pixels().iter().all(|&v| v == 150));
    }

    #[test]
    fn test_smooth_skin_preserves_shape() {
        let detector = FixedDetector(vec![FaceRegion {
            x: 2,
            y: 2,
            width: 10,
            height: 10,
        }]);
        let result = process(
            BeautifyKind::SmoothSkin,
            &detector,
            &portrait(),
            &OpConfig::new().with("smooth_level", 0.8),
        )
        .unwrap()
        .unwrap();
        assert_eq!(result.dimensions(), (16, 16));
    }

    #[test]
    fn test_region_clamped_to_bounds() {
        let detector = FixedDetector(vec![FaceRegion {
            x: 12,
            y: 12,
            width: 10,
            height: 10,
        }]);
        let result = process(
            BeautifyKind::BrightenFace,
            &detector,
            &portrait(),
            &OpConfig::new(),
        )
        .unwrap()
        .unwrap();
        let corner = (15 * 16 + 15) * 3;
        assert_eq!(result.pixels()[corner], 130);
    }

    #[test]
    fn test_off_image_region_means_no_change() {
        let detector = FixedDetector(vec![FaceRegion {
            x: 50,
            y: 50,
            width: 4,
            height: 4,
        }]);
        let result = process(
            BeautifyKind::BrightenFace,
            &detector,
            &portrait(),
            &OpConfig::new(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_soft_filter_needs_no_faces() {
        let result = process(
            BeautifyKind::SoftFilter,
            &NullDetector,
            &portrait(),
            &OpConfig::new().with("intensity", 1.0),
        )
        .unwrap();
        assert!(result.is_some());
    }
}
