//! The operation catalog: named, configurable, pure transforms.
//!
//! Operations form a closed set of eight families, each selecting a
//! concrete strategy through a kind enum. Every strategy is a pure function
//! of `(buffer, config)` — no hidden mutable state, deterministic for a
//! given input. Adding a family means adding a variant here and a module
//! beside the others; dispatch lives in exactly one place.

mod blur;
mod brightness;
mod config;
mod edges;
mod histogram;
mod morphology;
mod sharpen;
mod support;
mod transform;

pub mod beautify;

pub use beautify::{BeautifyKind, FaceDetector, FaceRegion, NullDetector};
pub use blur::BlurKind;
pub use brightness::BrightnessKind;
pub use config::OpConfig;
pub use edges::EdgeKind;
pub use histogram::HistogramKind;
pub use morphology::MorphologyKind;
pub use sharpen::SharpenKind;
pub use transform::TransformKind;

use std::sync::Arc;

use crate::buffer::ImageBuffer;
use crate::error::OpResult;

/// A named, configurable transform of one buffer into another.
#[derive(Clone)]
pub enum Operation {
    /// Smoothing filters
    Blur(BlurKind),
    /// Brightness, contrast, and gamma adjustments
    Brightness(BrightnessKind),
    /// Sharpening strategies
    Sharpen(SharpenKind),
    /// Edge detection over the luminance channel
    EdgeDetection(EdgeKind),
    /// Histogram-based tonal corrections
    Histogram(HistogramKind),
    /// Morphological operators
    Morphology(MorphologyKind),
    /// Geometric transforms
    Transform(TransformKind),
    /// Face beautification with an injected detector
    FaceBeautify {
        kind: BeautifyKind,
        detector: Arc<dyn FaceDetector>,
    },
}

impl Operation {
    /// Construct a face-beautify operation around a caller-owned detector.
    pub fn face_beautify(kind: BeautifyKind, detector: Arc<dyn FaceDetector>) -> Self {
        Operation::FaceBeautify { kind, detector }
    }

    /// Dotted `family.kind` name for logs and error messages.
    pub fn name(&self) -> String {
        match self {
            Operation::Blur(kind) => format!("blur.{}", kind.as_str()),
            Operation::Brightness(kind) => format!("brightness.{}", kind.as_str()),
            Operation::Sharpen(kind) => format!("sharpen.{}", kind.as_str()),
            Operation::EdgeDetection(kind) => format!("edges.{}", kind.as_str()),
            Operation::Histogram(kind) => format!("histogram.{}", kind.as_str()),
            Operation::Morphology(kind) => format!("morphology.{}", kind.as_str()),
            Operation::Transform(kind) => format!("transform.{}", kind.as_str()),
            Operation::FaceBeautify { kind, .. } => format!("beautify.{}", kind.as_str()),
        }
    }

    /// Run the transform.
    ///
    /// `Ok(Some(buffer))` is a produced result, `Ok(None)` means the
    /// operation had nothing to do (e.g. no faces found). The input buffer
    /// is never mutated.
    pub fn process(
        &self,
        buffer: &ImageBuffer,
        config: &OpConfig,
    ) -> OpResult<Option<ImageBuffer>> {
        support::ensure_nonempty(buffer)?;
        match self {
            Operation::Blur(kind) => blur::process(*kind, buffer, config).map(Some),
            Operation::Brightness(kind) => brightness::process(*kind, buffer, config).map(Some),
            Operation::Sharpen(kind) => sharpen::process(*kind, buffer, config).map(Some),
            Operation::EdgeDetection(kind) => edges::process(*kind, buffer, config).map(Some),
            Operation::Histogram(kind) => histogram::process(*kind, buffer, config).map(Some),
            Operation::Morphology(kind) => morphology::process(*kind, buffer, config).map(Some),
            Operation::Transform(kind) => transform::process(*kind, buffer, config).map(Some),
            Operation::FaceBeautify { kind, detector } => {
                beautify::process(*kind, detector.as_ref(), buffer, config)
            }
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_dotted() {
        assert_eq!(Operation::Blur(BlurKind::Gaussian).name(), "blur.gaussian");
        assert_eq!(
            Operation::Transform(TransformKind::Rotate180).name(),
            "transform.rotate180"
        );
        let op = Operation::face_beautify(BeautifyKind::SoftFilter, Arc::new(NullDetector));
        assert_eq!(op.name(), "beautify.soft_filter");
    }

    #[test]
    fn test_empty_buffer_rejected_uniformly() {
        let empty = ImageBuffer::from_pixels(vec![], 0, 0, 3).unwrap();
        let op = Operation::Brightness(BrightnessKind::Increase);
        assert!(op.process(&empty, &OpConfig::new()).is_err());
    }

    #[test]
    fn test_process_does_not_mutate_input() {
        let buffer = ImageBuffer::filled(4, 4, 3, 50).unwrap();
        let before = buffer.clone();
        let op = Operation::Brightness(BrightnessKind::Increase);
        let result = op.process(&buffer, &OpConfig::new()).unwrap().unwrap();
        assert_eq!(buffer, before);
        assert_ne!(result, before);
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let buffer = ImageBuffer::filled(6, 6, 3, 120).unwrap();
        let op = Operation::Blur(BlurKind::Gaussian);
        let config = OpConfig::new().with("sigma", 1.5);
        let a = op.process(&buffer, &config).unwrap();
        let b = op.process(&buffer, &config).unwrap();
        assert_eq!(a, b);
    }
}
