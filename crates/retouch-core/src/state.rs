//! The single authoritative holder of the original and current buffers.

use std::path::{Path, PathBuf};

use crate::buffer::ImageBuffer;
use crate::error::EditError;

/// Image state: the originally loaded buffer, the current working buffer,
/// and where the image came from.
///
/// `current` is `None` exactly when `original` is `None`. Only the editor
/// mutates `current`; everything handed out is a copy.
#[derive(Debug, Default)]
pub struct ImageState {
    original: Option<ImageBuffer>,
    current: Option<ImageBuffer>,
    source_path: Option<PathBuf>,
}

impl ImageState {
    /// Create an empty state with no image loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly loaded image as both original and current.
    ///
    /// Rejects empty buffers before any field is touched.
    pub fn load(&mut self, buffer: ImageBuffer, path: Option<&Path>) -> Result<(), EditError> {
        if buffer.is_empty() {
            return Err(EditError::InvalidInput("image buffer is empty".into()));
        }
        self.original = Some(buffer.clone());
        self.current = Some(buffer);
        self.source_path = path.map(Path::to_path_buf);
        Ok(())
    }

    /// Replace the current buffer with an edited result.
    pub fn update_current(&mut self, buffer: ImageBuffer) -> Result<(), EditError> {
        if buffer.is_empty() {
            return Err(EditError::InvalidInput("image buffer is empty".into()));
        }
        self.current = Some(buffer);
        Ok(())
    }

    /// Copy the original back into current. No-op when nothing is loaded.
    pub fn reset_to_original(&mut self) {
        if let Some(original) = &self.original {
            self.current = Some(original.clone());
        }
    }

    /// True when an image is loaded.
    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    /// A copy of the current buffer.
    pub fn snapshot_current(&self) -> Option<ImageBuffer> {
        self.current.clone()
    }

    /// A copy of the originally loaded buffer.
    pub fn snapshot_original(&self) -> Option<ImageBuffer> {
        self.original.clone()
    }

    /// Current width in pixels, 0 when nothing is loaded.
    pub fn width(&self) -> u32 {
        self.current.as_ref().map_or(0, ImageBuffer::width)
    }

    /// Current height in pixels, 0 when nothing is loaded.
    pub fn height(&self) -> u32 {
        self.current.as_ref().map_or(0, ImageBuffer::height)
    }

    /// Current channel count, 0 when nothing is loaded.
    pub fn channels(&self) -> u8 {
        self.current.as_ref().map_or(0, ImageBuffer::channels)
    }

    /// Path the image was loaded from, if it came from disk.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn buffer(value: u8) -> ImageBuffer {
        ImageBuffer::filled(6, 4, 3, value).unwrap()
    }

    #[test]
    fn test_load_sets_both_buffers() {
        let mut state = ImageState::new();
        state
            .load(buffer(10), Some(&PathBuf::from("/photos/cat.png")))
            .unwrap();
        assert!(state.has_image());
        assert_eq!(state.snapshot_current().unwrap(), buffer(10));
        assert_eq!(state.snapshot_original().unwrap(), buffer(10));
        assert_eq!(state.source_path(), Some(Path::new("/photos/cat.png")));
        assert_eq!(state.width(), 6);
        assert_eq!(state.height(), 4);
        assert_eq!(state.channels(), 3);
    }

    #[test]
    fn test_load_rejects_empty_buffer() {
        let mut state = ImageState::new();
        let empty = ImageBuffer::from_pixels(vec![], 0, 0, 3).unwrap();
        assert!(state.load(empty, None).is_err());
        assert!(!state.has_image());
        assert!(state.snapshot_original().is_none());
    }

    #[test]
    fn test_update_current_keeps_original() {
        let mut state = ImageState::new();
        state.load(buffer(10), None).unwrap();
        state.update_current(buffer(20)).unwrap();
        assert_eq!(state.snapshot_current().unwrap(), buffer(20));
        assert_eq!(state.snapshot_original().unwrap(), buffer(10));
    }

    #[test]
    fn test_update_current_rejects_empty() {
        let mut state = ImageState::new();
        state.load(buffer(10), None).unwrap();
        let empty = ImageBuffer::from_pixels(vec![], 0, 0, 1).unwrap();
        assert!(state.update_current(empty).is_err());
        // State unchanged on rejection
        assert_eq!(state.snapshot_current().unwrap(), buffer(10));
    }

    #[test]
    fn test_update_current_recomputes_dimensions() {
        let mut state = ImageState::new();
        state.load(buffer(10), None).unwrap();
        let wider = ImageBuffer::filled(12, 8, 1, 0).unwrap();
        state.update_current(wider).unwrap();
        assert_eq!(state.width(), 12);
        assert_eq!(state.height(), 8);
        assert_eq!(state.channels(), 1);
    }

    #[test]
    fn test_reset_restores_original() {
        let mut state = ImageState::new();
        state.load(buffer(10), None).unwrap();
        state.update_current(buffer(20)).unwrap();
        state.reset_to_original();
        assert_eq!(state.snapshot_current().unwrap(), buffer(10));
    }

    #[test]
    fn test_reset_without_image_is_noop() {
        let mut state = ImageState::new();
        state.reset_to_original();
        assert!(!state.has_image());
    }
}
