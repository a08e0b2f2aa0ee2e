//! Retouch Core - Embeddable photo-editing engine.
//!
//! Retouch couples an in-memory image buffer, a bounded undo/redo history,
//! and a catalog of configurable operations behind one transactional
//! editing surface.
//!
//! # Architecture
//!
//! ```text
//! Load -> Editor { ImageState + EditHistory } -> apply(Operation, OpConfig)
//!             |                                      |
//!             +-- undo / redo / reset                +-- blur, brightness,
//!                                                        sharpen, edges,
//!                                                        histogram, morphology,
//!                                                        transform, beautify
//! ```
//!
//! Every apply either fully succeeds (new current state, pushed to
//! history) or leaves the session byte-for-byte unchanged. Buffers are
//! value types: each hand-off across the state/history boundary is an
//! independent copy, which is what keeps the stacks safe without locks.
//!
//! # Usage
//!
//! ```rust
//! use retouch_core::{BrightnessKind, Editor, ImageBuffer, OpConfig, Operation};
//!
//! fn main() -> retouch_core::Result<()> {
//!     let mut editor = Editor::with_history_limit(20);
//!     editor.load(ImageBuffer::filled(64, 64, 3, 100)?, None)?;
//!
//!     let op = Operation::Brightness(BrightnessKind::Increase);
//!     let config = OpConfig::new().with("value", 25);
//!     editor.apply(&op, &config)?;
//!
//!     assert!(editor.can_undo());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod io;
pub mod ops;
pub mod state;

// Re-exports for convenient access
pub use buffer::ImageBuffer;
pub use config::{Config, DisplayConfig, HistoryConfig, LimitsConfig, LoggingConfig};
pub use editor::{ApplyOutcome, Editor, ImageInfo};
pub use error::{
    ConfigError, EditError, EditResult, FileError, OpResult, OperationError, Result, RetouchError,
};
pub use history::EditHistory;
pub use ops::{
    BeautifyKind, BlurKind, BrightnessKind, EdgeKind, FaceDetector, FaceRegion, HistogramKind,
    MorphologyKind, NullDetector, OpConfig, Operation, SharpenKind, TransformKind,
};
pub use state::ImageState;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
