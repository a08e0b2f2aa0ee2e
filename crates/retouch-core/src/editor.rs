//! The editor couples image state and history behind a transactional
//! apply/undo/redo/reset surface.
//!
//! This is the only place allowed to mutate both [`ImageState`] and
//! [`EditHistory`]; every call either completes fully or leaves both
//! untouched. All calls are synchronous and expected from a single caller
//! context, so no locking is needed here.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;
use crate::config::Config;
use crate::error::{EditError, EditResult};
use crate::history::EditHistory;
use crate::ops::{OpConfig, Operation};
use crate::state::ImageState;

/// Result of a successful apply call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The operation produced a new current state
    Applied,
    /// The operation had nothing to do; state and history are untouched
    Unchanged,
}

/// Summary of the loaded image for view layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Transactional editing surface over one loaded image.
pub struct Editor {
    state: ImageState,
    history: EditHistory,
}

impl Editor {
    /// Create an editor with the history bound from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_history_limit(config.history.max_entries)
    }

    /// Create an editor with an explicit history bound.
    pub fn with_history_limit(max_entries: usize) -> Self {
        Self {
            state: ImageState::new(),
            history: EditHistory::new(max_entries),
        }
    }

    /// Load an image, replacing any previous one and reseeding history.
    ///
    /// All-or-nothing: an invalid buffer is rejected before either
    /// collaborator is touched.
    pub fn load(&mut self, buffer: ImageBuffer, path: Option<&Path>) -> EditResult<()> {
        self.state.load(buffer, path)?;
        self.history.set_initial(self.state.snapshot_current().as_ref());
        tracing::debug!(
            "Loaded image {}x{}x{} from {:?}",
            self.state.width(),
            self.state.height(),
            self.state.channels(),
            path
        );
        Ok(())
    }

    /// Apply an operation to the current image.
    ///
    /// On failure the error is reported with the operation's name and both
    /// state and history remain byte-for-byte unchanged. An operation that
    /// produces no result reports [`ApplyOutcome::Unchanged`], again with
    /// nothing recorded.
    pub fn apply(&mut self, op: &Operation, config: &OpConfig) -> EditResult<ApplyOutcome> {
        let Some(current) = self.state.snapshot_current() else {
            return Err(EditError::NoImageLoaded);
        };

        let produced =
            op.process(&current, config)
                .map_err(|e| EditError::OperationFailed {
                    operation: op.name(),
                    message: e.to_string(),
                })?;

        let Some(result) = produced else {
            tracing::debug!("{}: no change produced", op.name());
            return Ok(ApplyOutcome::Unchanged);
        };

        self.state.update_current(result.clone())?;
        self.history.push(Some(&result));
        tracing::debug!(
            "{}: applied ({}x{})",
            op.name(),
            result.width(),
            result.height()
        );
        Ok(ApplyOutcome::Applied)
    }

    /// Step back one edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        let current = self.state.snapshot_current();
        match self.history.undo(current.as_ref()) {
            Some(restored) => {
                let ok = self.state.update_current(restored).is_ok();
                if ok {
                    tracing::debug!("undo -> depth {}", self.history.undo_depth());
                }
                ok
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone edit. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        match self.history.redo() {
            Some(restored) => {
                let ok = self.state.update_current(restored).is_ok();
                if ok {
                    tracing::debug!("redo -> depth {}", self.history.undo_depth());
                }
                ok
            }
            None => false,
        }
    }

    /// Restore the originally loaded image and discard all history.
    ///
    /// This differs from undoing to the beginning: the timeline is
    /// reseeded with the original as its new floor, so neither undo nor
    /// redo is available afterwards.
    pub fn reset_to_original(&mut self) {
        if !self.state.has_image() {
            return;
        }
        self.state.reset_to_original();
        self.history.set_initial(self.state.snapshot_current().as_ref());
        tracing::debug!("reset to original");
    }

    /// True when an image is loaded.
    pub fn has_image(&self) -> bool {
        self.state.has_image()
    }

    /// True when an earlier state is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True when an undone state can be re-applied.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// A copy of the current buffer.
    pub fn current(&self) -> Option<ImageBuffer> {
        self.state.snapshot_current()
    }

    /// A copy of the originally loaded buffer.
    pub fn original(&self) -> Option<ImageBuffer> {
        self.state.snapshot_original()
    }

    /// Undo snapshots currently held (including the floor entry).
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Redo snapshots currently held.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Summary of the loaded image, or `None` when nothing is loaded.
    pub fn info(&self) -> Option<ImageInfo> {
        if !self.state.has_image() {
            return None;
        }
        Some(ImageInfo {
            width: self.state.width(),
            height: self.state.height(),
            channels: self.state.channels(),
            path: self.state.source_path().map(Path::to_path_buf),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        })
    }

    /// Aspect-preserving downscale of the current image for a preview
    /// surface. Images already within the bounds are returned as-is.
    pub fn resize_for_display(&self, max_width: u32, max_height: u32) -> Option<ImageBuffer> {
        let current = self.state.snapshot_current()?;
        let (w, h) = current.dimensions();
        if w == 0 || h == 0 || max_width == 0 || max_height == 0 {
            return Some(current);
        }
        let scale = (max_width as f32 / w as f32)
            .min(max_height as f32 / h as f32)
            .min(1.0);
        if scale >= 1.0 {
            return Some(current);
        }
        let new_w = ((w as f32 * scale) as u32).max(1);
        let new_h = ((h as f32 * scale) as u32).max(1);
        let resized = current
            .to_dynamic()
            .resize_exact(new_w, new_h, FilterType::Triangle);
        Some(ImageBuffer::from_dynamic(&resized))
    }
}
