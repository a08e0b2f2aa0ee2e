//! Image file loading and saving.
//!
//! The editing engine itself never touches the filesystem; callers load a
//! buffer here and hand it to the editor. Validation happens before the
//! expensive decode: existence, then file size, then pixel dimensions.

use std::path::Path;

use crate::buffer::ImageBuffer;
use crate::config::LimitsConfig;
use crate::error::FileError;

/// Load an image file into a buffer, enforcing the configured limits.
pub fn load_from_path(path: &Path, limits: &LimitsConfig) -> Result<ImageBuffer, FileError> {
    if !path.exists() {
        return Err(FileError::NotFound(path.to_path_buf()));
    }

    let metadata = std::fs::metadata(path).map_err(|e| FileError::Decode {
        path: path.to_path_buf(),
        message: format!("Cannot read metadata: {}", e),
    })?;
    let max_bytes = limits.max_file_size_mb * 1024 * 1024;
    if metadata.len() > max_bytes {
        return Err(FileError::TooLarge {
            path: path.to_path_buf(),
            size_mb: metadata.len() / (1024 * 1024),
            max_mb: limits.max_file_size_mb,
        });
    }

    let image = image::open(path).map_err(|e| FileError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let buffer = ImageBuffer::from_dynamic(&image);
    if buffer.width() > limits.max_image_dimension || buffer.height() > limits.max_image_dimension {
        return Err(FileError::DimensionsTooLarge {
            path: path.to_path_buf(),
            width: buffer.width(),
            height: buffer.height(),
            max_dim: limits.max_image_dimension,
        });
    }

    tracing::debug!(
        "Loaded {:?} ({}x{}x{})",
        path,
        buffer.width(),
        buffer.height(),
        buffer.channels()
    );
    Ok(buffer)
}

/// Save a buffer to disk; the format follows the file extension.
pub fn save_to_path(buffer: &ImageBuffer, path: &Path) -> Result<(), FileError> {
    if buffer.is_empty() {
        return Err(FileError::Encode {
            path: path.to_path_buf(),
            message: "refusing to save an empty buffer".to_string(),
        });
    }
    buffer.to_dynamic().save(path).map_err(|e| FileError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!("Saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_from_path(Path::new("/no/such/image.png"), &LimitsConfig::default())
            .unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
    }

    #[test]
    fn test_save_load_roundtrip_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let pixels: Vec<u8> = (0..8 * 8 * 3).map(|i| (i % 251) as u8).collect();
        let buffer = ImageBuffer::from_pixels(pixels, 8, 8, 3).unwrap();
        save_to_path(&buffer, &path).unwrap();

        let restored = load_from_path(&path, &LimitsConfig::default()).unwrap();
        assert_eq!(restored, buffer);
    }

    #[test]
    fn test_dimension_limit_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        let buffer = ImageBuffer::filled(32, 4, 3, 10).unwrap();
        save_to_path(&buffer, &path).unwrap();

        let limits = LimitsConfig {
            max_file_size_mb: 100,
            max_image_dimension: 16,
        };
        let err = load_from_path(&path, &limits).unwrap_err();
        assert!(matches!(err, FileError::DimensionsTooLarge { .. }));
    }

    #[test]
    fn test_garbage_file_fails_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = load_from_path(&path, &LimitsConfig::default()).unwrap_err();
        assert!(matches!(err, FileError::Decode { .. }));
    }

    #[test]
    fn test_save_empty_buffer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let empty = ImageBuffer::from_pixels(vec![], 0, 0, 3).unwrap();
        assert!(save_to_path(&empty, &path).is_err());
    }
}
