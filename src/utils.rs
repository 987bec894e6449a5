// ABOUTME: Utility functions for the cranio-deck application
// ABOUTME: Prepares the image cache directory and the deck's output location

use crate::errors::{DeckError, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

fn create_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(DeckError::ValidationError(format!(
            "{:?} exists and is not a directory",
            dir
        )));
    }
    fs::create_dir_all(dir)?;
    debug!("Created directory {:?}", dir);
    Ok(())
}

/// Create the image cache directory and confirm downloads can be saved into it.
///
/// Runs before any slide is built, so a bad cache location fails the run up front
/// instead of silently leaving every slide without a picture.
pub fn prepare_images_dir(dir: &Path) -> Result<()> {
    create_dir(dir)?;

    let probe = dir.join(format!(".write_check_{}", uuid::Uuid::new_v4()));
    fs::write(&probe, b"").map_err(|e| {
        DeckError::ValidationError(format!("Image directory {:?} is not writable: {}", dir, e))
    })?;
    if let Err(e) = fs::remove_file(&probe) {
        warn!("Could not remove {:?}: {}", probe, e);
    }
    Ok(())
}

/// Make sure the deck can be written at `path`: its parent exists and `path` is not a directory.
pub fn prepare_output_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Output path {:?} is a directory",
            path
        )));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_images_dir_is_created_and_left_empty() {
        let temp_dir = TempDir::new().unwrap();
        let images = temp_dir.path().join("presentation").join("images");

        prepare_images_dir(&images).unwrap();
        prepare_images_dir(&images).unwrap();

        assert!(images.is_dir());
        assert_eq!(fs::read_dir(&images).unwrap().count(), 0);
    }

    #[test]
    fn test_images_dir_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("images");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            prepare_images_dir(&file),
            Err(DeckError::ValidationError(_))
        ));
    }

    #[test]
    fn test_output_path_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("presentation").join("deck.pptx");

        prepare_output_path(&output).unwrap();
        assert!(output.parent().unwrap().is_dir());
        assert!(!output.exists());
    }

    #[test]
    fn test_output_path_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            prepare_output_path(temp_dir.path()),
            Err(DeckError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bare_file_name_has_no_parent_to_create() {
        assert!(prepare_output_path(Path::new("deck.pptx")).is_ok());
    }
}
