//! Host-side path resolution
//!
//! Save, open and screenshot dialogs live outside the editor core. When an
//! action needs a file, the frame loop asks a [`DocumentPaths`] for an
//! already-resolved path; `None` means the user cancelled.

use crate::config::FileConfig;
use std::path::PathBuf;

/// Resolves file paths on behalf of dialog chrome
pub trait DocumentPaths {
    /// Where to save the scene
    fn save_path(&mut self) -> Option<PathBuf>;

    /// Which scene document to open
    fn open_path(&mut self) -> Option<PathBuf>;

    /// Where to write a screenshot
    fn screenshot_path(&mut self) -> Option<PathBuf> {
        None
    }
}

/// Always answers with the same configured paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPaths {
    scene: PathBuf,
    screenshot: PathBuf,
}

impl FixedPaths {
    /// Use `scene` for save and open, `screenshot` for captures
    pub fn new(scene: impl Into<PathBuf>, screenshot: impl Into<PathBuf>) -> Self {
        Self {
            scene: scene.into(),
            screenshot: screenshot.into(),
        }
    }

    /// Paths from the `[files]` configuration section
    pub fn from_config(files: &FileConfig) -> Self {
        Self::new(files.scene_path.clone(), files.screenshot_path.clone())
    }
}

impl DocumentPaths for FixedPaths {
    fn save_path(&mut self) -> Option<PathBuf> {
        Some(self.scene.clone())
    }

    fn open_path(&mut self) -> Option<PathBuf> {
        Some(self.scene.clone())
    }

    fn screenshot_path(&mut self) -> Option<PathBuf> {
        Some(self.screenshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_paths_follow_config() {
        let files = FileConfig::default();
        let mut paths = FixedPaths::from_config(&files);
        assert_eq!(paths.save_path(), Some(PathBuf::from("scene.xml")));
        assert_eq!(paths.open_path(), Some(PathBuf::from("scene.xml")));
        assert_eq!(paths.screenshot_path(), Some(PathBuf::from("screenshot.png")));
    }
}
