//! Destinations for assembled preview documents.
//!
//! A surface receives a complete HTML document and displays it. There is no
//! partial-update API: every render pass publishes the whole page.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{AppError, Result};

pub trait PreviewSurface {
    fn show(&mut self, html: &str) -> Result<()>;
}

/// Keeps every published document in memory.
#[derive(Debug, Default)]
pub struct MemoryPreviewSurface {
    pages: Vec<String>,
}

impl MemoryPreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn last(&self) -> Option<&str> {
        self.pages.last().map(String::as_str)
    }
}

impl PreviewSurface for MemoryPreviewSurface {
    fn show(&mut self, html: &str) -> Result<()> {
        self.pages.push(html.to_string());
        Ok(())
    }
}

/// Writes the document to `preview.html` in a temp directory and opens it in
/// the system browser the first time something is shown.
pub struct FilePreviewSurface {
    path: PathBuf,
    open_in_browser: bool,
    opened: bool,
}

impl FilePreviewSurface {
    pub fn new(open_in_browser: bool) -> Result<Self> {
        let dir = preview_dir();
        fs::create_dir_all(&dir).map_err(|e| AppError::write(&dir, e))?;
        Ok(Self::at(dir.join("preview.html"), open_in_browser))
    }

    pub fn at(path: PathBuf, open_in_browser: bool) -> Self {
        Self {
            path,
            open_in_browser,
            opened: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the preview file if it exists.
    pub fn cleanup(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl PreviewSurface for FilePreviewSurface {
    fn show(&mut self, html: &str) -> Result<()> {
        fs::write(&self.path, html).map_err(|e| AppError::write(&self.path, e))?;
        debug!(path = %self.path.display(), bytes = html.len(), "preview written");

        if self.open_in_browser && !self.opened {
            self.opened = true;
            // The page is already on disk; failing to launch a browser is not fatal.
            if let Err(e) = open::that(&self.path) {
                warn!("could not open preview in browser: {e}");
            }
        }
        Ok(())
    }
}

/// Temp directory holding the live preview page.
pub fn preview_dir() -> PathBuf {
    std::env::temp_dir().join("simple-md-preview")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_surface_records_pages() {
        let mut surface = MemoryPreviewSurface::new();
        surface.show("<p>one</p>").unwrap();
        surface.show("<p>two</p>").unwrap();
        assert_eq!(surface.pages().len(), 2);
        assert_eq!(surface.last(), Some("<p>two</p>"));
    }

    #[test]
    fn test_file_surface_overwrites_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = FilePreviewSurface::at(dir.path().join("preview.html"), false);
        surface.show("<p>first</p>").unwrap();
        surface.show("<p>second</p>").unwrap();
        let on_disk = fs::read_to_string(surface.path()).unwrap();
        assert_eq!(on_disk, "<p>second</p>");

        surface.cleanup();
        assert!(!surface.path().exists());
    }

    #[test]
    fn test_file_surface_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = FilePreviewSurface::at(dir.path().join("missing/preview.html"), false);
        let err = surface.show("<p>x</p>").unwrap_err();
        assert!(matches!(err, AppError::FileWrite { .. }));
    }
}
