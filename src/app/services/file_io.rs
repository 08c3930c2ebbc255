use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::app::domain::Document;
use crate::app::infrastructure::error::{AppError, Result};

/// Format picked in the save dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Markdown,
    Mdx,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Markdown => "md",
            SaveFormat::Mdx => "mdx",
        }
    }

    pub fn filter_label(&self) -> &'static str {
        match self {
            SaveFormat::Markdown => "Markdown Files (*.md)",
            SaveFormat::Mdx => "MDX Files (*.mdx)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The document has no path yet; ask for one and use `save_document_as`.
    NeedsPath,
}

/// Append the format's extension when `path` has none.
pub fn with_default_extension(path: &Path, format: SaveFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}

/// Write `contents` to a temp file next to `path`, then rename it over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AppError::write(path, e))?;
    tmp.write_all(contents).map_err(|e| AppError::write(path, e))?;
    tmp.as_file().sync_all().map_err(|e| AppError::write(path, e))?;
    tmp.persist(path).map_err(|e| AppError::write(path, e.error))?;
    Ok(())
}

pub fn open_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| AppError::read(path, e))?;
    info!(path = %path.display(), bytes = content.len(), "opened document");
    Ok(Document::new_from_file(path.to_path_buf(), &content))
}

/// Save to the document's own path. The document is only marked clean once
/// the write has succeeded.
pub fn save_document(doc: &mut Document) -> Result<SaveOutcome> {
    let Some(path) = doc.file_path.clone() else {
        return Ok(SaveOutcome::NeedsPath);
    };
    write_atomic(&path, doc.text().as_bytes())?;
    doc.mark_clean();
    info!(path = %path.display(), "saved document");
    Ok(SaveOutcome::Saved(path))
}

pub fn save_document_as(doc: &mut Document, path: &Path, format: SaveFormat) -> Result<PathBuf> {
    let path = with_default_extension(path, format);
    write_atomic(&path, doc.text().as_bytes())?;
    doc.set_path(path.clone());
    doc.mark_clean();
    info!(path = %path.display(), "saved document as");
    Ok(path)
}
