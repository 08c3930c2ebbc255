use std::path::Path;

use tracing::info;

use super::assembler::print_document;
use super::file_io::write_atomic;
use super::pipeline::render_body;
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::pdf::print_html_to_pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Html,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Raw buffer, unchanged.
pub fn export_markdown(text: &str, path: &Path) -> Result<()> {
    write_atomic(path, text.as_bytes())?;
    info!(path = %path.display(), "exported markdown");
    Ok(())
}

/// Normalized, rendered HTML fragment without the preview shell.
pub fn export_html(text: &str, filename_hint: Option<&str>, path: &Path) -> Result<()> {
    let body = render_body(text, filename_hint);
    write_atomic(path, body.as_bytes())?;
    info!(path = %path.display(), "exported html");
    Ok(())
}

/// Rendered HTML printed through headless Chrome. Nothing is written when
/// the browser is missing or fails.
pub fn export_pdf(text: &str, filename_hint: Option<&str>, path: &Path) -> Result<()> {
    let html = print_document(&render_body(text, filename_hint));
    let pdf = print_html_to_pdf(&html)?;
    write_atomic(path, &pdf)?;
    info!(path = %path.display(), bytes = pdf.len(), "exported pdf");
    Ok(())
}

pub fn export(format: ExportFormat, text: &str, filename_hint: Option<&str>, path: &Path) -> Result<()> {
    match format {
        ExportFormat::Markdown => export_markdown(text, path),
        ExportFormat::Html => export_html(text, filename_hint, path),
        ExportFormat::Pdf => export_pdf(text, filename_hint, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_export_markdown_is_raw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        let text = "import A from 'a'\n# T";
        export(ExportFormat::Markdown, text, None, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn test_export_html_is_body_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        export_html("import A from 'a'\n# T\n\n==hi==", None, &path).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("<h1>T</h1>"));
        assert!(html.contains("<mark>hi</mark>"));
        assert!(!html.contains("<html"));
        assert!(!html.contains("import A"));
    }

    #[test]
    fn test_export_html_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.html");
        assert!(export_html("# T", None, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Html.extension(), "html");
    }
}
