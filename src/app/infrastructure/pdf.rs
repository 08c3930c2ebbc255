//! HTML-to-PDF printing through a headless Chrome/Chromium binary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::tempdir;
use tracing::{debug, info};
use which::which;

use super::error::{AppError, Result};

/// Environment variable that pins the browser used for PDF export.
pub const CHROME_ENV_VAR: &str = "SIMPLE_MD_CHROME";

const PATH_CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "msedge",
];

/// Print a complete HTML document to PDF bytes.
pub fn print_html_to_pdf(html: &str) -> Result<Vec<u8>> {
    let chrome = resolve_chrome_binary()?;
    print_with(&chrome, html)
}

fn print_with(chrome: &Path, html: &str) -> Result<Vec<u8>> {
    let work = tempdir()?;
    let html_path = work.path().join("export.html");
    fs::write(&html_path, html).map_err(|e| AppError::write(&html_path, e))?;
    let pdf_path = work.path().join("export.pdf");

    info!(browser = %chrome.display(), "printing PDF");
    let status = Command::new(chrome)
        .arg("--headless")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--print-to-pdf-no-header")
        .arg(format!("--print-to-pdf={}", pdf_path.display()))
        .arg(file_url(&html_path))
        .status()
        .map_err(|e| {
            AppError::ExportBackendUnavailable(format!(
                "failed to launch {}: {e}",
                chrome.display()
            ))
        })?;

    if !status.success() {
        return Err(AppError::Export(format!(
            "{} exited with status {status}",
            chrome.display()
        )));
    }

    fs::read(&pdf_path).map_err(|e| AppError::read(&pdf_path, e))
}

fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    if raw.starts_with('/') {
        format!("file://{raw}")
    } else {
        format!("file:///{raw}")
    }
}

/// Locate a Chrome-compatible browser, or report the backend as unavailable.
pub fn resolve_chrome_binary() -> Result<PathBuf> {
    for var in [CHROME_ENV_VAR, "CHROME_BIN", "GOOGLE_CHROME_BIN"] {
        if let Some(path) = env::var_os(var) {
            if !path.is_empty() {
                debug!(var, "using browser from environment");
                return Ok(PathBuf::from(path));
            }
        }
    }

    for candidate in PATH_CANDIDATES {
        if let Ok(path) = which(candidate) {
            return Ok(path);
        }
    }

    for candidate in install_locations() {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(AppError::ExportBackendUnavailable(format!(
        "no Chrome/Chromium found for PDF export; set {CHROME_ENV_VAR} to a browser binary"
    )))
}

fn install_locations() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &["/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium-browser",
            "/usr/bin/chromium",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_unix_path() {
        assert_eq!(file_url(Path::new("/tmp/x/export.html")), "file:///tmp/x/export.html");
    }

    #[test]
    fn test_missing_browser_binary_is_backend_unavailable() {
        let err = print_with(Path::new("/definitely/not/a/browser"), "<p>x</p>").unwrap_err();
        assert!(matches!(err, AppError::ExportBackendUnavailable(_)));
    }
}
