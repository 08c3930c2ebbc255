//! Collaborators provided by the host UI.

use std::path::PathBuf;

use crate::app::services::export::ExportFormat;
use crate::app::services::file_io::SaveFormat;

/// Native open/save dialogs. `None` means the user cancelled.
pub trait FileDialogs {
    fn open_path(&mut self, start_dir: Option<&str>) -> Option<PathBuf>;

    /// Destination and chosen format filter for Save As.
    fn save_path(&mut self, start_dir: Option<&str>, suggested_name: &str) -> Option<(PathBuf, SaveFormat)>;

    fn export_path(&mut self, start_dir: Option<&str>, format: ExportFormat) -> Option<PathBuf>;
}

/// Non-blocking user messages.
pub trait Notifier {
    fn error(&mut self, message: &str);

    fn info(&mut self, _message: &str) {}
}

/// Routes messages to the log; used when nothing is on screen.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
    }

    fn info(&mut self, message: &str) {
        tracing::info!("{message}");
    }
}
