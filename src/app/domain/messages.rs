/// Commands reachable from the toolbar, menus and the command palette.
/// The editor session dispatches each one; see `EditorSession::dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,

    // Export
    ExportMarkdown,
    ExportHtml,
    ExportPdf,

    // Edit
    EditUndo,
    EditRedo,
}

impl Message {
    /// Commands in command-palette order.
    pub const PALETTE: [Message; 9] = [
        Message::FileNew,
        Message::FileOpen,
        Message::FileSave,
        Message::FileSaveAs,
        Message::ExportMarkdown,
        Message::ExportHtml,
        Message::ExportPdf,
        Message::EditUndo,
        Message::EditRedo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FileNew => "New File",
            Self::FileOpen => "Open File",
            Self::FileSave => "Save File",
            Self::FileSaveAs => "Save File As",
            Self::ExportMarkdown => "Export Markdown",
            Self::ExportHtml => "Export HTML",
            Self::ExportPdf => "Export PDF",
            Self::EditUndo => "Undo",
            Self::EditRedo => "Redo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_labels_are_unique() {
        let mut labels: Vec<_> = Message::PALETTE.iter().map(Message::label).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Message::PALETTE.len());
    }
}
