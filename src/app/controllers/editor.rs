//! Editor session: owns the document and routes keystrokes, palette picks
//! and commands through it, keeping the preview informed of every mutation.

use std::path::Path;

use tracing::{debug, info};

use crate::app::controllers::preview::PreviewController;
use crate::app::domain::{AppSettings, Document, Message, TextEdit};
use crate::app::infrastructure::clock::Clock;
use crate::app::infrastructure::dialogs::{FileDialogs, Notifier};
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::preview_surface::PreviewSurface;
use crate::app::services::auto_pair::{EditResult, EditorView, on_key};
use crate::app::services::export::{ExportFormat, export};
use crate::app::services::file_io::{SaveOutcome, open_document, save_document, save_document_as};
use crate::app::services::highlight::{self, Span};
use crate::app::services::snippets::{PopupTrigger, Snippet, SnippetPopup};
use crate::app::services::text_ops::{char_after, char_before, clamp_to_char_boundary, line_prefix};

/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Char(char),
    Backspace,
    Enter,
    Up,
    Down,
    Escape,
}

pub struct EditorSession<S: PreviewSurface, C: Clock> {
    doc: Document,
    preview: PreviewController<S, C>,
    settings: AppSettings,
    popup: Option<SnippetPopup>,
}

impl<S: PreviewSurface, C: Clock> EditorSession<S, C> {
    pub fn new(doc: Document, surface: S, clock: C, settings: AppSettings) -> Self {
        Self {
            doc,
            preview: PreviewController::new(surface, clock, &settings),
            settings,
            popup: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn preview(&self) -> &PreviewController<S, C> {
        &self.preview
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn popup(&self) -> Option<&SnippetPopup> {
        self.popup.as_ref()
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.doc.set_cursor(pos);
    }

    pub fn select(&mut self, range: std::ops::Range<usize>) {
        self.doc.select(range);
    }

    /// Drive the debounce timer. Call from the host event loop.
    pub fn tick(&mut self) -> Result<bool> {
        self.preview.tick(&self.doc)
    }

    pub fn render_now(&mut self) -> Result<()> {
        self.preview.render_now(&self.doc)
    }

    pub fn handle_key(&mut self, key: EditorKey) {
        if self.popup.is_some() {
            self.handle_popup_key(key);
            return;
        }

        match key {
            EditorKey::Char(c) => self.type_char(c),
            EditorKey::Backspace => self.backspace(),
            EditorKey::Enter => self.insert("\n"),
            EditorKey::Up | EditorKey::Down | EditorKey::Escape => {}
        }
    }

    fn type_char(&mut self, c: char) {
        if let Some(trigger) = self.popup_trigger(c) {
            self.insert(&c.to_string());
            debug!(?trigger, "snippet popup opened");
            self.popup = Some(SnippetPopup::open(trigger));
            return;
        }

        let result = if self.settings.auto_pair_enabled {
            on_key(c, &EditorView::of(&self.doc))
        } else {
            EditResult::PassThrough
        };
        match result {
            EditResult::Handled(edit) => self.apply(&edit),
            EditResult::PassThrough => self.insert(&c.to_string()),
        }
    }

    fn popup_trigger(&self, c: char) -> Option<PopupTrigger> {
        if self.doc.selection().is_some() {
            return None;
        }
        let text = self.doc.text();
        let cursor = self.doc.cursor();
        match c {
            '/' if line_prefix(text, cursor).trim().is_empty() => Some(PopupTrigger::Syntax),
            '[' if char_before(text, cursor) == Some('[') => Some(PopupTrigger::WikiLink),
            _ => None,
        }
    }

    fn handle_popup_key(&mut self, key: EditorKey) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        match key {
            EditorKey::Char(c) => popup.push_filter(c),
            EditorKey::Backspace => {
                if !popup.pop_filter() {
                    self.popup = None;
                }
            }
            EditorKey::Up => popup.select_previous(),
            EditorKey::Down => popup.select_next(),
            EditorKey::Enter => self.accept_popup(),
            EditorKey::Escape => self.popup = None,
        }
    }

    /// Replace the trigger text with the selected snippet and close the popup.
    pub fn accept_popup(&mut self) {
        let Some(popup) = self.popup.take() else {
            return;
        };
        let Some(item) = popup.selected() else {
            return;
        };

        let text = self.doc.text();
        let cursor = self.doc.cursor();
        let trigger = popup.trigger.text();
        let start = if text[..cursor].ends_with(trigger) {
            cursor - trigger.len()
        } else {
            cursor
        };
        let mut end = cursor;
        if popup.trigger == PopupTrigger::WikiLink && char_after(text, cursor) == Some(']') {
            end += 1;
        }

        let edit = TextEdit {
            range: start..end,
            text: item.text.to_string(),
            cursor: start + item.text.len(),
            selection: None,
        };
        self.apply(&edit);
    }

    /// Insert a Markdown palette entry at the cursor, replacing any selection.
    pub fn insert_palette_snippet(&mut self, snippet: &Snippet) {
        self.insert(snippet.text);
    }

    /// Replace the whole buffer, e.g. after the file changed on disk.
    pub fn replace_text(&mut self, content: &str) {
        let cursor = self.doc.cursor();
        self.doc.set_text(content, false);
        self.doc.set_cursor(clamp_to_char_boundary(content, cursor));
        self.preview.on_document_changed();
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.doc.undo();
        if changed {
            self.preview.on_document_changed();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.doc.redo();
        if changed {
            self.preview.on_document_changed();
        }
        changed
    }

    /// Spans for line `index`, or nothing when highlighting is off.
    pub fn highlight_line(&self, index: usize) -> Vec<Span> {
        if !self.settings.highlighting_enabled {
            return Vec::new();
        }
        self.doc
            .text()
            .split('\n')
            .nth(index)
            .map(highlight::highlight)
            .unwrap_or_default()
    }

    /// Style buffer for the whole document, one character per byte.
    pub fn style_buffer(&self) -> String {
        if self.settings.highlighting_enabled {
            highlight::style_text(self.doc.text())
        } else {
            highlight::PLAIN_STYLE.to_string().repeat(self.doc.text().len())
        }
    }

    /// Run a menu or command-palette command. Failures are reported through
    /// `notifier` and leave the document as it was.
    pub fn dispatch(&mut self, message: Message, dialogs: &mut impl FileDialogs, notifier: &mut impl Notifier) {
        let outcome = match message {
            Message::FileNew => {
                self.load(Document::new_untitled());
                Ok(())
            }
            Message::FileOpen => self.file_open(dialogs),
            Message::FileSave => self.file_save(dialogs),
            Message::FileSaveAs => self.file_save_as(dialogs),
            Message::ExportMarkdown => self.file_export(dialogs, ExportFormat::Markdown),
            Message::ExportHtml => self.file_export(dialogs, ExportFormat::Html),
            Message::ExportPdf => self.file_export(dialogs, ExportFormat::Pdf),
            Message::EditUndo => {
                self.undo();
                Ok(())
            }
            Message::EditRedo => {
                self.redo();
                Ok(())
            }
        };

        if let Err(e) = outcome {
            notifier.error(&e.to_string());
        }
    }

    fn file_open(&mut self, dialogs: &mut impl FileDialogs) -> Result<()> {
        let Some(path) = dialogs.open_path(self.settings.last_open_directory.as_deref()) else {
            return Ok(());
        };
        let doc = open_document(&path)?;
        self.remember_directory(&path);
        self.load(doc);
        Ok(())
    }

    fn file_save(&mut self, dialogs: &mut impl FileDialogs) -> Result<()> {
        match save_document(&mut self.doc)? {
            SaveOutcome::Saved(_) => Ok(()),
            SaveOutcome::NeedsPath => self.file_save_as(dialogs),
        }
    }

    fn file_save_as(&mut self, dialogs: &mut impl FileDialogs) -> Result<()> {
        let start_dir = self.settings.last_open_directory.clone();
        let Some((path, format)) = dialogs.save_path(start_dir.as_deref(), &self.doc.display_name) else {
            return Ok(());
        };
        let saved = save_document_as(&mut self.doc, &path, format)?;
        self.remember_directory(&saved);
        Ok(())
    }

    fn file_export(&mut self, dialogs: &mut impl FileDialogs, format: ExportFormat) -> Result<()> {
        let Some(path) = dialogs.export_path(self.settings.last_open_directory.as_deref(), format) else {
            return Ok(());
        };
        let hint = self.doc.path().and_then(|p| p.to_str());
        export(format, self.doc.text(), hint, &path)
    }

    fn load(&mut self, doc: Document) {
        info!(name = %doc.display_name, "document loaded");
        self.doc = doc;
        self.popup = None;
        self.preview.on_document_changed();
    }

    fn remember_directory(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.settings.last_open_directory = Some(parent.to_string_lossy().to_string());
        }
    }

    fn insert(&mut self, text: &str) {
        self.doc.insert_text(text);
        self.preview.on_document_changed();
    }

    fn apply(&mut self, edit: &TextEdit) {
        self.doc.apply(edit);
        self.preview.on_document_changed();
    }

    fn backspace(&mut self) {
        let range = match self.doc.selection() {
            Some(range) => range,
            None => {
                let cursor = self.doc.cursor();
                let Some(prev) = char_before(self.doc.text(), cursor) else {
                    return;
                };
                cursor - prev.len_utf8()..cursor
            }
        };
        let start = range.start;
        self.apply(&TextEdit {
            range,
            text: String::new(),
            cursor: start,
            selection: None,
        });
    }
}
