use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::app::services::text_ops::{clamp_to_char_boundary, extract_filename};

/// Maximum number of undo snapshots kept per document.
pub const HISTORY_LIMIT: usize = 100;

/// A single replacement in the buffer plus where the caret ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte range of the existing text being replaced.
    pub range: Range<usize>,
    pub text: String,
    /// Cursor position after the edit, in post-edit byte offsets.
    pub cursor: usize,
    /// Selection after the edit, in post-edit byte offsets.
    pub selection: Option<Range<usize>>,
}

impl TextEdit {
    /// Insert `text` at `at`, leaving the cursor after it.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = at + text.len();
        Self {
            range: at..at,
            text,
            cursor,
            selection: None,
        }
    }

    /// Apply to a raw string, returning nothing about the cursor.
    pub fn apply_to(&self, buffer: &mut String) {
        buffer.replace_range(self.range.clone(), &self.text);
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    text: String,
    cursor: usize,
}

/// The editor buffer: text, caret, selection, and the file it came from.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    cursor: usize,
    selection: Option<Range<usize>>,
    pub file_path: Option<PathBuf>,
    pub display_name: String,
    has_unsaved_changes: bool,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl Document {
    pub fn new_untitled() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            selection: None,
            file_path: None,
            display_name: "Untitled".to_string(),
            has_unsaved_changes: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn new_from_file(path: PathBuf, content: &str) -> Self {
        let mut doc = Self::new_untitled();
        doc.text = content.to_string();
        doc.display_name = extract_filename(&path);
        doc.file_path = Some(path);
        doc
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection.as_ref().map(|r| &self.text[r.clone()])
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = clamp_to_char_boundary(&self.text, pos);
        self.selection = None;
    }

    /// Select `range`; the cursor moves to its end. Empty ranges clear the selection.
    pub fn select(&mut self, range: Range<usize>) {
        let start = clamp_to_char_boundary(&self.text, range.start);
        let end = clamp_to_char_boundary(&self.text, range.end.max(start));
        self.cursor = end;
        self.selection = (start < end).then_some(start..end);
    }

    pub fn is_dirty(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn mark_clean(&mut self) {
        self.has_unsaved_changes = false;
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.display_name = extract_filename(&path);
        self.file_path = Some(path);
    }

    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Whether the associated file carries the MDX extension.
    pub fn is_mdx(&self) -> bool {
        self.file_path
            .as_deref()
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mdx"))
    }

    /// Apply an edit, recording history and marking the document modified.
    pub fn apply(&mut self, edit: &TextEdit) {
        self.push_undo();
        edit.apply_to(&mut self.text);
        self.cursor = clamp_to_char_boundary(&self.text, edit.cursor);
        self.selection = edit.selection.clone().filter(|r| r.start < r.end);
        self.has_unsaved_changes = true;
    }

    /// Replace the selection (or insert at the cursor) with `text`.
    pub fn insert_text(&mut self, text: &str) {
        let range = self.selection.clone().unwrap_or(self.cursor..self.cursor);
        let mut edit = TextEdit::insert(range.start, text);
        edit.range = range;
        self.apply(&edit);
    }

    /// Replace the whole buffer. History is dropped; the document counts as
    /// modified only if `modified` is set.
    pub fn set_text(&mut self, content: &str, modified: bool) {
        self.text = content.to_string();
        self.cursor = 0;
        self.selection = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.has_unsaved_changes = modified;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Restore the previous snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(prev) => {
                let current = self.replace_with(prev);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = self.replace_with(next);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    fn replace_with(&mut self, snapshot: Snapshot) -> Snapshot {
        let current = Snapshot {
            text: std::mem::replace(&mut self.text, snapshot.text),
            cursor: self.cursor,
        };
        self.cursor = clamp_to_char_boundary(&self.text, snapshot.cursor);
        self.selection = None;
        self.has_unsaved_changes = true;
        current
    }

    fn push_undo(&mut self) {
        if self.undo_stack.len() == HISTORY_LIMIT {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(Snapshot {
            text: self.text.clone(),
            cursor: self.cursor,
        });
        self.redo_stack.clear();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new_untitled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_untitled() {
        let doc = Document::new_untitled();
        assert_eq!(doc.text(), "");
        assert_eq!(doc.display_name, "Untitled");
        assert!(!doc.is_dirty());
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_new_from_file_is_clean() {
        let doc = Document::new_from_file(PathBuf::from("/notes/todo.md"), "# Todo");
        assert_eq!(doc.display_name, "todo.md");
        assert_eq!(doc.text(), "# Todo");
        assert!(!doc.is_dirty());
        assert!(!doc.is_mdx());
    }

    #[test]
    fn test_is_mdx_by_extension() {
        let doc = Document::new_from_file(PathBuf::from("page.MDX"), "");
        assert!(doc.is_mdx());
    }

    #[test]
    fn test_apply_edit_moves_cursor_and_marks_dirty() {
        let mut doc = Document::new_untitled();
        doc.apply(&TextEdit {
            range: 0..0,
            text: "()".to_string(),
            cursor: 1,
            selection: None,
        });
        assert_eq!(doc.text(), "()");
        assert_eq!(doc.cursor(), 1);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_insert_text_replaces_selection() {
        let mut doc = Document::new_from_file(PathBuf::from("a.md"), "hello world");
        doc.select(6..11);
        assert_eq!(doc.selected_text(), Some("world"));
        doc.insert_text("rust");
        assert_eq!(doc.text(), "hello rust");
        assert_eq!(doc.cursor(), 10);
        assert!(doc.selection().is_none());
    }

    #[test]
    fn test_select_empty_range_clears_selection() {
        let mut doc = Document::new_from_file(PathBuf::from("a.md"), "abc");
        doc.select(2..2);
        assert!(doc.selection().is_none());
        assert_eq!(doc.cursor(), 2);
    }

    #[test]
    fn test_undo_redo() {
        let mut doc = Document::new_untitled();
        doc.insert_text("a");
        doc.insert_text("b");
        assert_eq!(doc.text(), "ab");

        assert!(doc.undo());
        assert_eq!(doc.text(), "a");
        assert_eq!(doc.cursor(), 1);
        assert!(doc.undo());
        assert_eq!(doc.text(), "");
        assert!(!doc.undo());

        assert!(doc.redo());
        assert_eq!(doc.text(), "a");
        doc.insert_text("c");
        assert!(!doc.can_redo());
        assert_eq!(doc.text(), "ac");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut doc = Document::new_untitled();
        for _ in 0..(HISTORY_LIMIT + 20) {
            doc.insert_text("x");
        }
        let mut undone = 0;
        while doc.undo() {
            undone += 1;
        }
        assert_eq!(undone, HISTORY_LIMIT);
        assert_eq!(doc.text().len(), 20);
    }

    #[test]
    fn test_set_text_resets_history() {
        let mut doc = Document::new_untitled();
        doc.insert_text("draft");
        doc.set_text("", false);
        assert!(!doc.can_undo());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_set_cursor_respects_char_boundaries() {
        let mut doc = Document::new_from_file(PathBuf::from("a.md"), "é");
        doc.set_cursor(1);
        assert_eq!(doc.cursor(), 0);
    }
}
