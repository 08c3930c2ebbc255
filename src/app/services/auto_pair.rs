//! Smart insertion for single keystrokes.
//!
//! A keystroke is first classified into an [`EditIntent`] from the pressed
//! character and the surrounding text, then turned into a concrete
//! [`TextEdit`]. Both steps are pure; the caller applies the edit.

use std::ops::Range;

use crate::app::domain::{Document, TextEdit};
use crate::app::services::text_ops::{char_after, char_before, clamp_to_char_boundary, line_prefix};

/// Opening characters and their closers.
pub const PAIRS: [(char, char); 6] = [
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
];

const MERMAID_OPEN: &str = "```mermaid\n";
const FENCE_CLOSE: &str = "\n```";
const MATH_DELIMITER: &str = "$$";

pub fn closing_for(open: char) -> Option<char> {
    PAIRS.iter().find(|(o, _)| *o == open).map(|(_, c)| *c)
}

/// Read-only view of the editor the engine decides from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView<'a> {
    pub text: &'a str,
    pub cursor: usize,
    pub selection: Option<Range<usize>>,
}

impl<'a> EditorView<'a> {
    /// Positions are clamped into `text` and onto char boundaries.
    pub fn new(text: &'a str, cursor: usize, selection: Option<Range<usize>>) -> Self {
        let selection = selection
            .map(|r| clamp_to_char_boundary(text, r.start)..clamp_to_char_boundary(text, r.end))
            .filter(|r| r.start < r.end);
        Self {
            text,
            cursor: clamp_to_char_boundary(text, cursor),
            selection,
        }
    }

    pub fn of(doc: &'a Document) -> Self {
        Self::new(doc.text(), doc.cursor(), doc.selection())
    }

    /// Where typed text would go: the selection start, else the cursor.
    fn anchor(&self) -> usize {
        self.selection.as_ref().map_or(self.cursor, |r| r.start)
    }

    fn replaced(&self) -> Range<usize> {
        self.selection.clone().unwrap_or(self.cursor..self.cursor)
    }

    fn selected(&self) -> &'a str {
        let text: &'a str = self.text;
        self.selection.as_ref().map_or("", |r| &text[r.clone()])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditIntent {
    ExpandFence,
    InsertMath,
    WrapSelection { open: char, close: char },
    InsertPair { open: char, close: char },
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Handled(TextEdit),
    PassThrough,
}

/// Decide what a keystroke should do. Rules are checked in order.
pub fn classify(key: char, view: &EditorView) -> EditIntent {
    let anchor = view.anchor();

    if key == '`' && line_prefix(view.text, anchor).trim().is_empty() {
        return EditIntent::ExpandFence;
    }

    if key == '$' && char_before(view.text, anchor) == Some('$') {
        return EditIntent::InsertMath;
    }

    let Some(close) = closing_for(key) else {
        return EditIntent::PassThrough;
    };

    if view.selection.is_some() {
        EditIntent::WrapSelection { open: key, close }
    } else if char_after(view.text, view.cursor) == Some(close) {
        EditIntent::PassThrough
    } else {
        EditIntent::InsertPair { open: key, close }
    }
}

/// Turn an intent into the edit that realises it.
pub fn plan(intent: EditIntent, view: &EditorView) -> EditResult {
    let range = view.replaced();
    let selected = view.selected();

    let edit = match intent {
        EditIntent::PassThrough => return EditResult::PassThrough,
        EditIntent::ExpandFence => {
            let text = format!("{MERMAID_OPEN}{selected}{FENCE_CLOSE}");
            let cursor = if selected.is_empty() {
                range.start + MERMAID_OPEN.len()
            } else {
                range.start + text.len()
            };
            TextEdit {
                range,
                text,
                cursor,
                selection: None,
            }
        }
        EditIntent::InsertMath => {
            // The first `$` is already in the buffer; it becomes part of the span.
            let start = range.start.saturating_sub('$'.len_utf8());
            let range = start..range.end;
            if selected.is_empty() {
                TextEdit {
                    range,
                    text: format!("{MATH_DELIMITER}  {MATH_DELIMITER}"),
                    cursor: start + MATH_DELIMITER.len() + 1,
                    selection: None,
                }
            } else {
                let inner = start + MATH_DELIMITER.len();
                TextEdit {
                    range,
                    text: format!("{MATH_DELIMITER}{selected}{MATH_DELIMITER}"),
                    cursor: inner + selected.len(),
                    selection: Some(inner..inner + selected.len()),
                }
            }
        }
        EditIntent::WrapSelection { open, close } => {
            let inner = range.start + open.len_utf8();
            TextEdit {
                range,
                text: format!("{open}{selected}{close}"),
                cursor: inner + selected.len(),
                selection: Some(inner..inner + selected.len()),
            }
        }
        EditIntent::InsertPair { open, close } => TextEdit {
            cursor: range.start + open.len_utf8(),
            range,
            text: format!("{open}{close}"),
            selection: None,
        },
    };
    EditResult::Handled(edit)
}

/// Classify and plan in one step.
pub fn on_key(key: char, view: &EditorView) -> EditResult {
    plan(classify(key, view), view)
}
