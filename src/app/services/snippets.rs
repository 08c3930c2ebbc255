//! Snippet catalogues and the list models behind the snippet popup, the
//! Markdown palette and the command palette.

use crate::app::domain::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    pub label: &'static str,
    pub text: &'static str,
}

const fn snippet(label: &'static str, text: &'static str) -> Snippet {
    Snippet { label, text }
}

pub const SYNTAX_SNIPPETS: [Snippet; 14] = [
    snippet("Heading 1", "# "),
    snippet("Heading 2", "## "),
    snippet("Heading 3", "### "),
    snippet("Heading 4", "#### "),
    snippet("Heading 5", "##### "),
    snippet("Heading 6", "###### "),
    snippet("Bold", "**bold text**"),
    snippet("Italic", "*italic text*"),
    snippet("Link", "[text](url)"),
    snippet("Image", "![alt text](image-url)"),
    snippet("Unordered List", "* item"),
    snippet("Ordered List", "1. item"),
    snippet("Code Block", "```\ncode\n```"),
    snippet("Blockquote", "> quote"),
];

pub const WIKILINK_SNIPPETS: [Snippet; 3] = [
    snippet("Home", "[[Home]]"),
    snippet("About", "[[About]]"),
    snippet("Reference", "[[Reference]]"),
];

pub const TAG_SNIPPETS: [Snippet; 3] = [
    snippet("todo", "#todo"),
    snippet("important", "#important"),
    snippet("idea", "#idea"),
];

pub const MARKDOWN_PALETTE: [Snippet; 23] = [
    snippet("Heading 1", "# H1"),
    snippet("Heading 2", "## H2"),
    snippet("Heading 3", "### H3"),
    snippet("Bold", "**bold text**"),
    snippet("Italic", "*italicized text*"),
    snippet("Blockquote", "> blockquote"),
    snippet("Ordered List", "1. First item\n2. Second item\n3. Third item"),
    snippet("Unordered List", "- First item\n- Second item\n- Third item"),
    snippet("Inline Code", "`code`"),
    snippet("Horizontal Rule", "---"),
    snippet("Link", "[title](https://www.example.com)"),
    snippet("Image", "![alt text](image.jpg)"),
    snippet(
        "Table",
        "| Syntax | Description |\n| ----------- | ----------- |\n| Header | Title |\n| Paragraph | Text |",
    ),
    snippet("Fenced Code Block", "```\ncode\n```"),
    snippet(
        "Footnote",
        "Here's a sentence with a footnote. [^1]\n\n[^1]: This is the footnote.",
    ),
    snippet("Heading ID", "### My Great Heading {#custom-id}"),
    snippet("Definition List", "term\n: definition"),
    snippet("Strikethrough", "~~The world is flat.~~"),
    snippet(
        "Task List",
        "- [x] Write the press release\n- [ ] Update the website\n- [ ] Contact the media",
    ),
    snippet("Emoji", "That is so funny! :joy:"),
    snippet("Highlight", "I need to highlight these ==very important words==."),
    snippet("Subscript", "H~2~O"),
    snippet("Superscript", "X^2^"),
];

/// Anything a filterable list can show.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for Snippet {
    fn label(&self) -> &str {
        self.label
    }
}

impl Labeled for Message {
    fn label(&self) -> &str {
        Message::label(self)
    }
}

/// Case-insensitive substring filter over labels, keeping catalogue order.
pub fn filter_items<'a, T: Labeled>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.label().to_lowercase().contains(&query))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTrigger {
    Syntax,
    WikiLink,
    Tag,
}

impl PopupTrigger {
    /// Text the user typed to open the popup.
    pub fn text(&self) -> &'static str {
        match self {
            PopupTrigger::Syntax => "/",
            PopupTrigger::WikiLink => "[[",
            PopupTrigger::Tag => "#",
        }
    }

    pub fn items(&self) -> &'static [Snippet] {
        match self {
            PopupTrigger::Syntax => &SYNTAX_SNIPPETS,
            PopupTrigger::WikiLink => &WIKILINK_SNIPPETS,
            PopupTrigger::Tag => &TAG_SNIPPETS,
        }
    }
}

/// In-editor completion popup. Navigation wraps around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetPopup {
    pub trigger: PopupTrigger,
    filter: String,
    filtered: Vec<&'static Snippet>,
    selected: usize,
}

impl SnippetPopup {
    pub fn open(trigger: PopupTrigger) -> Self {
        Self {
            trigger,
            filter: String::new(),
            filtered: filter_items(trigger.items(), ""),
            selected: 0,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn items(&self) -> &[&'static Snippet] {
        &self.filtered
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.refilter();
    }

    /// Drop the last filter character. Returns false when the filter was
    /// already empty, meaning the popup should close.
    pub fn pop_filter(&mut self) -> bool {
        if self.filter.pop().is_none() {
            return false;
        }
        self.refilter();
        true
    }

    pub fn select_next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + self.filtered.len() - 1) % self.filtered.len();
        }
    }

    pub fn selected(&self) -> Option<&'static Snippet> {
        self.filtered.get(self.selected).copied()
    }

    fn refilter(&mut self) {
        self.filtered = filter_items(self.trigger.items(), &self.filter);
        self.selected = 0;
    }
}

/// Modal palette list. Navigation clamps at the ends.
#[derive(Debug, Clone)]
pub struct Palette<T: 'static> {
    items: &'static [T],
    query: String,
    filtered: Vec<&'static T>,
    selected: usize,
}

pub type CommandPalette = Palette<Message>;
pub type MarkdownPalette = Palette<Snippet>;

impl CommandPalette {
    pub fn commands() -> Self {
        Palette::new(&Message::PALETTE)
    }
}

impl MarkdownPalette {
    pub fn markdown() -> Self {
        Palette::new(&MARKDOWN_PALETTE)
    }
}

impl<T: Labeled + 'static> Palette<T> {
    pub fn new(items: &'static [T]) -> Self {
        Self {
            items,
            query: String::new(),
            filtered: filter_items(items, ""),
            selected: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.filtered = filter_items(self.items, query);
        self.selected = 0;
    }

    pub fn visible(&self) -> &[&'static T] {
        &self.filtered
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.filtered.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&'static T> {
        self.filtered.get(self.selected).copied()
    }
}
