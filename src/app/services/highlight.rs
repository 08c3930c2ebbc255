//! Line-oriented Markdown syntax highlighting.
//!
//! An ordered table of (rule, patterns) is run over one line at a time.
//! Rules never block each other; when spans overlap the later rule wins,
//! because styles are written into the style buffer in table order.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Style character for unstyled text in a style buffer.
pub const PLAIN_STYLE: char = 'A';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightRule {
    Heading,
    Bold,
    Italic,
    InlineCode,
    Blockquote,
    ListItem,
    Link,
    Image,
    Strikethrough,
    HorizontalRule,
    FootnoteDefinition,
    TaskCheckbox,
    HighlightSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Formatting applied to a highlighted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub monospace: bool,
}

impl TextStyle {
    const fn color(color: Rgb) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            monospace: false,
        }
    }
}

/// One highlighted range of a line, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
    pub rule: HighlightRule,
}

impl HighlightRule {
    /// Evaluation order. Later entries override earlier ones on overlap.
    pub const ALL: [HighlightRule; 13] = [
        HighlightRule::Heading,
        HighlightRule::Bold,
        HighlightRule::Italic,
        HighlightRule::InlineCode,
        HighlightRule::Blockquote,
        HighlightRule::ListItem,
        HighlightRule::Link,
        HighlightRule::Image,
        HighlightRule::Strikethrough,
        HighlightRule::HorizontalRule,
        HighlightRule::FootnoteDefinition,
        HighlightRule::TaskCheckbox,
        HighlightRule::HighlightSpan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HighlightRule::Heading => "heading",
            HighlightRule::Bold => "bold",
            HighlightRule::Italic => "italic",
            HighlightRule::InlineCode => "code",
            HighlightRule::Blockquote => "blockquote",
            HighlightRule::ListItem => "list",
            HighlightRule::Link => "link",
            HighlightRule::Image => "image",
            HighlightRule::Strikethrough => "strikethrough",
            HighlightRule::HorizontalRule => "hr",
            HighlightRule::FootnoteDefinition => "footnote",
            HighlightRule::TaskCheckbox => "task",
            HighlightRule::HighlightSpan => "highlight",
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        match self {
            HighlightRule::Heading => &[r"^(#{1,6})\s.*"],
            HighlightRule::Bold => &[r"\*\*[^\*]+\*\*", r"__[^_]+__"],
            HighlightRule::Italic => &[r"\*[^\*]+\*", r"_[^_]+_"],
            HighlightRule::InlineCode => &[r"`[^`]+`"],
            HighlightRule::Blockquote => &[r"^>.*"],
            HighlightRule::ListItem => &[r"^(\s*[-+*]|\s*\d+\.)\s"],
            HighlightRule::Link => &[r"\[[^\]]+\]\([^\)]+\)"],
            HighlightRule::Image => &[r"!\[[^\]]*\]\([^\)]+\)"],
            HighlightRule::Strikethrough => &[r"~~[^~]+~~"],
            HighlightRule::HorizontalRule => &[r"^---+$"],
            HighlightRule::FootnoteDefinition => &[r"^\[\^.+\]:.*"],
            HighlightRule::TaskCheckbox => &[r"- \[[ xX]\] "],
            HighlightRule::HighlightSpan => &[r"==[^=]+=="],
        }
    }

    pub fn style(&self) -> TextStyle {
        match self {
            HighlightRule::Heading => TextStyle {
                bold: true,
                ..TextStyle::color(Rgb(0x3a, 0xd7, 0xff))
            },
            HighlightRule::Bold => TextStyle {
                bold: true,
                ..TextStyle::color(Rgb(0xa0, 0x8c, 0xff))
            },
            HighlightRule::Italic => TextStyle {
                italic: true,
                ..TextStyle::color(Rgb(0xb6, 0xea, 0xff))
            },
            HighlightRule::InlineCode => TextStyle {
                monospace: true,
                ..TextStyle::color(Rgb(0x8a, 0xff, 0xf7))
            },
            HighlightRule::Blockquote => TextStyle::color(Rgb(0x8c, 0x8c, 0xff)),
            HighlightRule::ListItem => TextStyle::color(Rgb(0x7f, 0xff, 0xd4)),
            HighlightRule::Link => TextStyle {
                underline: true,
                ..TextStyle::color(Rgb(0x6e, 0xcb, 0xff))
            },
            HighlightRule::Image => TextStyle::color(Rgb(0x8c, 0xff, 0xa0)),
            HighlightRule::Strikethrough => TextStyle {
                strikeout: true,
                ..TextStyle::color(Rgb(0xb0, 0xb0, 0xb0))
            },
            HighlightRule::HorizontalRule => TextStyle::color(Rgb(0x44, 0x44, 0x44)),
            HighlightRule::FootnoteDefinition => TextStyle::color(Rgb(0xff, 0xb8, 0x6b)),
            HighlightRule::TaskCheckbox => TextStyle::color(Rgb(0xb6, 0xea, 0xff)),
            HighlightRule::HighlightSpan => TextStyle::color(Rgb(0xff, 0xf7, 0x99)),
        }
    }

    /// Style-buffer character: `B` for the first rule, `C` for the next, ...
    pub fn style_char(&self) -> char {
        let idx = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        (b'B' + idx as u8) as char
    }
}

static RULES: LazyLock<Vec<(HighlightRule, Vec<Regex>)>> = LazyLock::new(|| {
    HighlightRule::ALL
        .iter()
        .map(|rule| {
            let regexes = rule
                .patterns()
                .iter()
                .map(|p| Regex::new(p).expect("valid highlight pattern"))
                .collect();
            (*rule, regexes)
        })
        .collect()
});

/// All spans for `line`, grouped by rule in evaluation order. A trailing
/// `\r` from CRLF text is ignored.
pub fn highlight(line: &str) -> Vec<Span> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return Vec::new();
    }
    RULES
        .iter()
        .flat_map(|(rule, regexes)| {
            regexes.iter().flat_map(move |re| {
                re.find_iter(line).map(move |m| Span {
                    start: m.start(),
                    len: m.len(),
                    rule: *rule,
                })
            })
        })
        .filter(|span| span.len > 0)
        .collect()
}

/// One style character per byte of `line`; later spans overwrite earlier ones.
pub fn style_line(line: &str) -> String {
    let mut styles = vec![PLAIN_STYLE as u8; line.len()];
    for span in highlight(line) {
        let ch = span.rule.style_char() as u8;
        styles[span.start..span.start + span.len].fill(ch);
    }
    String::from_utf8(styles).unwrap_or_default()
}

/// Style buffer for a whole text, line by line. Newlines stay plain.
pub fn style_text(text: &str) -> String {
    text.split('\n')
        .map(style_line)
        .collect::<Vec<_>>()
        .join(&PLAIN_STYLE.to_string())
}

/// Spans for every line as `(line_index, span)` pairs.
pub fn highlight_text(text: &str) -> Vec<(usize, Span)> {
    text.split('\n')
        .enumerate()
        .flat_map(|(n, line)| highlight(line).into_iter().map(move |s| (n, s)))
        .collect()
}

/// The style table indexed by style character, `A` first.
pub fn style_table() -> Vec<(char, Option<TextStyle>)> {
    std::iter::once((PLAIN_STYLE, None))
        .chain(
            HighlightRule::ALL
                .iter()
                .map(|rule| (rule.style_char(), Some(rule.style()))),
        )
        .collect()
}
