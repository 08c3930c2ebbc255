//! Fenced code block markers (```` ``` ```` and `~~~`).
//!
//! Shared by the MDX normalizer and the mermaid preprocessor so both agree
//! on what counts as "inside a fence".

/// An opening fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub marker: char,
    pub len: usize,
    pub info: String,
}

impl Fence {
    /// Parse `line` as an opening fence: up to three spaces of indentation,
    /// three or more backticks or tildes, then an info string. Backtick fences
    /// may not carry backticks in their info string.
    pub fn parse_opening(line: &str) -> Option<Self> {
        let body = strip_fence_indent(line)?;
        let marker = body.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = body.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }
        let info = body[len..].trim();
        if marker == '`' && info.contains('`') {
            return None;
        }
        Some(Self {
            marker,
            len,
            info: info.to_string(),
        })
    }

    /// Whether `line` closes this fence: same marker, at least as long, nothing after.
    pub fn is_closed_by(&self, line: &str) -> bool {
        let Some(body) = strip_fence_indent(line) else {
            return false;
        };
        let body = body.trim_end();
        let run = body.chars().take_while(|c| *c == self.marker).count();
        run >= self.len && run * self.marker.len_utf8() == body.len()
    }

    /// First word of the info string, e.g. `mermaid` for ```` ```mermaid {theme} ````.
    pub fn language(&self) -> &str {
        self.info.split_whitespace().next().unwrap_or("")
    }
}

/// Strip the indentation a fence line may carry. Four or more spaces make
/// the line an indented code block instead.
fn strip_fence_indent(line: &str) -> Option<&str> {
    let body = line.trim_start_matches(' ');
    (line.len() - body.len() <= 3).then_some(body)
}

/// Longest run of consecutive backticks anywhere in `text`.
pub fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// A backtick fence long enough that nothing inside `text` can close it early.
pub fn fence_longer_than_content(text: &str) -> String {
    "`".repeat((longest_backtick_run(text) + 1).max(3))
}

/// True when every fence opened in `text` is closed again.
pub fn fences_balanced(text: &str) -> bool {
    let mut open: Option<Fence> = None;
    for line in text.lines() {
        match &open {
            Some(fence) => {
                if fence.is_closed_by(line) {
                    open = None;
                }
            }
            None => open = Fence::parse_opening(line),
        }
    }
    open.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_opening_with_language() {
        let fence = Fence::parse_opening("```mermaid").unwrap();
        assert_eq!(fence.marker, '`');
        assert_eq!(fence.len, 3);
        assert_eq!(fence.language(), "mermaid");
    }

    #[test]
    fn test_parse_opening_tilde_and_indent() {
        let fence = Fence::parse_opening("  ~~~~ rust title=x").unwrap();
        assert_eq!(fence.marker, '~');
        assert_eq!(fence.len, 4);
        assert_eq!(fence.language(), "rust");
    }

    #[test]
    fn test_not_a_fence() {
        assert!(Fence::parse_opening("``not").is_none());
        assert!(Fence::parse_opening("```a`b").is_none());
        assert!(Fence::parse_opening("text ```").is_none());
    }

    #[test]
    fn test_closing_rules() {
        let fence = Fence::parse_opening("````js").unwrap();
        assert!(!fence.is_closed_by("```"));
        assert!(fence.is_closed_by("````"));
        assert!(fence.is_closed_by("  `````  "));
        assert!(!fence.is_closed_by("```` js"));
        assert!(!fence.is_closed_by("~~~~"));
    }

    #[test]
    fn test_four_space_indent_is_not_a_fence() {
        assert!(Fence::parse_opening("   ```js").is_some());
        assert!(Fence::parse_opening("    ```js").is_none());
        assert!(Fence::parse_opening("\t```").is_none());

        let fence = Fence::parse_opening("```").unwrap();
        assert!(fence.is_closed_by("   ```"));
        assert!(!fence.is_closed_by("    ```"));
        assert!(fences_balanced("    ```\nindented code"));
    }

    #[test]
    fn test_longer_fence() {
        assert_eq!(fence_longer_than_content("no ticks"), "```");
        assert_eq!(fence_longer_than_content("use ```js here"), "````");
    }

    #[test]
    fn test_fences_balanced() {
        assert!(fences_balanced("a\n```\ncode\n```\nb"));
        assert!(!fences_balanced("a\n```\ncode"));
        assert!(fences_balanced("````\n```\n````"));
    }
}
