use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream, html};
use regex_lite::Regex;

static HIGHLIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=]+)==").expect("valid highlight regex"));

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Render Markdown text to an HTML fragment (no document shell).
///
/// `==text==` outside code becomes `<mark>text</mark>`.
pub fn render_markdown(text: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(text, parser_options()));

    let mut in_code_block = false;
    let mut events: Vec<Event> = Vec::new();
    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(event);
            }
            Event::Text(text) if !in_code_block && HIGHLIGHT_RE.is_match(&text) => {
                push_highlighted(&mut events, &text);
            }
            other => events.push(other),
        }
    }

    let mut html_output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

fn push_highlighted<'a>(events: &mut Vec<Event<'a>>, text: &str) {
    let mut last = 0;
    for caps in HIGHLIGHT_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            events.push(Event::Text(CowStr::from(text[last..whole.start()].to_string())));
        }
        events.push(Event::InlineHtml(CowStr::Borrowed("<mark>")));
        events.push(Event::Text(CowStr::from(inner.as_str().to_string())));
        events.push(Event::InlineHtml(CowStr::Borrowed("</mark>")));
        last = whole.end();
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = render_markdown("# Title\n\nSome **bold** text");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_tables_and_strikethrough() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_task_lists_and_footnotes() {
        let html = render_markdown("- [x] done\n- [ ] todo\n\nNote[^1]\n\n[^1]: The note.");
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("checked"));
        assert!(html.contains("footnote"));
    }

    #[test]
    fn test_heading_attributes() {
        let html = render_markdown("### Custom {#custom-id}");
        assert!(html.contains("id=\"custom-id\""));
    }

    #[test]
    fn test_highlight_span() {
        let html = render_markdown("a ==marked== b ==two==");
        assert!(html.contains("a <mark>marked</mark> b <mark>two</mark>"));
    }

    #[test]
    fn test_highlight_not_applied_in_code() {
        let html = render_markdown("`==x==`\n\n```\n==y==\n```");
        assert!(!html.contains("<mark>"));
        assert!(html.contains("<code>==x==</code>"));
        assert!(html.contains("==y=="));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render_markdown("<div class=\"mermaid\">graph TD\n  A --> B</div>\n");
        assert!(html.contains("<div class=\"mermaid\">graph TD\n  A --> B</div>"));
    }
}
