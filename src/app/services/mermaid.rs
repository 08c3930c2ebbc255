//! Mermaid fence extraction.
//!
//! ```` ```mermaid ```` blocks become `<div class="mermaid">` containers
//! that survive Markdown conversion as raw HTML; the mermaid script in the
//! preview picks them up client-side.

use super::fence::Fence;

const MERMAID_LANGUAGE: &str = "mermaid";

/// Replace every terminated mermaid fence in `text` with a diagram container.
/// Other fences, including their contents, are copied unchanged.
pub fn extract_mermaid(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let Some(fence) = Fence::parse_opening(lines[i]) else {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        };

        let close = lines[i + 1..]
            .iter()
            .position(|line| fence.is_closed_by(line))
            .map(|offset| i + 1 + offset);

        match close {
            Some(end) if fence.language().eq_ignore_ascii_case(MERMAID_LANGUAGE) => {
                out.push(diagram_container(&lines[i + 1..end]));
                out.push(String::new());
                i = end + 1;
            }
            Some(end) => {
                out.extend(lines[i..=end].iter().map(|line| line.to_string()));
                i = end + 1;
            }
            None => {
                // Unterminated: the rest of the input is the fence body.
                out.extend(lines[i..].iter().map(|line| line.to_string()));
                break;
            }
        }
    }

    out.join("\n")
}

/// Blank lines would end the HTML block early, so they are dropped.
fn diagram_container(body: &[&str]) -> String {
    let inner = body
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| escape_container_text(line))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<div class=\"mermaid\">{inner}</div>")
}

/// Only `&` and `<` can break out of the container; `>` must stay literal
/// because mermaid arrows (`-->`) are read from the element's text.
fn escape_container_text(line: &str) -> String {
    line.replace('&', "&amp;").replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block_inner_text_is_exact() {
        let out = extract_mermaid("```mermaid\ngraph TD\n  A --> B\n```");
        assert_eq!(out, "<div class=\"mermaid\">graph TD\n  A --> B</div>\n");
        assert_eq!(out.matches("class=\"mermaid\"").count(), 1);
    }

    #[test]
    fn test_surrounding_text_kept() {
        let out = extract_mermaid("Before\n\n```mermaid\npie\n```\nAfter\n");
        assert_eq!(out, "Before\n\n<div class=\"mermaid\">pie</div>\n\nAfter\n");
    }

    #[test]
    fn test_non_mermaid_fences_untouched() {
        let text = "```rust\nfn main() {}\n```\n~~~\nplain\n~~~";
        assert_eq!(extract_mermaid(text), text);
    }

    #[test]
    fn test_mermaid_inside_other_fence_untouched() {
        let text = "````md\n```mermaid\ngraph LR\n```\n````";
        assert_eq!(extract_mermaid(text), text);
    }

    #[test]
    fn test_indented_code_block_is_not_a_fence() {
        let text = "Example:\n\n    ```mermaid\n    graph TD\n    ```";
        assert_eq!(extract_mermaid(text), text);
    }

    #[test]
    fn test_unterminated_mermaid_left_alone() {
        let text = "```mermaid\ngraph TD\n  A --> B";
        assert_eq!(extract_mermaid(text), text);
    }

    #[test]
    fn test_blank_lines_dropped_and_markup_escaped() {
        let out = extract_mermaid("~~~mermaid\nflowchart\n\n  A[\"a<b & c\"] --> B\n~~~");
        assert_eq!(
            out,
            "<div class=\"mermaid\">flowchart\n  A[\"a&lt;b &amp; c\"] --> B</div>\n"
        );
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let once = extract_mermaid("# T\n```mermaid\nsequenceDiagram\n```\n```js\nx\n```");
        assert_eq!(extract_mermaid(&once), once);
    }

    #[test]
    fn test_multiple_blocks() {
        let out = extract_mermaid("```mermaid\na\n```\ntext\n```mermaid\nb\n```");
        assert_eq!(
            out,
            "<div class=\"mermaid\">a</div>\n\ntext\n<div class=\"mermaid\">b</div>\n"
        );
    }
}
