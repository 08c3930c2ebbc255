//! The render pass: MDX normalization, mermaid extraction, Markdown
//! conversion and document assembly, in that order.

use tracing::debug;

use super::assembler::{self, MDX_NOTE, ShellOptions};
use super::markdown::render_markdown;
use super::mdx;
use super::mermaid::extract_mermaid;

/// Output of one full render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub html: String,
    pub was_mdx: bool,
    pub is_empty: bool,
}

/// Render `text` into a complete preview document.
pub fn render_document(text: &str, filename_hint: Option<&str>, options: &ShellOptions) -> RenderOutput {
    let normalized = mdx::normalize(text, filename_hint);
    let prepared = if options.mermaid {
        extract_mermaid(&normalized.text)
    } else {
        normalized.text
    };

    let is_empty = prepared.trim().is_empty();
    let inner = if is_empty {
        String::new()
    } else {
        render_markdown(&prepared)
    };
    let note = normalized.was_mdx.then_some(MDX_NOTE);
    let html = assembler::assemble_with(options, &inner, is_empty, note);

    debug!(
        input_bytes = text.len(),
        html_bytes = html.len(),
        was_mdx = normalized.was_mdx,
        is_empty,
        "render pass"
    );
    RenderOutput {
        html,
        was_mdx: normalized.was_mdx,
        is_empty,
    }
}

/// Normalized and rendered body without the preview shell, as used by the
/// HTML and PDF exports.
pub fn render_body(text: &str, filename_hint: Option<&str>) -> String {
    render_markdown(&mdx::normalize(text, filename_hint).text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_renders_welcome() {
        let out = render_document("  \n\n", None, &ShellOptions::default());
        assert!(out.is_empty);
        assert!(out.html.contains("class=\"welcome\""));
        assert!(!out.html.contains("<main"));
    }

    #[test]
    fn test_only_imports_counts_as_empty() {
        let out = render_document("import A from 'a'\n", None, &ShellOptions::default());
        assert!(out.is_empty);
        assert!(out.was_mdx);
    }

    #[test]
    fn test_mdx_gets_banner_and_fenced_component() {
        let out = render_document(
            "import Foo from 'bar'\n\n# Hi\n\n<Foo prop=\"1\" />\n",
            None,
            &ShellOptions::default(),
        );
        assert!(out.was_mdx);
        assert!(out.html.contains("class=\"mdx-note\""));
        assert!(out.html.contains("<h1>Hi</h1>"));
        assert!(out.html.contains("language-jsx"));
        assert!(out.html.contains("&lt;Foo prop="));
        assert!(!out.html.contains("import Foo"));
    }

    #[test]
    fn test_mermaid_container_survives_markdown() {
        let out = render_document(
            "# D\n\n```mermaid\ngraph TD\n  A --> B\n```\n",
            None,
            &ShellOptions::default(),
        );
        assert!(out.html.contains("<div class=\"mermaid\">graph TD\n  A --> B</div>"));
        assert!(!out.was_mdx);
        assert!(!out.html.contains("class=\"mdx-note\""));
    }

    #[test]
    fn test_mermaid_disabled_keeps_code_block() {
        let options = ShellOptions {
            mermaid: false,
            ..ShellOptions::default()
        };
        let out = render_document("```mermaid\ngraph TD\n```\n", None, &options);
        assert!(out.html.contains("language-mermaid"));
    }

    #[test]
    fn test_render_body_has_no_shell() {
        let body = render_body("import X from 'x'\n# T\n", Some("t.mdx"));
        assert_eq!(body.trim(), "<h1>T</h1>");
    }
}
