//! Wraps rendered HTML into a complete preview document.

use crate::app::domain::{AppSettings, ThemeMode};

pub const MATHJAX_SRC: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";
pub const MERMAID_SRC: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";

/// Banner shown above documents whose MDX source was rewritten for display.
pub const MDX_NOTE: &str = "MDX preview: import/export statements are hidden and components are shown as code.";

const DARK_CSS: &str = r#"
body { background: #000; color: #b6eaff; font-family: sans-serif; margin: 0; padding: 1.5em 2em; line-height: 1.6; }
a { color: #6ecbff; }
h1, h2, h3, h4, h5, h6 { color: #3ad7ff; }
strong { color: #a08cff; }
blockquote { border-left: 3px solid #8c8cff; color: #8c8cff; margin-left: 0; padding-left: 1em; }
code, pre { font-family: monospace; background: #0b0b16; color: #8afff7; border-radius: 4px; }
pre { padding: 0.8em 1em; overflow-x: auto; }
table { border-collapse: collapse; }
th, td { border: 1px solid #333; padding: 0.3em 0.7em; }
hr { border: none; border-top: 1px solid #444; }
mark { background: #fff799; color: #000; }
.mermaid { background: #111; border-radius: 8px; margin: 1em 0; padding: 1em; }
.mdx-note { background: #111133; border: 1px solid #a08cff; border-radius: 6px; color: #d1b1ff; margin-bottom: 1.5em; padding: 0.6em 1em; }
"#;

const LIGHT_CSS: &str = r#"
body { background: #fff; color: #1f2328; font-family: sans-serif; margin: 0; padding: 1.5em 2em; line-height: 1.6; }
a { color: #0969da; }
blockquote { border-left: 3px solid #d0d7de; color: #57606a; margin-left: 0; padding-left: 1em; }
code, pre { font-family: monospace; background: #f6f8fa; border-radius: 4px; }
pre { padding: 0.8em 1em; overflow-x: auto; }
table { border-collapse: collapse; }
th, td { border: 1px solid #d0d7de; padding: 0.3em 0.7em; }
hr { border: none; border-top: 1px solid #d0d7de; }
mark { background: #fff8c5; }
.mermaid { background: #f6f8fa; border-radius: 8px; margin: 1em 0; padding: 1em; }
.mdx-note { background: #ddf4ff; border: 1px solid #54aeff; border-radius: 6px; margin-bottom: 1.5em; padding: 0.6em 1em; }
"#;

const WELCOME_CSS: &str = r#"
.welcome { max-width: 720px; margin: 3em auto; text-align: center; }
.welcome h1 { font-size: 2.4em; margin-bottom: 0.2em; }
.tagline { opacity: 0.8; margin-bottom: 2em; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1em; text-align: left; }
.card { border: 1px solid #333; border-radius: 8px; padding: 1em; }
.card h3 { margin-top: 0; }
.shortcuts { margin-top: 2em; opacity: 0.8; }
kbd { border: 1px solid #555; border-radius: 3px; padding: 0 0.3em; font-family: monospace; }
"#;

const FEATURE_CARDS: [(&str, &str); 4] = [
    ("Live preview", "Markdown renders as you type, debounced so typing stays smooth."),
    ("MDX aware", "Imports and exports are hidden, components are shown as code."),
    ("Diagrams", "Fenced <code>mermaid</code> blocks become diagrams."),
    ("Math", "Inline <code>$E=mc^2$</code> and <code>$$</code> blocks via MathJax."),
];

const SHORTCUTS: [(&str, &str); 5] = [
    ("Ctrl+N", "New"),
    ("Ctrl+O", "Open"),
    ("Ctrl+S", "Save"),
    ("Ctrl+Shift+P", "Command palette"),
    ("/", "Insert syntax"),
];

/// What the preview shell embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
    pub theme: ThemeMode,
    pub mermaid: bool,
    pub math: bool,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            mermaid: true,
            math: true,
        }
    }
}

impl ShellOptions {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            theme: settings.theme_mode,
            mermaid: settings.mermaid_enabled,
            math: settings.math_enabled,
        }
    }
}

/// Assemble with the default dark shell.
pub fn assemble(inner_html: &str, is_empty: bool, mdx_note: Option<&str>) -> String {
    assemble_with(&ShellOptions::default(), inner_html, is_empty, mdx_note)
}

/// Build the full preview document. Blank input gets the welcome page.
pub fn assemble_with(
    options: &ShellOptions,
    inner_html: &str,
    is_empty: bool,
    mdx_note: Option<&str>,
) -> String {
    if is_empty {
        return welcome_page(options);
    }

    let banner = mdx_note
        .map(|note| format!("<div class=\"mdx-note\">{}</div>\n", escape_html(note)))
        .unwrap_or_default();

    page(
        options,
        "",
        &format!("<main class=\"markdown-body\">\n{banner}{inner_html}</main>"),
    )
}

/// Placeholder shown for a blank document.
pub fn welcome_page(options: &ShellOptions) -> String {
    let cards: String = FEATURE_CARDS
        .iter()
        .map(|(title, body)| format!("<div class=\"card\"><h3>{title}</h3><p>{body}</p></div>"))
        .collect();
    let shortcuts: String = SHORTCUTS
        .iter()
        .map(|(keys, action)| format!("<li><kbd>{keys}</kbd> {action}</li>"))
        .collect();

    let body = format!(
        "<section class=\"welcome\">\n\
         <h1>Simple-md</h1>\n\
         <p class=\"tagline\">A minimalist Markdown and MDX editor with live preview.</p>\n\
         <div class=\"cards\">{cards}</div>\n\
         <ul class=\"shortcuts\">{shortcuts}</ul>\n\
         </section>"
    );
    page(options, WELCOME_CSS, &body)
}

/// Minimal standalone document for printing. No scripts.
pub fn print_document(body_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{LIGHT_CSS}</style>\n</head>\n<body>\n{body_html}\n</body>\n</html>\n"
    )
}

fn page(options: &ShellOptions, extra_css: &str, body: &str) -> String {
    let css = match options.theme {
        ThemeMode::Dark => DARK_CSS,
        ThemeMode::Light => LIGHT_CSS,
    };
    let mermaid_theme = match options.theme {
        ThemeMode::Dark => "dark",
        ThemeMode::Light => "default",
    };

    let mut head = String::from("<meta charset=\"utf-8\">\n<title>Simple-md Preview</title>\n");
    head.push_str(&format!("<style>{css}{extra_css}</style>\n"));
    if options.math {
        head.push_str(
            "<script>window.MathJax = { tex: { inlineMath: [['$', '$'], ['\\\\(', '\\\\)']] } };</script>\n",
        );
        head.push_str(&format!(
            "<script type=\"text/javascript\" id=\"MathJax-script\" async src=\"{MATHJAX_SRC}\"></script>\n"
        ));
    }
    if options.mermaid {
        head.push_str(&format!(
            "<script type=\"module\">\n\
             import mermaid from '{MERMAID_SRC}';\n\
             mermaid.initialize({{ startOnLoad: true, theme: '{mermaid_theme}' }});\n\
             </script>\n"
        ));
    }

    format!("<!DOCTYPE html>\n<html>\n<head>\n{head}</head>\n<body>\n{body}\n</body>\n</html>\n")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
