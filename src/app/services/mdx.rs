//! MDX to Markdown normalization for preview.
//!
//! MDX mixes Markdown with `import`/`export` statements and JSX components.
//! A plain Markdown renderer would show the statements as prose and mangle
//! the components, so before rendering we:
//!
//! - drop `import`/`export` statements (including multi-line ones),
//! - rewrite `{/* comment */}` into `<!-- comment -->`,
//! - wrap every top-level component block in a `jsx` code fence.
//!
//! The pass is a left fold over lines with [`MdxBlockState`] as the
//! accumulator. It never fails: unbalanced input is closed off at the end.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::fence::{Fence, fence_longer_than_content};

static STATEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(import|export)\s").expect("valid statement regex"));

static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<([A-Z][A-Za-z0-9_.]*)").expect("valid component regex"));

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{/\*(.*?)\*/\}").expect("valid comment regex"));

pub const MDX_EXTENSION: &str = ".mdx";

/// Result of a normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// True iff `text` differs from the input.
    pub was_mdx: bool,
}

/// A component block whose closing tag has not been seen yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenComponent {
    pub tag: String,
    /// Nesting depth of same-named tags.
    pub depth: usize,
    /// False while the opening tag spans lines and its `>` is still ahead.
    pub opening_complete: bool,
}

/// Parse state threaded through the fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MdxBlockState {
    /// Author-written fence currently open.
    pub fence: Option<Fence>,
    pub component: Option<OpenComponent>,
    /// Unclosed brackets of an `import`/`export` statement being dropped.
    pub statement_depth: usize,
}

/// Lines produced by one step and the state to carry forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: MdxBlockState,
    pub emit: Vec<String>,
}

/// Heuristic: MDX file extension, an `import`/`export` line, or a line
/// opening a capitalized JSX-like tag.
pub fn looks_like_mdx(text: &str, filename_hint: Option<&str>) -> bool {
    if filename_hint.is_some_and(|name| name.to_lowercase().ends_with(MDX_EXTENSION)) {
        return true;
    }
    text.lines()
        .any(|line| STATEMENT_RE.is_match(line) || COMPONENT_RE.is_match(line))
}

/// Rewrite MDX into Markdown the generic renderer can display.
pub fn normalize(text: &str, filename_hint: Option<&str>) -> Normalized {
    if !looks_like_mdx(text, filename_hint) {
        return Normalized {
            text: text.to_string(),
            was_mdx: false,
        };
    }

    let jsx_fence = fence_longer_than_content(text);
    // A trailing newline stays after any fence closed off by `finish`.
    let (body, trailing_newline) = match text.strip_suffix('\n') {
        Some(body) => (body, true),
        None => (text, false),
    };
    let mut out: Vec<String> = Vec::new();
    let last = body.split('\n').fold(MdxBlockState::default(), |state, line| {
        let step = step(state, line, &jsx_fence);
        out.extend(step.emit);
        step.state
    });
    out.extend(finish(last, &jsx_fence));

    let mut normalized = out.join("\n");
    if trailing_newline {
        normalized.push('\n');
    }
    let was_mdx = normalized != text;
    Normalized {
        text: normalized,
        was_mdx,
    }
}

/// Process one line.
pub fn step(state: MdxBlockState, line: &str, jsx_fence: &str) -> Step {
    if state.statement_depth > 0 {
        // A blank line ends the statement even if its brackets never balanced.
        if line.trim().is_empty() {
            return Step {
                state: MdxBlockState {
                    statement_depth: 0,
                    ..state
                },
                emit: vec![line.to_string()],
            };
        }
        let statement_depth = bracket_balance(state.statement_depth, line);
        return Step {
            state: MdxBlockState {
                statement_depth,
                ..state
            },
            emit: Vec::new(),
        };
    }

    if let Some(fence) = &state.fence {
        let closed = fence.is_closed_by(line);
        return Step {
            state: MdxBlockState {
                fence: if closed { None } else { state.fence },
                ..state
            },
            emit: vec![line.to_string()],
        };
    }

    if let Some(component) = state.component.clone() {
        return step_in_component(component, line, jsx_fence);
    }

    if let Some(fence) = Fence::parse_opening(line) {
        return Step {
            state: MdxBlockState {
                fence: Some(fence),
                ..state
            },
            emit: vec![line.to_string()],
        };
    }

    if STATEMENT_RE.is_match(line) {
        return Step {
            state: MdxBlockState {
                statement_depth: bracket_balance(0, line),
                ..state
            },
            emit: Vec::new(),
        };
    }

    let line = COMMENT_RE.replace_all(line, "<!--$1-->").into_owned();

    let Some((tag, name_end)) = COMPONENT_RE
        .captures(&line)
        .and_then(|caps| caps.get(1))
        .map(|m| (m.as_str().to_string(), m.end()))
    else {
        return Step {
            state,
            emit: vec![line],
        };
    };

    let mut emit = vec![format!("{jsx_fence}jsx"), line.clone()];
    let component = match find_tag_end(&line[name_end..]) {
        None => Some(OpenComponent {
            tag,
            depth: 1,
            opening_complete: false,
        }),
        Some((_, true)) => None,
        Some((end, false)) => {
            let rest = &line[name_end + end..];
            let depth = adjust_depth(1, rest, &tag);
            (depth > 0).then_some(OpenComponent {
                tag,
                depth,
                opening_complete: true,
            })
        }
    };
    if component.is_none() {
        emit.push(jsx_fence.to_string());
    }

    Step {
        state: MdxBlockState { component, ..state },
        emit,
    }
}

fn step_in_component(component: OpenComponent, line: &str, jsx_fence: &str) -> Step {
    let mut emit = vec![line.to_string()];

    let still_open = if component.opening_complete {
        let depth = adjust_depth(component.depth, line, &component.tag);
        (depth > 0).then_some(OpenComponent {
            depth,
            ..component
        })
    } else {
        match find_tag_end(line) {
            None => Some(component),
            Some((_, true)) => None,
            Some((end, false)) => {
                let depth = adjust_depth(component.depth, &line[end..], &component.tag);
                (depth > 0).then_some(OpenComponent {
                    depth,
                    opening_complete: true,
                    ..component
                })
            }
        }
    };

    if still_open.is_none() {
        emit.push(jsx_fence.to_string());
    }

    Step {
        state: MdxBlockState {
            component: still_open,
            ..MdxBlockState::default()
        },
        emit,
    }
}

/// Close whatever is still open at end of input.
pub fn finish(state: MdxBlockState, jsx_fence: &str) -> Vec<String> {
    let mut emit = Vec::new();
    if state.component.is_some() {
        emit.push(jsx_fence.to_string());
    }
    if let Some(fence) = state.fence {
        emit.push(fence.marker.to_string().repeat(fence.len));
    }
    emit
}

/// Find the `>` ending the tag that `text` is inside of. Returns its byte
/// offset just past the `>` and whether the tag self-closes. Quoted strings
/// and `{...}` expressions are skipped.
fn find_tag_end(text: &str) -> Option<(usize, bool)> {
    let mut quote: Option<char> = None;
    let mut braces = 0usize;
    let mut prev = '\0';

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '{' => braces += 1,
                '}' => braces = braces.saturating_sub(1),
                '>' if braces == 0 => return Some((i + 1, prev == '/')),
                _ => {}
            },
        }
        prev = c;
    }
    None
}

/// Apply the opening and closing `tag` occurrences in `text` to `depth`.
fn adjust_depth(depth: usize, text: &str, tag: &str) -> usize {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = depth;
    let mut rest = text;

    while let Some(idx) = rest.find('<') {
        let candidate = &rest[idx..];
        if let Some(after) = candidate.strip_prefix(&close) {
            if after.starts_with(|c: char| c == '>' || c.is_whitespace()) {
                depth = depth.saturating_sub(1);
            }
        } else if let Some(after) = candidate.strip_prefix(&open) {
            let boundary = after.is_empty()
                || after.starts_with(|c: char| c == '>' || c == '/' || c.is_whitespace());
            if boundary && !matches!(find_tag_end(after), Some((_, true))) {
                depth += 1;
            }
        }
        rest = &rest[idx + 1..];
    }
    depth
}

/// Running count of unclosed `{`, `(` and `[` outside string literals.
fn bracket_balance(start: usize, line: &str) -> usize {
    let mut depth = start;
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '{' | '(' | '[' => depth += 1,
                '}' | ')' | ']' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    depth
}
