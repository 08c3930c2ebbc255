//! Services layer - pure transformations and file operations.
//!
//! - Highlight rules and auto-pairing for the editor
//! - MDX normalization, mermaid extraction and Markdown rendering
//! - Preview document assembly and the render pass
//! - Snippet catalogues, persistence and export

pub mod assembler;
pub mod auto_pair;
pub mod export;
pub mod fence;
pub mod file_io;
pub mod highlight;
pub mod markdown;
pub mod mdx;
pub mod mermaid;
pub mod pipeline;
pub mod snippets;
pub mod text_ops;
