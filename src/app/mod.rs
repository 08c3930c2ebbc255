//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Settings, Messages)
//! - `controllers/` - Orchestration (EditorSession, PreviewController, RenderScheduler)
//! - `services/` - Transformations (highlight, auto-pair, MDX, mermaid, rendering, export)
//! - `infrastructure/` - External integrations (errors, clocks, preview surfaces, PDF, logging)

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::editor::{EditorKey, EditorSession};
pub use controllers::preview::{PreviewController, RenderScheduler, RenderState, SchedulerState};
pub use domain::{AppSettings, Document, Message, TextEdit, ThemeMode};
pub use infrastructure::error::{AppError, Result};
pub use services::auto_pair::{EditResult, EditorView, on_key};
pub use services::highlight::{HighlightRule, Span, highlight};
pub use services::mdx::{looks_like_mdx, normalize};
pub use services::mermaid::extract_mermaid;
