//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document, its edit type and undo history
//! - Application settings
//! - Message types for the command palette and menus

pub mod document;
pub mod messages;
pub mod settings;

pub use document::{Document, TextEdit};
pub use messages::Message;
pub use settings::{AppSettings, ThemeMode};
