//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the host UI:
//! - Debounced preview rendering
//! - Editor session (keystrokes, popups, commands)

pub mod editor;
pub mod preview;
