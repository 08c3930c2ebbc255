//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Error types
//! - Clocks for the render scheduler
//! - Preview surfaces and the headless-browser PDF backend
//! - Host collaborators (file dialogs, notifications)
//! - Logging setup

pub mod clock;
pub mod dialogs;
pub mod error;
pub mod logging;
pub mod pdf;
pub mod preview_surface;
