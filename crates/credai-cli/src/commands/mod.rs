//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (settings loading, input acquisition)
//! - `check` - AI backend connection test
//! - `prompts` - Prompt library management commands
//! - `reports` - Analysis and AI report commands

pub mod check;
pub mod core;
pub mod prompts;
pub mod reports;

// Re-export command functions for main.rs
pub use check::*;
pub use core::*;
pub use prompts::*;
pub use reports::*;

/// Truncate a string to `max` characters, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
