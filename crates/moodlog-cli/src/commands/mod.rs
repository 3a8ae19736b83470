//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Image loading and mood analysis
//! - `backup` - Backup management commands (create, list, restore)
//! - `core` - Shared utilities (data dir, journal, confirmation) and the catalog
//! - `entries` - Entry commands (add, list, edit, delete, clear)
//! - `insights` - Insight and summary report commands
//! - `integrity` - Store validation and repair
//! - `transfer` - Export, import and share commands

pub mod analyze;
pub mod backup;
pub mod core;
pub mod entries;
pub mod insights;
pub mod integrity;
pub mod transfer;

// Re-export command functions for main.rs
pub use analyze::*;
pub use backup::*;
pub use self::core::*;
pub use entries::*;
pub use insights::*;
pub use integrity::*;
pub use transfer::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
