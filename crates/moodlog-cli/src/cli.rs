//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Moodlog - A private mood journal
#[derive(Parser)]
#[command(name = "moodlog")]
#[command(about = "Personal mood journal with image mood analysis and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (entries, config.toml, backups)
    ///
    /// Defaults to $MOODLOG_DATA_DIR, or the platform data directory.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new mood entry
    Add {
        /// Moods felt (comma-separated catalog labels, e.g. happy,calm)
        #[arg(short, long, value_delimiter = ',')]
        moods: Vec<String>,

        /// Entry date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Mood intensity (1-10)
        #[arg(short, long, default_value = "5")]
        intensity: u8,

        /// Energy level (1-5)
        #[arg(short, long, default_value = "3")]
        energy: u8,

        /// Sleep quality (1-5)
        #[arg(short, long)]
        sleep: Option<u8>,

        /// Free-text reflection
        #[arg(short, long)]
        reflection: Option<String>,

        /// Triggers (comma-separated, e.g. Work/Career,Exercise)
        #[arg(short, long, value_delimiter = ',')]
        triggers: Vec<String>,

        /// Attach an image and analyze its mood
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Browse the entry history
    List {
        /// Search reflections, moods, triggers and image insights
        #[arg(short, long)]
        search: Option<String>,

        /// Period: all, today, week, month
        #[arg(short, long, default_value = "all")]
        period: String,

        /// Sort order: newest, oldest
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Edit an entry's reflection, intensity or energy
    Edit {
        /// Entry ID
        id: String,

        /// New reflection
        #[arg(short, long)]
        reflection: Option<String>,

        /// New intensity (1-10)
        #[arg(short, long)]
        intensity: Option<u8>,

        /// New energy level (1-5)
        #[arg(short, long)]
        energy: Option<u8>,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },

    /// Delete all entries
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show patterns, trends, streaks and recommendations
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a summary report for a time range
    Summary {
        /// Range: week, month, quarter, all
        #[arg(short, long, default_value = "month")]
        range: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Write the JSON report into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Analyze the mood of an image without saving an entry
    Analyze {
        /// Image file (jpg, png, gif, webp)
        image: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export entries
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import entries from an export file (one entry per date is kept)
    Import {
        /// JSON export file
        file: PathBuf,
    },

    /// Print a share payload of recent entries
    Share {
        /// Compact summary of the last few entries, sized for a QR code
        #[arg(long)]
        summary: bool,
    },

    /// Check the entry store for corrupted data
    Validate,

    /// Repair corrupted entries, filling in defaults
    Repair {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Backup management
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Show the mood and trigger catalogs
    Catalog,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum BackupAction {
    /// Create a new backup
    Create,

    /// List available backups
    List,

    /// Restore entries from a backup
    Restore {
        /// Backup name (use 'latest' for most recent)
        name: String,

        /// Overwrite existing entries without prompting
        #[arg(short, long)]
        force: bool,
    },
}
