//! Moodlog CLI - Personal mood journal
//!
//! Usage:
//!   moodlog add --moods happy,calm -i 7   Record today's mood
//!   moodlog add --moods calm --image p.jpg Record a mood with an analyzed photo
//!   moodlog list --search work            Browse the history
//!   moodlog insights                      Patterns, trends and streaks
//!   moodlog summary --range week          Summary report for a time range
//!   moodlog backup create                 Back up all entries

mod cli;
mod commands;


use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use moodlog_core::{EntryEdit, HistoryQuery, Period, SortOrder, TimeRange};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::App;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if matches!(cli.command, Commands::Catalog) {
        return commands::cmd_catalog();
    }

    let app = App::open(cli.data.as_deref())?;
    let journal = app.journal();
    let now = Utc::now();
    // Entry dates follow the user's calendar
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Add {
            moods,
            date,
            intensity,
            energy,
            sleep,
            reflection,
            triggers,
            image,
        } => {
            let args = commands::AddArgs {
                date,
                moods,
                intensity,
                energy,
                sleep,
                reflection,
                triggers,
                image,
            };
            commands::cmd_add(&journal, &app.analyzer(), &args, today, now)
                .await
                .map(|_| ())
        }
        Commands::List {
            search,
            period,
            sort,
            limit,
        } => {
            let query = HistoryQuery {
                search,
                period: period.parse::<Period>().map_err(anyhow::Error::msg)?,
                order: sort.parse::<SortOrder>().map_err(anyhow::Error::msg)?,
            };
            commands::cmd_list(&journal, &query, limit, today)
        }
        Commands::Edit {
            id,
            reflection,
            intensity,
            energy,
        } => {
            let edit = EntryEdit {
                reflection,
                intensity,
                energy,
            };
            commands::cmd_edit(&journal, &id, &edit)
        }
        Commands::Delete { id } => commands::cmd_delete(&journal, &id),
        Commands::Clear { yes } => commands::cmd_clear(&journal, yes),
        Commands::Insights { json } => {
            commands::cmd_insights(&journal, &app.config.insights, today, json)
        }
        Commands::Summary { range, json, out } => {
            let range = range
                .parse::<TimeRange>()
                .map_err(anyhow::Error::msg)
                .context("Use week, month, quarter or all")?;
            commands::cmd_summary(&journal, range, today, json, out.as_deref()).map(|_| ())
        }
        Commands::Analyze { image, json } => {
            commands::cmd_analyze(&app.analyzer(), &image, json).await
        }
        Commands::Export { format, out } => {
            commands::cmd_export(&journal, format, out.as_deref(), now)
        }
        Commands::Import { file } => commands::cmd_import(&journal, &file).map(|_| ()),
        Commands::Share { summary } => commands::cmd_share(&journal, summary, now),
        Commands::Validate => commands::cmd_validate(&journal).map(|_| ()),
        Commands::Repair { yes } => commands::cmd_repair(&journal, yes, now).map(|_| ()),
        Commands::Backup { action } => {
            let manager = app.backups();
            match action {
                BackupAction::Create => {
                    commands::cmd_backup_create(&journal, &manager, &app.config.settings, now)
                        .map(|_| ())
                }
                BackupAction::List => commands::cmd_backup_list(&manager),
                BackupAction::Restore { name, force } => {
                    commands::cmd_backup_restore(&journal, &manager, &name, force).map(|_| ())
                }
            }
        }
        Commands::Catalog => commands::cmd_catalog(),
    }
}
