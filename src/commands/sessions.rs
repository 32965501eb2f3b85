//! Session inspection commands
//!
//! Reads the same database the server writes, so these commands should
//! not be run against a live server instance (the embedded store takes
//! an exclusive lock on the directory).

use crate::cli::SessionCommand;
use crate::config::Config;
use crate::error::Result;
use crate::store::SessionStore;
use chrono::DateTime;
use colored::Colorize;
use prettytable::{format, Table};

/// Format a millisecond epoch timestamp for terminal output
fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Handle sessions commands
pub async fn handle_sessions(config: Config, command: SessionCommand) -> Result<()> {
    let db_path = config.storage.resolve_path()?;
    let store = SessionStore::open(&db_path)?;

    match command {
        SessionCommand::List => {
            let ids = store.session_ids()?;

            if ids.is_empty() {
                println!("{}", "No review sessions found.".yellow());
                return Ok(());
            }

            let mut rows = Vec::new();
            for id in ids {
                let meta = store.get_metadata(&id).await?;
                rows.push((id, meta));
            }
            // Most recently touched first
            rows.sort_by(|a, b| b.1.last_accessed_at.cmp(&a.1.last_accessed_at));

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "Session".bold(),
                "Reviews".bold(),
                "Created".bold(),
                "Last Accessed".bold()
            ]);

            for (id, meta) in rows {
                table.add_row(prettytable::row![
                    id.cyan(),
                    meta.review_count,
                    format_millis(meta.created_at),
                    format_millis(meta.last_accessed_at)
                ]);
            }

            println!("\nReview Sessions:");
            table.printstd();
            println!();
            println!(
                "Use {} to print a session's history.",
                "reviewd sessions show <ID>".cyan()
            );
            println!();
        }
        SessionCommand::Show { id } => {
            let reviews = store.get_reviews(&id).await?;

            if reviews.is_empty() {
                println!("{}", format!("No reviews stored for session {}", id).yellow());
                return Ok(());
            }

            for (i, entry) in reviews.iter().enumerate() {
                println!(
                    "{} {} [{}] {}",
                    format!("#{}", i + 1).bold(),
                    entry.id.cyan(),
                    entry.language,
                    format_millis(entry.timestamp)
                );
                if let Some(context) = &entry.context {
                    println!("  context: {}", context);
                }
                println!("{}\n", entry.review);
            }
        }
        SessionCommand::Clear { id } => {
            store.clear_reviews(&id).await?;
            println!("{}", format!("Cleared session {}", id).green());
        }
    }

    Ok(())
}
