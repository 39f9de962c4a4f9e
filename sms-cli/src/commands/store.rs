//! Message store inspection commands.

use std::path::PathBuf;

use clap::Subcommand;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use console::style;

use sms_core::config::ConfigHandle;
use sms_core::error::SmsResult;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum StoreAction {
    /// Show message counts.
    Stats,
    /// Check that the store has the expected table and columns.
    Verify,
    /// Show the message store path.
    Path,
}

pub async fn run(
    config: ConfigHandle,
    db: Option<PathBuf>,
    action: StoreAction,
    format: OutputFormat,
) -> SmsResult<()> {
    match action {
        StoreAction::Stats => {
            let store = super::open_store(&config, db).await?;
            let stats = store.stats()?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({
                        "path": store.path().display().to_string(),
                        "stats": stats,
                    }));
                }
                OutputFormat::Text => {
                    let mut table = Table::new();
                    table
                        .load_preset(UTF8_FULL)
                        .apply_modifier(UTF8_ROUND_CORNERS)
                        .set_header(vec!["Metric", "Value"]);
                    table.add_row(vec!["Messages".to_string(), stats.total.to_string()]);
                    table.add_row(vec!["Inbox".to_string(), stats.inbox.to_string()]);
                    table.add_row(vec!["Unread inbox".to_string(), stats.unread_inbox.to_string()]);
                    table.add_row(vec![
                        "Newest inbox message".to_string(),
                        stats
                            .newest_inbox_date
                            .map(super::format_date)
                            .unwrap_or_else(|| "-".into()),
                    ]);

                    println!("{}", style(store.path().display()).bold());
                    println!("{table}");
                }
            }
        }
        StoreAction::Verify => {
            let store = super::open_store(&config, db).await?;
            store.verify()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "ok": true })),
                OutputFormat::Text => {
                    println!("{} {} looks like an SMS store", style("✓").green(), store.path().display())
                }
            }
        }
        StoreAction::Path => {
            let path = super::store_path(&config, db).await?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "path": path.display().to_string(), "exists": path.exists() })
                ),
                OutputFormat::Text => println!("{}", path.display()),
            }
        }
    }
    Ok(())
}
