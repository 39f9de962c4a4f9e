//! Inbox reads.

use std::path::PathBuf;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;

use sms_core::config::ConfigHandle;
use sms_core::error::SmsResult;
use sms_models::QueryFilter;
use sms_services::{MessageList, SmsReader};

use crate::OutputFormat;

pub async fn run(
    config: ConfigHandle,
    db: Option<PathBuf>,
    max_count: Option<i64>,
    address: Option<String>,
    since: Option<String>,
    format: OutputFormat,
) -> SmsResult<()> {
    let default_max_count = config.read().await.reader.default_max_count;
    let filter = QueryFilter {
        max_count: max_count.unwrap_or(default_max_count),
        address,
        min_date: since.as_deref().map(super::parse_since).transpose()?,
    };

    let reader = super::open_reader(&config, db).await?;
    let list = reader.read_sms(filter).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        OutputFormat::Text => print_table(&list),
    }
    Ok(())
}

fn print_table(list: &MessageList) {
    if list.messages.is_empty() {
        println!("{}", style("No messages found.").dim());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "From", "Date", "Read", "Message"]);

    for message in &list.messages {
        table.add_row(vec![
            message.id.clone(),
            message.address.clone().unwrap_or_else(|| "-".into()),
            super::format_date(message.date),
            if message.read { "yes" } else { "no" }.to_string(),
            super::truncate(message.body.as_deref().unwrap_or(""), 60),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        style(format!("{} message(s)", list.messages.len())).dim()
    );
}
