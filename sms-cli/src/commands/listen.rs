//! Incoming-message listening commands.

use clap::Subcommand;

use sms_core::config::ConfigHandle;
use sms_core::error::SmsResult;
use sms_services::SmsReader;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ListenAction {
    /// Start listening for incoming messages.
    Start,
    /// Stop listening.
    Stop,
}

pub async fn run(config: ConfigHandle, action: ListenAction, format: OutputFormat) -> SmsResult<()> {
    let reader = super::open_reader(&config, None).await?;
    let data = match action {
        ListenAction::Start => serde_json::to_value(reader.start_listening().await?)?,
        ListenAction::Stop => serde_json::to_value(reader.stop_listening().await?)?,
    };

    match format {
        OutputFormat::Json => println!("{data}"),
        OutputFormat::Text => {
            for (key, value) in data.as_object().into_iter().flatten() {
                println!("{key}: {value}");
            }
        }
    }
    Ok(())
}
