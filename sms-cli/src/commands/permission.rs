//! Permission commands.

use clap::Subcommand;
use console::style;

use sms_core::config::ConfigHandle;
use sms_core::error::SmsResult;
use sms_services::{PermissionStatus, SmsReader};

use crate::gate::TerminalPermissionGate;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum PermissionAction {
    /// Show whether reading is authorized.
    Check,
    /// Ask for read access.
    Request,
    /// Withdraw a previous grant.
    Revoke,
}

pub async fn run(config: ConfigHandle, action: PermissionAction, format: OutputFormat) -> SmsResult<()> {
    let status = match action {
        PermissionAction::Check => super::open_reader(&config, None).await?.check_permission().await?,
        PermissionAction::Request => {
            super::open_reader(&config, None).await?.request_permission().await?
        }
        PermissionAction::Revoke => {
            TerminalPermissionGate::new(config.clone()).await.revoke().await?;
            PermissionStatus { granted: false }
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&status)?),
        OutputFormat::Text => {
            if status.granted {
                println!("{} SMS read permission granted", style("✓").green());
            } else {
                println!("{} SMS read permission not granted", style("✗").red());
            }
        }
    }
    Ok(())
}
