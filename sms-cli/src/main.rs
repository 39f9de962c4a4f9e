//! SMS Reader CLI - read a device SMS inbox from the terminal.
//!
//! Wraps the same permission-gated reader the application uses, so the
//! terminal sees exactly what a web caller would: permission checks, capped
//! and filtered inbox reads, the listening stubs, and the JSON-lines bridge.

mod commands;
mod gate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use sms_core::config::{AppConfig, ConfigHandle};
use sms_core::error::SmsResult;
use sms_core::logging;

/// SmsReader - read received SMS messages.
#[derive(Parser)]
#[command(
    name = "sms-reader",
    version,
    about = "Read received SMS messages from a device message store",
    long_about = "A command-line interface for the SmsReader plugin.\n\
                  Reads the inbox of an Android mmssms.db, gated on the user's consent."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Read inbox messages, newest first.
    Read {
        /// Message store to read (overrides config).
        #[arg(long)]
        db: Option<PathBuf>,
        /// Maximum number of messages to return.
        #[arg(short = 'n', long = "max-count")]
        max_count: Option<i64>,
        /// Only messages from this exact sender address.
        #[arg(short, long)]
        address: Option<String>,
        /// Only messages on or after this date (YYYY-MM-DD, RFC 3339, or epoch ms).
        #[arg(short, long)]
        since: Option<String>,
    },
    /// Check, request, or revoke read permission.
    Permission {
        #[command(subcommand)]
        action: commands::permission::PermissionAction,
    },
    /// Incoming-message listening.
    Listen {
        #[command(subcommand)]
        action: commands::listen::ListenAction,
    },
    /// Inspect the message store.
    Store {
        /// Message store to inspect (overrides config).
        #[arg(long, global = true)]
        db: Option<PathBuf>,
        #[command(subcommand)]
        action: commands::store::StoreAction,
    },
    /// Serve plugin calls as JSON lines on stdin/stdout.
    Serve {
        /// Message store to read (overrides config).
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> SmsResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_config_path()?,
    };
    let config = if config_path.exists() {
        AppConfig::load_from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let log_dir = config.effective_log_dir()?;
    let _guard = logging::init_logging(&log_level, &log_dir, config.logging.json_output)?;

    let config_handle = ConfigHandle::with_path(config, config_path);

    info!("SmsReader CLI v{}", sms_core::constants::APP_VERSION);

    // Dispatch to command handlers
    match cli.command {
        Commands::Read { db, max_count, address, since } => {
            commands::read::run(config_handle, db, max_count, address, since, cli.format).await
        }
        Commands::Permission { action } => {
            commands::permission::run(config_handle, action, cli.format).await
        }
        Commands::Listen { action } => {
            commands::listen::run(config_handle, action, cli.format).await
        }
        Commands::Store { db, action } => {
            commands::store::run(config_handle, db, action, cli.format).await
        }
        Commands::Serve { db } => commands::serve::run(config_handle, db).await,
    }
}
