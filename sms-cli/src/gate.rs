//! Terminal-backed permission gate.
//!
//! Consent is asked for on the terminal and remembered in the config file,
//! so a grant survives between invocations until `permission revoke`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dialoguer::Confirm;
use tracing::info;

use sms_core::config::ConfigHandle;
use sms_core::error::{SmsError, SmsResult};
use sms_services::PermissionGate;

/// Asks the user a yes/no question. Runs on a blocking thread.
pub type Prompt = fn(&str) -> SmsResult<bool>;

pub struct TerminalPermissionGate {
    config: ConfigHandle,
    alias: String,
    granted: AtomicBool,
    prompt: Prompt,
}

impl TerminalPermissionGate {
    pub async fn new(config: ConfigHandle) -> Self {
        Self::with_prompt(config, confirm_on_terminal).await
    }

    pub async fn with_prompt(config: ConfigHandle, prompt: Prompt) -> Self {
        let (alias, granted) = {
            let cfg = config.read().await;
            (cfg.permission.alias.clone(), cfg.permission.granted)
        };
        Self {
            config,
            alias,
            granted: AtomicBool::new(granted),
            prompt,
        }
    }

    /// Forget a previous grant and persist that.
    pub async fn revoke(&self) -> SmsResult<()> {
        self.granted.store(false, Ordering::SeqCst);
        self.persist(false).await
    }

    async fn persist(&self, granted: bool) -> SmsResult<()> {
        self.config.write().await.permission.granted = granted;
        self.config.save().await
    }
}

#[async_trait]
impl PermissionGate for TerminalPermissionGate {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn is_authorized(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_authorization(&self) -> SmsResult<()> {
        let question = format!("Allow SmsReader to read your SMS inbox ({})?", self.alias);
        let prompt = self.prompt;
        let granted = tokio::task::spawn_blocking(move || prompt(&question))
            .await
            .map_err(|e| SmsError::Internal(format!("permission prompt failed: {e}")))??;

        info!(alias = %self.alias, granted, "permission prompt answered");
        self.granted.store(granted, Ordering::SeqCst);
        self.persist(granted).await
    }
}

fn confirm_on_terminal(question: &str) -> SmsResult<bool> {
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(|e| SmsError::Internal(format!("cannot prompt on this terminal: {e}")))
}
