//! Platform detection and OS-specific utilities.

use std::path::PathBuf;
use crate::error::{SmsError, SmsResult};

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the current platform at compile time.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Whether the platform exposes an SMS inbox natively.
    pub fn has_native_sms_store(&self) -> bool {
        matches!(self, Platform::Android)
    }

    /// Get the platform-specific application data directory.
    ///
    /// - Linux: `~/.local/share/SmsReader`
    /// - macOS: `~/Library/Application Support/SmsReader`
    /// - Windows: `%APPDATA%/SmsReader`
    pub fn data_dir() -> SmsResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| SmsError::Config("could not determine data directory".into()))?;
        Ok(base.join(crate::constants::APP_NAME))
    }

    /// Get the platform-specific configuration directory.
    pub fn config_dir() -> SmsResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| SmsError::Config("could not determine config directory".into()))?;
        Ok(base.join(crate::constants::APP_NAME))
    }

    /// Get a human-readable platform name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
