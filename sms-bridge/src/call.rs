//! Wire types of the bridge.

use std::error::Error as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sms_core::error::{ErrorKind, SmsError};

/// One method invocation from the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginCall {
    /// Caller-chosen correlation id, echoed back unchanged.
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub options: Value,
}

/// Why a call was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub message: String,
    pub code: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl From<&SmsError> for Rejection {
    fn from(err: &SmsError) -> Self {
        Self {
            message: err.to_string(),
            code: err.kind(),
            cause: err.source().map(|s| s.to_string()),
        }
    }
}

/// The answer to one call: resolved with `data` or rejected with `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginResponse {
    pub id: Value,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Rejection>,
}

impl PluginResponse {
    pub fn resolve(id: Value, data: Value) -> Self {
        Self {
            id,
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn reject(id: Value, rejection: Rejection) -> Self {
        Self {
            id,
            ok: false,
            data: None,
            error: Some(rejection),
        }
    }
}
