//! Method dispatch and the JSON-lines transport.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use sms_core::constants::{methods, DEFAULT_MAX_COUNT};
use sms_core::error::{SmsError, SmsResult};
use sms_services::SmsReader;

use crate::call::{PluginCall, PluginResponse, Rejection};
use crate::commands;

/// Routes plugin calls to a reader.
pub struct Bridge {
    reader: Arc<dyn SmsReader>,
    default_max_count: i64,
}

impl Bridge {
    pub fn new(reader: Arc<dyn SmsReader>) -> Self {
        Self {
            reader,
            default_max_count: DEFAULT_MAX_COUNT,
        }
    }

    /// Override the `maxCount` used when a `readSms` call omits it.
    pub fn with_default_max_count(mut self, max_count: i64) -> Self {
        self.default_max_count = max_count;
        self
    }

    /// Answer one call.
    pub async fn handle(&self, call: PluginCall) -> PluginResponse {
        debug!(method = %call.method, "plugin call");
        let reader = self.reader.as_ref();
        let result = match call.method.as_str() {
            methods::CHECK_PERMISSION => to_data(commands::check_permission(reader).await),
            methods::REQUEST_PERMISSION => to_data(commands::request_permission(reader).await),
            methods::READ_SMS => {
                to_data(commands::read_sms(reader, &call.options, self.default_max_count).await)
            }
            methods::START_LISTENING => to_data(commands::start_listening(reader).await),
            methods::STOP_LISTENING => to_data(commands::stop_listening(reader).await),
            other => Err(SmsError::UnknownMethod(other.to_string())),
        };

        match result {
            Ok(data) => PluginResponse::resolve(call.id, data),
            Err(e) => {
                warn!(method = %call.method, code = %e.kind(), "call rejected: {e}");
                PluginResponse::reject(call.id, Rejection::from(&e))
            }
        }
    }

    /// Answer one JSON-encoded call with a JSON-encoded response.
    pub async fn handle_line(&self, line: &str) -> String {
        match serde_json::from_str::<PluginCall>(line) {
            Ok(call) => encode(&self.handle(call).await),
            Err(e) => malformed(format!("malformed call: {e}")),
        }
    }

    /// Serve JSON-lines calls from `input`, writing one response line per call.
    ///
    /// Calls run concurrently, so a pending permission prompt does not hold
    /// up other calls; responses are written as they complete and carry the
    /// caller's id. A line that is not UTF-8 or not a call is answered with
    /// an `INVALID_ARGUMENT` rejection and a null id. Returns once the input
    /// ends and every accepted call has been answered; a read error stops
    /// accepting calls and is returned after that.
    pub async fn serve<R, W>(self: Arc<Self>, mut input: R, mut output: W) -> SmsResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("bridge serving");
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut tx = Some(tx);
        let mut buf = Vec::new();
        let mut read_error = None;

        loop {
            tokio::select! {
                read = input.read_until(b'\n', &mut buf), if tx.is_some() => {
                    match read {
                        Ok(0) => tx = None,
                        Ok(_) => {
                            let raw = std::mem::take(&mut buf);
                            if let Some(tx) = &tx {
                                self.accept(raw, tx.clone());
                            }
                        }
                        Err(e) => {
                            error!("bridge input failed: {e}");
                            read_error = Some(e);
                            tx = None;
                        }
                    }
                }
                response = rx.recv() => {
                    let Some(response) = response else { break };
                    output.write_all(response.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                    output.flush().await?;
                }
            }
        }

        info!("bridge input closed");
        match read_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Start answering one raw input line; the response goes to `tx`.
    fn accept(self: &Arc<Self>, raw: Vec<u8>, tx: mpsc::UnboundedSender<String>) {
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                warn!("rejecting non UTF-8 input line");
                let _ = tx.send(malformed(format!("call is not valid UTF-8: {e}")));
                return;
            }
        };
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return;
        }

        let line = line.to_string();
        let bridge = self.clone();
        tokio::spawn(async move {
            let _ = tx.send(bridge.handle_line(&line).await);
        });
    }
}

/// Rejection for input that is not a call at all.
fn malformed(reason: String) -> String {
    encode(&PluginResponse::reject(
        Value::Null,
        Rejection::from(&SmsError::InvalidArgument(reason)),
    ))
}

fn encode(response: &PluginResponse) -> String {
    // Serializing plain JSON values cannot fail.
    serde_json::to_string(response).unwrap_or_default()
}

fn to_data<T: Serialize>(result: SmsResult<T>) -> SmsResult<Value> {
    result.and_then(|data| serde_json::to_value(data).map_err(SmsError::from))
}
