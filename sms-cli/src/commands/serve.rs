//! JSON-lines bridge on stdin/stdout.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::BufReader;

use sms_bridge::Bridge;
use sms_core::config::ConfigHandle;
use sms_core::error::SmsResult;

pub async fn run(config: ConfigHandle, db: Option<PathBuf>) -> SmsResult<()> {
    let default_max_count = config.read().await.reader.default_max_count;
    let reader = super::open_reader(&config, db).await?;
    let bridge = Arc::new(Bridge::new(Arc::new(reader)).with_default_max_count(default_max_count));

    bridge
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
