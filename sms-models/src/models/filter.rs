//! Query filter accepted by `readSms`.

use serde::{Deserialize, Serialize};

use sms_core::constants::DEFAULT_MAX_COUNT;

/// Filters and cap applied to a message query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    /// Maximum number of records to return.
    #[serde(default = "default_max_count")]
    pub max_count: i64,
    /// Exact sender address to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Inclusive lower bound on the message date, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<i64>,
}

fn default_max_count() -> i64 {
    DEFAULT_MAX_COUNT
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            address: None,
            min_date: None,
        }
    }
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_count(mut self, max_count: i64) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_min_date(mut self, min_date: i64) -> Self {
        self.min_date = Some(min_date);
        self
    }

    /// Number of records the query may collect. Non-positive caps collect nothing.
    pub fn limit(&self) -> usize {
        usize::try_from(self.max_count.max(0)).unwrap_or(usize::MAX)
    }

    /// The address filter, ignoring an empty string.
    pub fn address_filter(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }
}
