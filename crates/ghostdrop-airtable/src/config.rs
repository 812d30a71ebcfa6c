use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_BASE_ID: &str = "app39rqq10aRiXVcB";

/// Connection settings for one Airtable base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirtableConfig {
    pub base_id: String,
    #[serde(skip_serializing)]
    pub api_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Global per-call timeout. `None` waits on the upstream indefinitely.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl AirtableConfig {
    pub fn new(base_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            api_token: api_token.into(),
            api_url: default_api_url(),
            timeout: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{api}/meta/bases/{base}/tables`
    pub fn tables_url(&self) -> String {
        format!("{}/meta/bases/{}/tables", self.api_url, self.base_id)
    }

    /// `{api}/{base}/{table}`
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.api_url, self.base_id, table)
    }
}
