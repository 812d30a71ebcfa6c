use serde::de::DeserializeOwned;
use serde_json::Value;
use ureq::Agent;
use ureq::http::Response;

use crate::config::AirtableConfig;
use crate::types::{BaseSchema, RecordList, RecordQuery, Reply, TableSchema};

#[derive(Debug, thiserror::Error)]
pub enum AirtableError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<ureq::Error> for AirtableError {
    fn from(e: ureq::Error) -> Self {
        AirtableError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for AirtableError {
    fn from(e: serde_json::Error) -> Self {
        AirtableError::Decode(e.to_string())
    }
}

/// Blocking client for one Airtable base.
///
/// The agent never turns a non-2xx status into an error on its own. Each call
/// decides what a status means: reads enforce success, writes report the
/// status alongside the body and leave the verdict to the caller.
pub struct AirtableClient {
    config: AirtableConfig,
    agent: Agent,
}

impl AirtableClient {
    pub fn new(config: AirtableConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .into();
        Self { config, agent }
    }

    pub fn config(&self) -> &AirtableConfig {
        &self.config
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_token)
    }

    /// Every table of the base with its field definitions.
    pub fn list_tables(&self) -> Result<Vec<TableSchema>, AirtableError> {
        let url = self.config.tables_url();
        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .header("Content-Type", "application/json")
            .call()?;
        let schema: BaseSchema = read_success(response)?;
        Ok(schema.tables)
    }

    /// First page of records in `table` matching `query`.
    pub fn list_records(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<RecordList, AirtableError> {
        let url = self.config.table_url(table);
        let mut request = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .header("Content-Type", "application/json");
        if let Some(formula) = &query.filter_by_formula {
            request = request.query("filterByFormula", formula);
        }
        if let Some(max) = query.max_records {
            request = request.query("maxRecords", max.to_string());
        }
        read_success(request.call()?)
    }

    /// POSTs `body` to `table`. Any status comes back as a `Reply`.
    pub fn create_records(&self, table: &str, body: &Value) -> Result<Reply, AirtableError> {
        let url = self.config.table_url(table);
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .send_json(body)?;
        let status = response.status().as_u16();
        let text = read_text(response)?;
        let body = serde_json::from_str(&text)?;
        tracing::debug!(table, status, "create records");
        Ok(Reply { status, body })
    }
}

fn read_text(mut response: Response<ureq::Body>) -> Result<String, AirtableError> {
    Ok(response.body_mut().read_to_string()?)
}

fn read_success<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, AirtableError> {
    let status = response.status();
    let text = read_text(response)?;
    if !status.is_success() {
        return Err(AirtableError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(serde_json::from_str(&text)?)
}
