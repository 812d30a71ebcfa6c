use ghostdrop_airtable::{AirtableClient, AirtableError, RecordList, RecordQuery, Reply, TableSchema};
use serde_json::Value;

/// The record-storage service the proxy validates against and writes to.
///
/// `AirtableClient` is the production implementation. Calls block; the server
/// runs each request on the blocking pool.
pub trait Upstream: Send + Sync {
    fn list_tables(&self) -> Result<Vec<TableSchema>, AirtableError>;

    fn list_records(&self, table: &str, query: &RecordQuery) -> Result<RecordList, AirtableError>;

    fn create_records(&self, table: &str, body: &Value) -> Result<Reply, AirtableError>;
}

impl Upstream for AirtableClient {
    fn list_tables(&self) -> Result<Vec<TableSchema>, AirtableError> {
        AirtableClient::list_tables(self)
    }

    fn list_records(&self, table: &str, query: &RecordQuery) -> Result<RecordList, AirtableError> {
        AirtableClient::list_records(self, table, query)
    }

    fn create_records(&self, table: &str, body: &Value) -> Result<Reply, AirtableError> {
        AirtableClient::create_records(self, table, body)
    }
}
