use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a record-creation request: `{ "records": [ { "fields": {...} } ] }`.
///
/// Keys the proxy does not know about (`typecast`, per-record extras) are kept
/// and forwarded as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub records: Vec<Record>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Submission {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Drops every record after the first. Returns how many were dropped.
    pub fn keep_first(&mut self) -> usize {
        let dropped = self.records.len().saturating_sub(1);
        self.records.truncate(1);
        dropped
    }

    pub fn first_mut(&mut self) -> Option<&mut Record> {
        self.records.first_mut()
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
