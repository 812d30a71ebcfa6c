#![allow(dead_code)]

use std::sync::Mutex;

use ghostdrop_airtable::{AirtableError, RecordList, RecordQuery, RecordRef, Reply, TableSchema};
use ghostdrop_proxy::{Upstream, eq_formula};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListTables,
    ListRecords { table: String, query: RecordQuery },
    Create { table: String, body: Value },
}

/// In-memory stand-in for the record store. Categories are looked up by
/// formula and created on demand; every call is recorded.
pub struct FakeUpstream {
    tables: Vec<TableSchema>,
    metadata_status: Option<u16>,
    category_reply: Option<Reply>,
    forward_reply: Option<Reply>,
    unreachable: bool,
    categories: Mutex<Vec<(String, String)>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self {
            tables: default_tables(),
            metadata_status: None,
            category_reply: None,
            forward_reply: None,
            unreachable: false,
            categories: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_category(self, name: &str, id: &str) -> Self {
        self.categories
            .lock()
            .unwrap()
            .push((name.to_string(), id.to_string()));
        self
    }

    /// Metadata endpoint answers with `status`.
    pub fn with_metadata_status(mut self, status: u16) -> Self {
        self.metadata_status = Some(status);
        self
    }

    /// Category creation answers with `reply` instead of a new record.
    pub fn with_category_reply(mut self, reply: Reply) -> Self {
        self.category_reply = Some(reply);
        self
    }

    /// Forwarded creations answer with `reply` instead of echoing the records.
    pub fn with_forward_reply(mut self, reply: Reply) -> Self {
        self.forward_reply = Some(reply);
        self
    }

    /// Every call fails at the transport level.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates_to(&self, table: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { table: t, body } if t == table => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn category_ids(&self) -> Vec<(String, String)> {
        self.categories.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), AirtableError> {
        self.calls.lock().unwrap().push(call);
        if self.unreachable {
            return Err(AirtableError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

impl Upstream for FakeUpstream {
    fn list_tables(&self) -> Result<Vec<TableSchema>, AirtableError> {
        self.record(Call::ListTables)?;
        if let Some(status) = self.metadata_status {
            return Err(AirtableError::Status {
                status,
                body: r#"{"error":{"type":"INVALID_PERMISSIONS"}}"#.into(),
            });
        }
        Ok(self.tables.clone())
    }

    fn list_records(&self, table: &str, query: &RecordQuery) -> Result<RecordList, AirtableError> {
        self.record(Call::ListRecords {
            table: table.to_string(),
            query: query.clone(),
        })?;
        let records = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| {
                query.filter_by_formula.as_deref() == Some(eq_formula("Name", name).as_str())
            })
            .take(query.max_records.unwrap_or(usize::MAX))
            .map(|(name, id)| RecordRef {
                id: id.clone(),
                created_time: None,
                fields: json!({ "Name": name }).as_object().cloned().unwrap_or_default(),
            })
            .collect();
        Ok(RecordList {
            records,
            offset: None,
        })
    }

    fn create_records(&self, table: &str, body: &Value) -> Result<Reply, AirtableError> {
        self.record(Call::Create {
            table: table.to_string(),
            body: body.clone(),
        })?;

        if table == "Categories" {
            if let Some(reply) = &self.category_reply {
                return Ok(reply.clone());
            }
            let name = body["records"][0]["fields"]["Name"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let mut categories = self.categories.lock().unwrap();
            let id = format!("recCAT{}", categories.len() + 1);
            categories.push((name.clone(), id.clone()));
            return Ok(Reply {
                status: 200,
                body: json!({ "records": [{ "id": id, "fields": { "Name": name } }] }),
            });
        }

        if let Some(reply) = &self.forward_reply {
            return Ok(reply.clone());
        }
        let records: Vec<Value> = body["records"]
            .as_array()
            .map(|records| {
                records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| {
                        json!({
                            "id": format!("recNEW{}", i + 1),
                            "createdTime": "2024-05-01T12:00:00.000Z",
                            "fields": r["fields"].clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Reply {
            status: 200,
            body: json!({ "records": records }),
        })
    }
}

fn default_tables() -> Vec<TableSchema> {
    serde_json::from_value(json!([
        {
            "name": "Products",
            "fields": [
                { "name": "Name", "type": "singleLineText" },
                { "name": "Category", "type": "multipleRecordLinks" },
                { "name": "Status", "type": "singleSelect",
                  "options": { "choices": [{ "name": "Active" }, { "name": "Discontinued" }] } },
                { "name": "Tags", "type": "multipleSelects",
                  "options": { "choices": [{ "name": "Vegan" }, { "name": "Organic" }, { "name": "Local" }] } }
            ]
        },
        {
            "name": "Categories",
            "fields": [{ "name": "Name", "type": "singleLineText" }]
        },
        {
            "name": "Clients",
            "fields": [
                { "name": "Name", "type": "singleLineText" },
                { "name": "Tier", "type": "singleSelect",
                  "options": { "choices": [{ "name": "Gold" }, { "name": "Silver" }] } }
            ]
        },
        {
            "name": "Follow-Ups",
            "fields": [
                { "name": "Status", "type": "singleSelect",
                  "options": { "choices": [{ "name": "Open" }, { "name": "Done" }] } }
            ]
        }
    ]))
    .unwrap()
}

pub fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}
