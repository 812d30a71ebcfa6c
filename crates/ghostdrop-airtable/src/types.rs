use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of the base metadata endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseSchema {
    pub tables: Vec<TableSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Option<FieldTypeOptions>,
}

impl FieldSchema {
    pub const SINGLE_SELECT: &'static str = "singleSelect";
    pub const MULTIPLE_SELECTS: &'static str = "multipleSelects";

    /// Single- or multiple-choice field.
    pub fn is_enumerated(&self) -> bool {
        self.kind == Self::SINGLE_SELECT || self.kind == Self::MULTIPLE_SELECTS
    }

    /// Choice names in schema order. Empty when the field carries no choices.
    pub fn choice_names(&self) -> Vec<String> {
        self.options
            .as_ref()
            .map(|o| o.choices.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldTypeOptions {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Filter and limit for a record listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub filter_by_formula: Option<String>,
    pub max_records: Option<usize>,
}

/// One page of a record listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordList {
    pub records: Vec<RecordRef>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRef {
    pub id: String,
    #[serde(default, rename = "createdTime")]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Raw answer to a write. The status is reported, never enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `records[0].id` of a creation response, if present.
    pub fn first_record_id(&self) -> Option<&str> {
        self.body
            .get("records")?
            .get(0)?
            .get("id")?
            .as_str()
            .filter(|id| !id.is_empty())
    }
}
