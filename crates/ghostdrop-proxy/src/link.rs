use ghostdrop_airtable::RecordQuery;
use serde_json::{Map, Value, json};

use crate::error::ProxyError;
use crate::upstream::Upstream;

/// A record field that holds a link into another table, submitted by display
/// name and forwarded as `[id]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedField {
    pub field: &'static str,
    pub table: &'static str,
    pub display_field: &'static str,
}

impl LinkedField {
    /// Rewrites `fields[self.field]` from a name to `[id]`, finding or creating
    /// the linked record. Absent, empty and non-string values are left alone.
    /// Returns the resolved id.
    pub fn resolve<U: Upstream + ?Sized>(
        &self,
        upstream: &U,
        fields: &mut Map<String, Value>,
    ) -> Result<Option<String>, ProxyError> {
        let name = match fields.get(self.field) {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return Ok(None),
        };

        let id = ensure_linked_record(upstream, self, &name)?;
        fields.insert(self.field.to_string(), json!([id]));
        Ok(Some(id))
    }
}

/// Returns the id of the record in `link.table` whose display field equals
/// `name`, creating the record if none exists.
///
/// Not idempotent: two concurrent calls for the same new name can both miss
/// and both create.
pub fn ensure_linked_record<U: Upstream + ?Sized>(
    upstream: &U,
    link: &LinkedField,
    name: &str,
) -> Result<String, ProxyError> {
    let query = RecordQuery {
        filter_by_formula: Some(eq_formula(link.display_field, name)),
        max_records: Some(1),
    };
    let existing = upstream.list_records(link.table, &query)?;
    if let Some(record) = existing.records.into_iter().next() {
        tracing::debug!(table = link.table, name, id = %record.id, "linked record found");
        return Ok(record.id);
    }

    let body = json!({ "records": [{ "fields": { link.display_field: name } }] });
    let reply = upstream.create_records(link.table, &body)?;
    match reply.first_record_id() {
        Some(id) => {
            tracing::info!(table = link.table, name, id, "created linked record");
            Ok(id.to_string())
        }
        None => {
            tracing::warn!(
                table = link.table,
                name,
                status = reply.status,
                body = %reply.body,
                "linked record creation returned no id"
            );
            Err(ProxyError::LinkResolution {
                field: link.field.to_string(),
                name: name.to_string(),
            })
        }
    }
}

/// `{field}="value"` with the value escaped as a formula string literal.
pub fn eq_formula(field: &str, value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        if c == '"' || c == '\\' {
            literal.push('\\');
        }
        literal.push(c);
    }
    format!("{{{field}}}=\"{literal}\"")
}
