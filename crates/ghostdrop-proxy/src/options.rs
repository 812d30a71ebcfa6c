use std::collections::HashMap;

use ghostdrop_airtable::{AirtableError, TableSchema};

use crate::error::ProxyError;
use crate::upstream::Upstream;

/// Allowed choices of every enumerated field in the base, keyed by
/// `"<table> > <field>"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    choices: HashMap<String, Vec<String>>,
}

impl FieldOptions {
    pub fn key(table: &str, field: &str) -> String {
        format!("{table} > {field}")
    }

    pub fn from_tables(tables: &[TableSchema]) -> Self {
        let mut options = Self::default();
        for table in tables {
            for field in table.fields.iter().filter(|f| f.is_enumerated()) {
                options.insert(&table.name, &field.name, field.choice_names());
            }
        }
        options
    }

    pub fn insert(&mut self, table: &str, field: &str, allowed: Vec<String>) {
        self.choices.insert(Self::key(table, field), allowed);
    }

    pub fn allowed(&self, table: &str, field: &str) -> Option<&[String]> {
        self.choices.get(&Self::key(table, field)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Reads the base metadata and collects the choices of every single- and
/// multiple-select field. One upstream round trip per call.
pub fn fetch_field_options<U: Upstream + ?Sized>(upstream: &U) -> Result<FieldOptions, ProxyError> {
    let tables = upstream.list_tables().map_err(|e| match e {
        AirtableError::Status { status, .. } => ProxyError::UpstreamMetadata { status },
        other => ProxyError::Upstream(other),
    })?;
    let options = FieldOptions::from_tables(&tables);
    tracing::debug!(
        tables = tables.len(),
        fields = options.len(),
        "fetched field options"
    );
    Ok(options)
}
