mod client;
mod config;
mod types;

pub use client::{AirtableClient, AirtableError};
pub use config::{AirtableConfig, DEFAULT_API_URL, DEFAULT_BASE_ID};
pub use types::{
    BaseSchema, Choice, FieldSchema, FieldTypeOptions, RecordList, RecordQuery, RecordRef, Reply,
    TableSchema,
};
