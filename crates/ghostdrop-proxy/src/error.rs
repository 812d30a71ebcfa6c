use ghostdrop_airtable::AirtableError;
use http::StatusCode;
use serde_json::{Value, json};

use crate::validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("request contains no records")]
    MissingRecord,

    #[error("Invalid field values")]
    Validation(Vec<ValidationError>),

    #[error("Failed to fetch Airtable metadata")]
    UpstreamMetadata { status: u16 },

    #[error("Failed to create {} record", .field.to_lowercase())]
    LinkResolution { field: String, name: String },

    #[error("failed to encode upstream payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Upstream(#[from] AirtableError),
}

/// Largest request body accepted.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidBody(_) | ProxyError::MissingRecord | ProxyError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::UpstreamMetadata { .. }
            | ProxyError::LinkResolution { .. }
            | ProxyError::Encode(_)
            | ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent to the caller.
    pub fn to_body(&self) -> Value {
        match self {
            ProxyError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}
