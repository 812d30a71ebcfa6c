use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::FieldOptions;

/// A field whose value is outside its allowed choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub invalid: Invalid,
}

/// The offending scalar, or every offending element of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Invalid {
    Many(Vec<Value>),
    One(Value),
}

/// Checks every enumerated field of `fields` against the choices recorded for
/// `table`. Fields without recorded choices pass through. All violations are
/// returned, in field order.
pub fn validate_fields(
    fields: &Map<String, Value>,
    table: &str,
    options: &FieldOptions,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, value) in fields {
        let Some(allowed) = options.allowed(table, name) else {
            continue;
        };

        let invalid = match value {
            Value::Array(items) => {
                let bad: Vec<Value> = items
                    .iter()
                    .filter(|item| !is_allowed(allowed, item))
                    .cloned()
                    .collect();
                if bad.is_empty() {
                    None
                } else {
                    Some(Invalid::Many(bad))
                }
            }
            scalar if !is_allowed(allowed, scalar) => Some(Invalid::One(scalar.clone())),
            _ => None,
        };

        if let Some(invalid) = invalid {
            errors.push(ValidationError {
                field: name.clone(),
                invalid,
            });
        }
    }

    errors
}

fn is_allowed(allowed: &[String], value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| allowed.iter().any(|choice| choice == s))
}
