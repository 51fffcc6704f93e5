//! Shape checks applied to API responses before anything reads them

use serde_json::Value;

use crate::WatcherError;

/// A response that passed [`validate`]. Holds the original value unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedResponse(Value);

impl ValidatedResponse {
    /// Homework records, most recent first
    pub fn homeworks(&self) -> &[Value] {
        self.0["homeworks"].as_array().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn current_date(&self) -> &Value {
        &self.0["current_date"]
    }
}

/// Check that a response has the documented `homeworks` / `current_date` shape
pub fn validate(response: Value) -> crate::Result<ValidatedResponse> {
    tracing::debug!("Validating API response");

    let Some(fields) = response.as_object() else {
        tracing::error!("API response is not an object");
        return Err(WatcherError::Schema(format!(
            "expected an object, got {}",
            json_type(&response)
        )));
    };

    match fields.get("homeworks") {
        None => {
            tracing::error!("API response has no 'homeworks' key");
            return Err(WatcherError::Schema("missing key 'homeworks'".to_string()));
        }
        Some(homeworks) if !homeworks.is_array() => {
            tracing::error!("'homeworks' is not a list");
            return Err(WatcherError::Schema(format!(
                "'homeworks' should be a list, got {}",
                json_type(homeworks)
            )));
        }
        Some(_) => {}
    }

    if !fields.contains_key("current_date") {
        tracing::error!("API response has no 'current_date' key");
        return Err(WatcherError::Schema(
            "missing key 'current_date'".to_string(),
        ));
    }

    tracing::debug!("API response matches the expected schema");
    Ok(ValidatedResponse(response))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
