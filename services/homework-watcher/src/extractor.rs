//! Turns a homework record into the message sent to the chat

use serde_json::Value;

use crate::verdict::HomeworkStatus;
use crate::WatcherError;

/// Build the status-change message for a single homework record
pub fn extract(homework: &Value) -> crate::Result<String> {
    tracing::debug!("Extracting homework status");

    let Some(record) = homework.as_object() else {
        tracing::error!("Homework record is not an object");
        return Err(WatcherError::Schema(
            "homework record should be an object".to_string(),
        ));
    };

    let Some(code) = record.get("status") else {
        tracing::error!("Homework record has no 'status' key");
        return Err(WatcherError::MissingField("status".to_string()));
    };

    let status: HomeworkStatus = match code.as_str() {
        Some(code) => code.parse().inspect_err(|_| {
            tracing::error!("Homework has undocumented status '{}'", code);
        })?,
        None => {
            tracing::error!("Homework status is not a string: {}", code);
            return Err(WatcherError::UnknownStatus(code.to_string()));
        }
    };

    let Some(name) = record.get("homework_name") else {
        tracing::error!("Homework record has no 'homework_name' key");
        return Err(WatcherError::MissingField("homework_name".to_string()));
    };
    let name = match name {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };

    tracing::debug!("Homework '{}' has status '{}'", name, status);
    Ok(format!(
        "Changed status of submission \"{}\". {}",
        name,
        status.verdict()
    ))
}
