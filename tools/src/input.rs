//! Argument parsing shared by the list tools

use crate::tool::ToolError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse a tool's raw JSON arguments into `T`
///
/// # Errors
///
/// Returns a validation `ToolError` if the input is not valid JSON or does not
/// match `T`
pub fn parse_args<T: DeserializeOwned>(input: &str) -> Result<T, ToolError> {
    let input = if input.trim().is_empty() { "{}" } else { input };
    serde_json::from_str(input).map_err(|e| ToolError::invalid_input(format!("Invalid arguments: {e}")))
}

/// Read an argument that may be a JSON array or a string holding one
///
/// Missing, null and blank-string arguments read as an empty array.
///
/// # Errors
///
/// Returns a validation `ToolError` if the value is neither, or the string is
/// not a JSON array
pub fn json_array(name: &str, value: Option<Value>) -> Result<Vec<Value>, ToolError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => Ok(values),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(values)) => Ok(values),
            Ok(_) => Err(ToolError::invalid_input(format!("{name} must be a JSON array"))),
            Err(e) => Err(ToolError::invalid_input(format!(
                "Error parsing {name} JSON: {e}"
            ))),
        },
        Some(_) => Err(ToolError::invalid_input(format!(
            "{name} must be a JSON array or a string containing one"
        ))),
    }
}

/// Reject a blank required string argument
///
/// # Errors
///
/// Returns a validation `ToolError` if `value` is empty or whitespace
pub fn require_non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str, ToolError> {
    if value.trim().is_empty() {
        Err(ToolError::invalid_input(format!("{name} must not be empty")))
    } else {
        Ok(value)
    }
}

/// Treat blank optional strings as absent
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
