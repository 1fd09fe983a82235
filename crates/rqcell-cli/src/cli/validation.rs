use rqcell_runtime::Variables;
use serde_json::Value;

/// Parse `--variables`: a JSON object.
///
/// # Errors
///
/// Returns an error message for invalid JSON or a non-object value.
pub fn parse_variables(s: &str) -> Result<Variables, String> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "Variables must be a JSON object, got: {other}"
        )),
        Err(err) => Err(format!("Invalid JSON: {err}")),
    }
}
