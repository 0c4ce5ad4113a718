use jsonschema::Validator;
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Most validation errors folded into one message.
const MAX_REPORTED_ERRORS: usize = 4;

pub(crate) fn validate_record(port: u8, record: &Value, validator: &Validator) -> Result<()> {
    let mut errors = validator.iter_errors(record);
    if let Some(first) = errors.next() {
        let mut message = first.to_string();
        for err in errors.take(MAX_REPORTED_ERRORS - 1) {
            message.push_str("; ");
            message.push_str(&err.to_string());
        }
        return Err(SchemaError::ValidationFailed { port, message });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_several_errors() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": { "type": "integer" },
                "b": { "type": "integer" }
            }
        });
        let validator = jsonschema::validator_for(&schema).unwrap();

        let err = validate_record(7, &json!({"a": "x", "b": "y"}), &validator).unwrap_err();
        match err {
            SchemaError::ValidationFailed { port, message } => {
                assert_eq!(port, 7);
                assert_eq!(message.matches("; ").count(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
