use std::io;

use rutero_client::{ClientError, SuccessEnvelope};
use serde_json::{Map, Value, json};

const SCHEMA_VERSION: &str = "v1";
const ENVELOPED_COMMANDS: [&str; 3] = ["build", "classify", "reference stats"];

pub fn success_document(success: &SuccessEnvelope) -> io::Result<String> {
    if !ENVELOPED_COMMANDS.contains(&success.command.as_str()) {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no JSON layout for `{}`", success.command),
        ));
    }

    let mut document = Map::new();
    document.insert("ok".to_string(), Value::Bool(true));
    document.insert("version".to_string(), Value::from(SCHEMA_VERSION));
    document.insert("command".to_string(), Value::from(success.command.as_str()));
    document.insert("data".to_string(), success.data.clone());
    pretty(&Value::Object(document))
}

/// Failures carry no `ok` key.
pub fn failure_document(error: &ClientError) -> io::Result<String> {
    pretty(&json!({
        "error": {
            "code": error.code,
            "class": error.class(),
            "message": error.message,
            "recovery_steps": error.recovery_steps,
        }
    }))
}

fn pretty(document: &Value) -> io::Result<String> {
    serde_json::to_string_pretty(document).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rutero_client::{ClientError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{failure_document, success_document};

    fn envelope(command: &str, data: Value) -> SuccessEnvelope {
        SuccessEnvelope {
            ok: true,
            command: command.to_string(),
            version: "0.1.0".to_string(),
            data,
        }
    }

    fn parsed(rendered: std::io::Result<String>) -> Value {
        assert!(rendered.is_ok());
        rendered
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or(Value::Null)
    }

    #[test]
    fn build_documents_wrap_data_with_schema_version() {
        let document = parsed(success_document(&envelope(
            "build",
            json!({"dry_run": true, "summary": {"master_rows": 3}}),
        )));

        assert_eq!(document["ok"], json!(true));
        assert_eq!(document["version"], json!("v1"));
        assert_eq!(document["command"], json!("build"));
        assert_eq!(document["data"]["summary"]["master_rows"], json!(3));
    }

    #[test]
    fn user_failures_carry_code_and_class() {
        let error = ClientError::input_table_missing(Path::new("input/facturas.csv"));
        let document = parsed(failure_document(&error));

        assert_eq!(document["error"]["code"], json!("input_table_missing"));
        assert_eq!(document["error"]["class"], json!("user"));
        assert!(document.get("ok").is_none());
    }

    #[test]
    fn reference_failures_are_marked_internal() {
        let error = ClientError::reference_data_unavailable("gazetteer.json", "not found");
        let document = parsed(failure_document(&error));
        assert_eq!(document["error"]["class"], json!("internal"));
    }

    #[test]
    fn commands_outside_the_envelope_list_are_rejected() {
        assert!(success_document(&envelope("export", json!({}))).is_err());
    }
}
