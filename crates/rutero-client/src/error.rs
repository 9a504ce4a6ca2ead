use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const BUILD_HELP_COMMAND: &str = "rutero build --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `rutero {cmd} --help` for usage."),
            None => "Run `rutero --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_setting(variable: &str, value: &str, expected: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Setting `{variable}` has invalid value `{value}`: expected {expected}."),
            vec![format!("Unset `{variable}` or set it to {expected}.")],
        )
        .with_data(json!({
            "variable": variable,
            "received": value,
        }))
    }

    pub fn reference_data_unavailable(source: &str, detail: &str) -> Self {
        Self::new(
            "reference_data_unavailable",
            &format!("Geographic reference data could not be loaded from {source}: {detail}"),
            vec![
                "Check that the gazetteer file exists and is readable.".to_string(),
                "Unset `RUTERO_GAZETTEER`, `RUTERO_GEONAMES_CITIES` and `RUTERO_GEONAMES_COUNTRIES` to use the bundled gazetteer.".to_string(),
            ],
        )
        .with_data(json!({
            "source": source,
        }))
    }

    pub fn override_table_invalid(source: &str, line: u64, detail: &str) -> Self {
        Self::new(
            "override_table_invalid",
            &format!("Destination override table {source} is invalid at line {line}: {detail}"),
            vec![
                "Keys must already be normalized (uppercase, no accents or punctuation).".to_string(),
                "Leave all four value columns empty to discard a key, or give a known type."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "source": source,
            "line": line,
        }))
    }

    pub fn input_table_missing(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "input_table_missing",
            &format!("Required input table `{location}` was not found."),
            vec![
                "Provide a directory with clientes.csv, facturas.csv and proveedores_por_factura.csv.".to_string(),
                "Or pass `--raw` to build from raw invoice exports.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
            "help_command": BUILD_HELP_COMMAND,
        }))
    }

    pub fn input_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "input_unreadable",
            &format!("Input `{location}` could not be read: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Save CSV exports as UTF-8 and retry.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
            "help_command": BUILD_HELP_COMMAND,
        }))
    }

    pub fn output_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "output_write_failed",
            &format!("Could not write the master table to `{location}`: {detail}"),
            vec![
                "Choose a writable `--out` path and retry.".to_string(),
                "Or pass `--dry-run` to see the summary without writing a file.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self.code.as_str(),
            "reference_data_unavailable" | "internal_serialization_error"
        )
    }

    /// `user` when the caller can fix the input, `internal` otherwise.
    pub fn class(&self) -> &'static str {
        if self.is_internal() { "internal" } else { "user" }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
