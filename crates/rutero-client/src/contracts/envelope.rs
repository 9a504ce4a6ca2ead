use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// What every command returns on success; the CLI picks the layout.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let data = serde_json::to_value(data).map_err(|error| {
        tracing::error!(command, %error, "command data did not serialize");
        ClientError::internal_serialization(&error.to_string())
    })?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_owned(),
        version: API_VERSION.to_owned(),
        data,
    })
}
