pub mod raw_export;
pub mod tables;

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;

use crate::suppliers::SupplierLineItem;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    pub client_id: String,
    pub marital_status: Option<String>,
    pub residence_country: Option<String>,
    pub policy_count: Option<i64>,
    pub age_range: Option<String>,
    pub gender: Option<String>,
    pub zone_city: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub invoice_id: String,
    pub client_id: Option<String>,
    pub invoice_date: Option<String>,
    pub destination_raw: Option<String>,
    pub net_total: Option<f64>,
    pub item_total: Option<f64>,
    pub net_item_total: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Tables,
    RawExport,
}

impl InputKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::RawExport => "raw_export",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub files_read: usize,
    pub rows_read: usize,
    pub malformed_records: usize,
    pub rows_without_key: usize,
    pub duplicate_supplier_lines: usize,
}

#[derive(Debug, Clone)]
pub struct InputTables {
    pub kind: InputKind,
    pub clients: Vec<ClientRecord>,
    pub invoices: Vec<InvoiceRecord>,
    pub supplier_lines: Vec<SupplierLineItem>,
    pub stats: IngestStats,
}

pub fn read_inputs(dir: &Path, kind: InputKind) -> ClientResult<InputTables> {
    if !dir.is_dir() {
        return Err(ClientError::input_table_missing(dir));
    }
    let tables = match kind {
        InputKind::Tables => tables::read_tables(dir)?,
        InputKind::RawExport => raw_export::split_raw_exports(dir)?,
    };
    tracing::info!(
        kind = kind.as_str(),
        clients = tables.clients.len(),
        invoices = tables.invoices.len(),
        supplier_lines = tables.supplier_lines.len(),
        malformed = tables.stats.malformed_records,
        "read input tables"
    );
    Ok(tables)
}

#[derive(Debug, Clone)]
pub(crate) struct CsvSheet {
    index_by_name: HashMap<String, usize>,
    pub(crate) records: Vec<csv::StringRecord>,
    pub(crate) malformed: usize,
}

impl CsvSheet {
    pub(crate) fn read(path: &Path) -> ClientResult<Self> {
        let bytes = fs::read(path).map_err(|error| {
            if error.kind() == ErrorKind::NotFound {
                ClientError::input_table_missing(path)
            } else {
                ClientError::input_unreadable(path, &error.to_string())
            }
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(path = %path.display(), "input is not valid UTF-8; replacing invalid bytes");
                String::from_utf8_lossy(error.as_bytes()).into_owned()
            }
        };
        Self::parse(&content, path)
    }

    pub(crate) fn parse(content: &str, path: &Path) -> ClientResult<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|error| ClientError::input_unreadable(path, &error.to_string()))?
            .iter()
            .map(|value| value.trim().to_string())
            .collect::<Vec<String>>();

        let mut index_by_name = HashMap::new();
        for (index, name) in headers.into_iter().enumerate() {
            index_by_name.entry(name).or_insert(index);
        }

        let mut records = Vec::new();
        let mut malformed = 0;
        for result in reader.records() {
            match result {
                Ok(record) => records.push(record),
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "skipped malformed CSV record");
                    malformed += 1;
                }
            }
        }

        Ok(Self {
            index_by_name,
            records,
            malformed,
        })
    }

    /// Cleaned cell; a missing column reads as null for every row.
    pub(crate) fn value(&self, record: &csv::StringRecord, column: &str) -> Option<String> {
        let index = self.index_by_name.get(column)?;
        clean_cell(record.get(*index)?)
    }

    pub(crate) fn number(&self, record: &csv::StringRecord, column: &str) -> Option<f64> {
        self.value(record, column).and_then(|value| parse_number(&value))
    }

    pub(crate) fn count(&self, record: &csv::StringRecord, column: &str) -> Option<i64> {
        self.number(record, column).and_then(number_to_count)
    }
}

pub(crate) fn clean_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn number_to_count(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Some(value as i64);
    }
    None
}
