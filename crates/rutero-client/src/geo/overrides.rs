use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::geo::types::{ClassificationResult, DestinationType};
use crate::normalize::{NormalizedKey, normalize_str};
use crate::{ClientError, ClientResult};

const BUNDLED_OVERRIDES: &str = include_str!("../../data/destination_overrides.csv");
const BUNDLED_LABEL: &str = "bundled overrides";
const EXPECTED_HEADERS: [&str; 5] = ["key", "type", "name", "country", "continent"];

#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<NormalizedKey, ClassificationResult>,
    rows_read: usize,
}

impl OverrideTable {
    pub fn bundled() -> ClientResult<Self> {
        Self::from_csv_str(BUNDLED_OVERRIDES, BUNDLED_LABEL)
    }

    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let label = format!("`{}`", path.display());
        let body = fs::read_to_string(path)
            .map_err(|error| ClientError::override_table_invalid(&label, 0, &error.to_string()))?;
        Self::from_csv_str(&body, &label)
    }

    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let table = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::bundled()?,
        };
        tracing::info!(
            rows = table.rows_read,
            keys = table.entries.len(),
            "loaded destination overrides"
        );
        Ok(table)
    }

    /// Later rows replace earlier rows with the same key.
    pub fn from_csv_str(body: &str, source_label: &str) -> ClientResult<Self> {
        let body = body.strip_prefix('\u{feff}').unwrap_or(body);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|error| ClientError::override_table_invalid(source_label, 1, &error.to_string()))?
            .iter()
            .map(|value| value.trim().to_ascii_lowercase())
            .collect::<Vec<String>>();
        if headers != EXPECTED_HEADERS {
            return Err(ClientError::override_table_invalid(
                source_label,
                1,
                &format!("expected header `{}`", EXPECTED_HEADERS.join(",")),
            ));
        }

        let mut table = Self::default();
        for record in reader.records() {
            let record = record.map_err(|error| {
                let line = error.position().map(|position| position.line()).unwrap_or(0);
                ClientError::override_table_invalid(source_label, line, &error.to_string())
            })?;
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            let (key, result) = parse_row(&record)
                .map_err(|detail| ClientError::override_table_invalid(source_label, line, &detail))?;
            table.entries.insert(key, result);
            table.rows_read += 1;
        }

        Ok(table)
    }

    pub fn get(&self, key: &NormalizedKey) -> Option<&ClassificationResult> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn discard_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.is_discard()).count()
    }
}

fn parse_row(record: &csv::StringRecord) -> Result<(NormalizedKey, ClassificationResult), String> {
    let cell = |index: usize| {
        record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let raw_key = cell(0).ok_or_else(|| "key is empty".to_string())?;
    let key = normalize_str(&raw_key)
        .filter(|normalized| normalized.as_str() == raw_key)
        .ok_or_else(|| format!("key `{raw_key}` is not in normalized form"))?;

    let kind = cell(1);
    let name = cell(2);
    let country = cell(3);
    let continent = cell(4);

    let Some(kind) = kind else {
        if name.is_none() && country.is_none() && continent.is_none() {
            return Ok((key, ClassificationResult::discard()));
        }
        return Err(format!("key `{raw_key}` has values but no type"));
    };

    let kind = DestinationType::parse(&kind)
        .filter(|parsed| *parsed != DestinationType::NoClasificado)
        .ok_or_else(|| format!("key `{raw_key}` has unknown type `{kind}`"))?;

    Ok((
        key,
        ClassificationResult {
            kind: Some(kind),
            name,
            country,
            continent,
        },
    ))
}
