use serde::Serialize;

use crate::geo::gazetteer::GazetteerStats;
use crate::geo::types::ClassificationResult;
use crate::ingest::IngestStats;
use crate::master::MasterStats;

#[derive(Debug, Clone, Serialize)]
pub struct NextStep {
    pub label: String,
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub invoices: i64,
    pub clients: i64,
    pub supplier_lines: i64,
    pub master_rows: i64,
    pub distinct_destinations: i64,
    pub classified: i64,
    pub unclassified: i64,
    pub discarded: i64,
    pub international: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub destination_type: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnclassifiedCount {
    pub key: String,
    pub occurrences: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildData {
    pub dry_run: bool,
    pub input_dir: String,
    pub source_kind: String,
    pub reference_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFile>,
    pub message: String,
    pub summary: BuildSummary,
    pub by_type: Vec<TypeCount>,
    pub unclassified_keys: i64,
    pub top_unclassified: Vec<UnclassifiedCount>,
    pub ingest: IngestStats,
    pub join: MasterStats,
    pub next_step: NextStep,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputFile {
    pub path: String,
    pub rows_written: i64,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRow {
    pub input: String,
    pub normalized_key: Option<String>,
    pub resolver: String,
    pub result: ClassificationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyData {
    pub reference_source: String,
    pub rows: Vec<ClassifyRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverrideStats {
    pub source: String,
    pub rows_read: i64,
    pub keys: i64,
    pub discard_keys: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceStatsData {
    pub reference_source: String,
    pub gazetteer: GazetteerStats,
    pub overrides: OverrideStats,
    pub region_zones: i64,
    pub domestic_country: String,
    pub fuzzy_min_similarity: f64,
}
