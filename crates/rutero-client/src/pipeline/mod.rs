use std::collections::{BTreeMap, HashMap};

use crate::contracts::types::{BuildSummary, TypeCount, UnclassifiedCount};
use crate::geo::ReferenceTables;
use crate::geo::types::{ClassificationResult, DestinationType};
use crate::ingest::InputTables;
use crate::master::{MasterTable, build_master_table};
use crate::normalize::{NormalizedKey, normalize_label};
use crate::suppliers::aggregate_by_invoice;

pub const TOP_UNCLASSIFIED_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct EnrichedBuild {
    pub input: InputTables,
    pub destinations: BTreeMap<NormalizedKey, ClassificationResult>,
    pub master: MasterTable,
    pub summary: BuildSummary,
    pub by_type: Vec<TypeCount>,
    pub unclassified: Vec<UnclassifiedCount>,
}

impl EnrichedBuild {
    pub fn top_unclassified(&self) -> Vec<UnclassifiedCount> {
        self.unclassified
            .iter()
            .take(TOP_UNCLASSIFIED_LIMIT)
            .cloned()
            .collect()
    }
}

pub fn enrich(input: InputTables, tables: &ReferenceTables, domestic_country: &str) -> EnrichedBuild {
    let keys = input
        .invoices
        .iter()
        .filter_map(|invoice| normalize_label(invoice.destination_raw.as_deref()))
        .collect::<Vec<NormalizedKey>>();
    let classifier = tables.classifier();
    let destinations = classifier.classify_all(keys.iter());
    tracing::info!(distinct_destinations = destinations.len(), "classified destinations");

    let suppliers = aggregate_by_invoice(&input.supplier_lines);
    tracing::info!(invoices_with_suppliers = suppliers.len(), "aggregated supplier lines");

    let master = build_master_table(
        &input.clients,
        &input.invoices,
        &suppliers,
        &destinations,
        domestic_country,
    );
    tracing::info!(
        rows = master.records.len(),
        duplicate_invoices = master.stats.duplicate_invoices,
        missing_clients = master.stats.missing_clients,
        "built master table"
    );

    let unclassified = count_unclassified(&master);
    let summary = summarize(&input, &destinations, &master);
    let by_type = breakdown_by_type(&master);

    EnrichedBuild {
        input,
        destinations,
        master,
        summary,
        by_type,
        unclassified,
    }
}

fn summarize(
    input: &InputTables,
    destinations: &BTreeMap<NormalizedKey, ClassificationResult>,
    master: &MasterTable,
) -> BuildSummary {
    let mut summary = BuildSummary {
        invoices: input.invoices.len() as i64,
        clients: input.clients.len() as i64,
        supplier_lines: input.supplier_lines.len() as i64,
        master_rows: master.records.len() as i64,
        distinct_destinations: destinations.len() as i64,
        ..BuildSummary::default()
    };
    for record in &master.records {
        match record.destination_type {
            None => summary.discarded += 1,
            Some(DestinationType::NoClasificado) => summary.unclassified += 1,
            Some(_) => summary.classified += 1,
        }
        if record.is_international {
            summary.international += 1;
        }
    }
    summary
}

pub fn breakdown_by_type(master: &MasterTable) -> Vec<TypeCount> {
    let mut counts: HashMap<Option<DestinationType>, i64> = HashMap::new();
    for record in &master.records {
        *counts.entry(record.destination_type).or_insert(0) += 1;
    }

    let mut rows = counts
        .into_iter()
        .map(|(kind, count)| TypeCount {
            destination_type: kind.map(|value| value.as_str().to_string()),
            count,
        })
        .collect::<Vec<TypeCount>>();
    rows.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.destination_type.cmp(&right.destination_type))
    });
    rows
}

pub fn count_unclassified(master: &MasterTable) -> Vec<UnclassifiedCount> {
    let mut counts: BTreeMap<NormalizedKey, i64> = BTreeMap::new();
    for record in &master.records {
        if record.destination_type != Some(DestinationType::NoClasificado) {
            continue;
        }
        if let Some(key) = normalize_label(record.destination_raw.as_deref()) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut rows = counts
        .into_iter()
        .map(|(key, occurrences)| UnclassifiedCount {
            key: key.into_string(),
            occurrences,
        })
        .collect::<Vec<UnclassifiedCount>>();
    rows.sort_by(|left, right| {
        right
            .occurrences
            .cmp(&left.occurrences)
            .then_with(|| left.key.cmp(&right.key))
    });
    rows
}
