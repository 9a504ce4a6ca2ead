use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::geo::region::{ColombianRegion, classify_region};
use crate::geo::types::{ClassificationResult, DestinationType};
use crate::ingest::{ClientRecord, InvoiceRecord};
use crate::normalize::{NormalizedKey, normalize_label};
use crate::suppliers::PrincipalSupplier;

// Slash dates with the year last are day-first: 07/03/2023 is 7 March.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub const MASTER_COLUMNS: [&str; 24] = [
    "invoice_id",
    "client_id",
    "invoice_date",
    "invoice_year",
    "destination_raw",
    "destination_type",
    "destination_name",
    "destination_country",
    "destination_continent",
    "net_total",
    "item_total",
    "net_item_total",
    "marital_status",
    "residence_country",
    "policy_count",
    "age_range",
    "gender",
    "zone_city",
    "client_region",
    "supplier_count",
    "budget_sum",
    "budget_mean",
    "principal_supplier",
    "is_international",
];

/// One analytical row per invoice. Field order matches [`MASTER_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterRecord {
    pub invoice_id: String,
    pub client_id: Option<String>,
    pub invoice_date: Option<String>,
    pub invoice_year: Option<i32>,
    pub destination_raw: Option<String>,
    pub destination_type: Option<DestinationType>,
    pub destination_name: Option<String>,
    pub destination_country: Option<String>,
    pub destination_continent: Option<String>,
    pub net_total: Option<f64>,
    pub item_total: Option<f64>,
    pub net_item_total: Option<f64>,
    pub marital_status: Option<String>,
    pub residence_country: Option<String>,
    pub policy_count: Option<i64>,
    pub age_range: Option<String>,
    pub gender: Option<String>,
    pub zone_city: Option<String>,
    pub client_region: Option<ColombianRegion>,
    pub supplier_count: Option<i64>,
    pub budget_sum: Option<f64>,
    pub budget_mean: Option<f64>,
    pub principal_supplier: Option<String>,
    pub is_international: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MasterStats {
    pub invoices_in: usize,
    pub duplicate_invoices: usize,
    pub missing_clients: usize,
    pub missing_suppliers: usize,
    pub unparsed_dates: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MasterTable {
    pub records: Vec<MasterRecord>,
    pub stats: MasterStats,
}

pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|timestamp| timestamp.date())
        })
}

pub fn is_international(destination_country: Option<&str>, domestic_country: &str) -> bool {
    destination_country
        .map(|country| country != domestic_country)
        .unwrap_or(false)
}

/// Emits exactly one record per distinct invoice id; the first invoice row
/// with a given id wins.
pub fn build_master_table(
    clients: &[ClientRecord],
    invoices: &[InvoiceRecord],
    suppliers: &[PrincipalSupplier],
    destinations: &BTreeMap<NormalizedKey, ClassificationResult>,
    domestic_country: &str,
) -> MasterTable {
    let mut client_by_id: HashMap<&str, &ClientRecord> = HashMap::new();
    for client in clients {
        client_by_id.entry(client.client_id.as_str()).or_insert(client);
    }
    let supplier_by_invoice = suppliers
        .iter()
        .map(|aggregate| (aggregate.invoice_id.as_str(), aggregate))
        .collect::<HashMap<&str, &PrincipalSupplier>>();

    let mut table = MasterTable::default();
    table.stats.invoices_in = invoices.len();
    let mut seen: HashSet<&str> = HashSet::new();

    for invoice in invoices {
        if !seen.insert(invoice.invoice_id.as_str()) {
            table.stats.duplicate_invoices += 1;
            continue;
        }

        let client = invoice
            .client_id
            .as_deref()
            .and_then(|id| client_by_id.get(id).copied());
        if client.is_none() {
            table.stats.missing_clients += 1;
        }

        let supplier = supplier_by_invoice.get(invoice.invoice_id.as_str()).copied();
        if supplier.is_none() {
            table.stats.missing_suppliers += 1;
        }

        let parsed_date = invoice.invoice_date.as_deref().and_then(parse_invoice_date);
        if invoice.invoice_date.is_some() && parsed_date.is_none() {
            table.stats.unparsed_dates += 1;
        }

        let destination = normalize_label(invoice.destination_raw.as_deref())
            .and_then(|key| destinations.get(&key).cloned())
            .unwrap_or_default();

        let zone_key = client.and_then(|record| normalize_label(record.zone_city.as_deref()));

        table.records.push(MasterRecord {
            invoice_id: invoice.invoice_id.clone(),
            client_id: invoice.client_id.clone(),
            invoice_date: parsed_date.map(|date| date.format("%Y-%m-%d").to_string()),
            invoice_year: parsed_date.map(|date| date.year()),
            destination_raw: invoice.destination_raw.clone(),
            is_international: is_international(destination.country.as_deref(), domestic_country),
            destination_type: destination.kind,
            destination_name: destination.name,
            destination_country: destination.country,
            destination_continent: destination.continent,
            net_total: invoice.net_total,
            item_total: invoice.item_total,
            net_item_total: invoice.net_item_total,
            marital_status: client.and_then(|record| record.marital_status.clone()),
            residence_country: client.and_then(|record| record.residence_country.clone()),
            policy_count: client.and_then(|record| record.policy_count),
            age_range: client.and_then(|record| record.age_range.clone()),
            gender: client.and_then(|record| record.gender.clone()),
            zone_city: client.and_then(|record| record.zone_city.clone()),
            client_region: classify_region(zone_key.as_ref()),
            supplier_count: supplier.map(|aggregate| aggregate.supplier_count),
            budget_sum: supplier.and_then(|aggregate| aggregate.budget_sum),
            budget_mean: supplier.and_then(|aggregate| aggregate.budget_mean),
            principal_supplier: supplier.and_then(|aggregate| aggregate.principal_supplier.clone()),
        });
    }

    table
}
