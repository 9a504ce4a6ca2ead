use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ClientRecord, CsvSheet, IngestStats, InputKind, InputTables, InvoiceRecord};
use crate::suppliers::SupplierLineItem;
use crate::{ClientError, ClientResult};

const INVOICE_ID: &str = "No. Factura";
const MARITAL_STATUS: &str = "Estado Civil";
const RESIDENCE_COUNTRY: &str = "Pais Residencia";
const POLICY_COUNT: &str = "Cant Polizas";
const AGE_RANGE: &str = "Rango Edades";
const GENDER: &str = "Genero";
const ZONE_CITY: &str = "Zonas Ciudades Cli";
const INVOICE_DATE: &str = "Fecha Factura";
const DESTINATION: &str = "Ciudad Destino";
const SUPPLIER_NAME: &str = "Nombre Proveedor";
const SUPPLIER_BUDGET: &str = "Valor Presupuesto Servicios Ppto";
const NET_TOTAL: &str = "Valor Total Neto Factura";
const ITEM_TOTAL: &str = "Valor Total Item Factura";
const NET_ITEM_TOTAL: &str = "Valor Total Neto Item Factura";

const SYNTHETIC_CLIENT_PREFIX: &str = "cliente_";

pub fn list_export_files(dir: &Path) -> ClientResult<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).map_err(|error| ClientError::input_unreadable(dir, &error.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| ClientError::input_unreadable(dir, &error.to_string()))?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|left, right| left.file_name().cmp(&right.file_name()));

    if files.is_empty() {
        return Err(ClientError::input_table_missing(&dir.join("*.csv")));
    }
    Ok(files)
}

/// The first row of each invoice id defines the invoice and a synthetic
/// client numbered in first-seen order. Every row carrying both an invoice id
/// and a supplier name is a supplier line; exact repeats are dropped.
pub fn split_raw_exports(dir: &Path) -> ClientResult<InputTables> {
    let files = list_export_files(dir)?;
    let mut splitter = ExportSplitter::default();
    for path in &files {
        let sheet = CsvSheet::read(path)?;
        tracing::debug!(path = %path.display(), rows = sheet.records.len(), "read raw export");
        splitter.absorb(&sheet);
    }
    splitter.stats.files_read = files.len();
    Ok(splitter.finish())
}

#[derive(Debug, Default)]
struct ExportSplitter {
    clients: Vec<ClientRecord>,
    invoices: Vec<InvoiceRecord>,
    supplier_lines: Vec<SupplierLineItem>,
    seen_invoices: HashSet<String>,
    seen_lines: HashSet<(String, String, Option<u64>)>,
    stats: IngestStats,
}

impl ExportSplitter {
    fn absorb(&mut self, sheet: &CsvSheet) {
        self.stats.rows_read += sheet.records.len();
        self.stats.malformed_records += sheet.malformed;

        for record in &sheet.records {
            let Some(invoice_id) = sheet.value(record, INVOICE_ID) else {
                self.stats.rows_without_key += 1;
                continue;
            };

            if let Some(supplier_name) = sheet.value(record, SUPPLIER_NAME) {
                let budget = sheet.number(record, SUPPLIER_BUDGET);
                let line_key = (
                    invoice_id.clone(),
                    supplier_name.clone(),
                    budget.map(f64::to_bits),
                );
                if self.seen_lines.insert(line_key) {
                    self.supplier_lines.push(SupplierLineItem {
                        invoice_id: invoice_id.clone(),
                        supplier_name: Some(supplier_name),
                        budget,
                    });
                } else {
                    self.stats.duplicate_supplier_lines += 1;
                }
            }

            if !self.seen_invoices.insert(invoice_id.clone()) {
                continue;
            }

            let client_id = format!("{SYNTHETIC_CLIENT_PREFIX}{}", self.clients.len() + 1);
            self.clients.push(ClientRecord {
                client_id: client_id.clone(),
                marital_status: sheet.value(record, MARITAL_STATUS),
                residence_country: sheet.value(record, RESIDENCE_COUNTRY),
                policy_count: sheet.count(record, POLICY_COUNT),
                age_range: sheet.value(record, AGE_RANGE),
                gender: sheet.value(record, GENDER),
                zone_city: sheet.value(record, ZONE_CITY),
            });
            self.invoices.push(InvoiceRecord {
                invoice_id,
                client_id: Some(client_id),
                invoice_date: sheet.value(record, INVOICE_DATE),
                destination_raw: sheet.value(record, DESTINATION),
                net_total: sheet.number(record, NET_TOTAL),
                item_total: sheet.number(record, ITEM_TOTAL),
                net_item_total: sheet.number(record, NET_ITEM_TOTAL),
            });
        }
    }

    fn finish(self) -> InputTables {
        let invoices_with_suppliers = self
            .supplier_lines
            .iter()
            .map(|line| line.invoice_id.as_str())
            .collect::<HashSet<&str>>()
            .len();
        tracing::debug!(
            invoices = self.invoices.len(),
            invoices_with_suppliers,
            duplicate_lines = self.stats.duplicate_supplier_lines,
            "split raw exports"
        );

        InputTables {
            kind: InputKind::RawExport,
            clients: self.clients,
            invoices: self.invoices,
            supplier_lines: self.supplier_lines,
            stats: self.stats,
        }
    }
}
