use std::path::Path;

use super::{ClientRecord, CsvSheet, IngestStats, InputKind, InputTables, InvoiceRecord};
use crate::ClientResult;
use crate::suppliers::SupplierLineItem;

pub const CLIENTS_FILE: &str = "clientes.csv";
pub const INVOICES_FILE: &str = "facturas.csv";
pub const SUPPLIERS_FILE: &str = "proveedores_por_factura.csv";

pub fn read_tables(dir: &Path) -> ClientResult<InputTables> {
    let clients_sheet = CsvSheet::read(&dir.join(CLIENTS_FILE))?;
    let invoices_sheet = CsvSheet::read(&dir.join(INVOICES_FILE))?;
    let suppliers_sheet = CsvSheet::read(&dir.join(SUPPLIERS_FILE))?;

    let mut stats = IngestStats {
        files_read: 3,
        ..IngestStats::default()
    };

    let clients = read_clients(&clients_sheet, &mut stats);
    let invoices = read_invoices(&invoices_sheet, &mut stats);
    let supplier_lines = read_supplier_lines(&suppliers_sheet, &mut stats);

    Ok(InputTables {
        kind: InputKind::Tables,
        clients,
        invoices,
        supplier_lines,
        stats,
    })
}

fn absorb(sheet: &CsvSheet, stats: &mut IngestStats) {
    stats.rows_read += sheet.records.len();
    stats.malformed_records += sheet.malformed;
}

fn read_clients(sheet: &CsvSheet, stats: &mut IngestStats) -> Vec<ClientRecord> {
    absorb(sheet, stats);
    let mut clients = Vec::with_capacity(sheet.records.len());
    for record in &sheet.records {
        let Some(client_id) = sheet.value(record, "id_cliente") else {
            stats.rows_without_key += 1;
            continue;
        };
        clients.push(ClientRecord {
            client_id,
            marital_status: sheet.value(record, "estado_civil"),
            residence_country: sheet.value(record, "pais_residencia"),
            policy_count: sheet.count(record, "cant_polizas"),
            age_range: sheet.value(record, "rango_edades"),
            gender: sheet.value(record, "genero"),
            zone_city: sheet.value(record, "zonas_ciudades_cli"),
        });
    }
    clients
}

fn read_invoices(sheet: &CsvSheet, stats: &mut IngestStats) -> Vec<InvoiceRecord> {
    absorb(sheet, stats);
    let mut invoices = Vec::with_capacity(sheet.records.len());
    for record in &sheet.records {
        let Some(invoice_id) = sheet.value(record, "no_factura") else {
            stats.rows_without_key += 1;
            continue;
        };
        invoices.push(InvoiceRecord {
            invoice_id,
            client_id: sheet.value(record, "id_cliente"),
            invoice_date: sheet.value(record, "fecha_factura"),
            destination_raw: sheet.value(record, "ciudad_destino"),
            net_total: sheet.number(record, "vlr_total_neto_factura"),
            item_total: sheet.number(record, "vlr_total_item_factura"),
            net_item_total: sheet.number(record, "vlr_total_neto_item_factura"),
        });
    }
    invoices
}

fn read_supplier_lines(sheet: &CsvSheet, stats: &mut IngestStats) -> Vec<SupplierLineItem> {
    absorb(sheet, stats);
    let mut lines = Vec::with_capacity(sheet.records.len());
    for record in &sheet.records {
        let Some(invoice_id) = sheet.value(record, "no_factura") else {
            stats.rows_without_key += 1;
            continue;
        };
        lines.push(SupplierLineItem {
            invoice_id,
            supplier_name: sheet.value(record, "nombre_proveedor"),
            budget: sheet.number(record, "vlr_presupuesto_ppto"),
        });
    }
    lines
}
