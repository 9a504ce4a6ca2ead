use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::master::{MASTER_COLUMNS, MasterRecord};
use crate::{ClientError, ClientResult};

pub fn write_master_csv(path: &Path, records: &[MasterRecord]) -> ClientResult<usize> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|error| write_failed(path, error))?;
    }

    // The target only ever holds a complete table.
    let staging = staging_path(path);
    let written = fs::File::create(&staging)
        .map_err(|error| write_failed(path, error))
        .and_then(|file| {
            write_master_records(file, records).map_err(|error| write_failed(path, error))
        });
    let rows_written = match written {
        Ok(rows) => rows,
        Err(error) => {
            let _ = fs::remove_file(&staging);
            return Err(error);
        }
    };
    if let Err(error) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(write_failed(path, error));
    }

    tracing::info!(rows_written, path = %path.display(), "wrote master table");
    Ok(rows_written)
}

fn write_failed(path: &Path, error: impl std::fmt::Display) -> ClientError {
    ClientError::output_write_failed(path, &error.to_string())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

pub(crate) fn write_master_records<W: Write>(
    writer: W,
    records: &[MasterRecord],
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(MASTER_COLUMNS)?;
    for record in records {
        csv_writer.write_record(record_cells(record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

fn record_cells(record: &MasterRecord) -> [String; MASTER_COLUMNS.len()] {
    [
        record.invoice_id.clone(),
        text(record.client_id.as_deref()),
        text(record.invoice_date.as_deref()),
        record.invoice_year.map(|year| year.to_string()).unwrap_or_default(),
        text(record.destination_raw.as_deref()),
        text(record.destination_type.map(|kind| kind.as_str())),
        text(record.destination_name.as_deref()),
        text(record.destination_country.as_deref()),
        text(record.destination_continent.as_deref()),
        number(record.net_total),
        number(record.item_total),
        number(record.net_item_total),
        text(record.marital_status.as_deref()),
        text(record.residence_country.as_deref()),
        record.policy_count.map(|count| count.to_string()).unwrap_or_default(),
        text(record.age_range.as_deref()),
        text(record.gender.as_deref()),
        text(record.zone_city.as_deref()),
        text(record.client_region.map(|region| region.as_str())),
        record.supplier_count.map(|count| count.to_string()).unwrap_or_default(),
        number(record.budget_sum),
        number(record.budget_mean),
        text(record.principal_supplier.as_deref()),
        record.is_international.to_string(),
    ]
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn number(value: Option<f64>) -> String {
    value.map(|number| number.to_string()).unwrap_or_default()
}
