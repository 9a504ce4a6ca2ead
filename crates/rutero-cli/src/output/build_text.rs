use std::io;

use serde_json::Value;

use super::format::{self, Column};

pub fn render_build(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("build output requires summary"))?;
    let dry_run = data.get("dry_run").and_then(Value::as_bool).unwrap_or(false);

    let headline = if dry_run {
        "Dry run complete. Nothing was written."
    } else {
        "Build complete. The master table was written."
    };
    let mut lines = vec![headline.to_string(), String::new(), "Build:".to_string()];

    let mut build_entries = vec![
        ("Input:", text_field(data, "input_dir")),
        ("Layout:", text_field(data, "source_kind")),
        ("Reference data:", text_field(data, "reference_source")),
    ];
    if let Some(output) = data.get("output").filter(|output| output.is_object()) {
        build_entries.push(("Output:", text_field(output, "path")));
        build_entries.push(("Rows written:", count_field(output, "rows_written")));
    }
    lines.extend(format::key_value_rows(&build_entries, 2));

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Invoices:", count_field(summary, "invoices")),
            ("Clients:", count_field(summary, "clients")),
            ("Supplier lines:", count_field(summary, "supplier_lines")),
            ("Master rows:", count_field(summary, "master_rows")),
            ("Distinct destinations:", count_field(summary, "distinct_destinations")),
            ("Classified:", count_field(summary, "classified")),
            ("Unclassified:", count_field(summary, "unclassified")),
            ("Discarded:", count_field(summary, "discarded")),
            ("International:", count_field(summary, "international")),
        ],
        2,
    ));

    if let Some(ingest) = data.get("ingest") {
        let skipped = [
            ("Malformed records:", "malformed_records"),
            ("Rows without key:", "rows_without_key"),
            ("Duplicate supplier lines:", "duplicate_supplier_lines"),
        ]
        .into_iter()
        .filter(|(_, key)| ingest.get(*key).and_then(Value::as_i64).unwrap_or(0) > 0)
        .map(|(label, key)| (label, count_field(ingest, key)))
        .collect::<Vec<(&str, String)>>();
        if !skipped.is_empty() {
            lines.push(String::new());
            lines.push("Skipped while reading:".to_string());
            lines.extend(format::key_value_rows(&skipped, 2));
        }
    }

    if let Some(join) = data.get("join") {
        let notes = [
            ("Duplicate invoices:", "duplicate_invoices"),
            ("Invoices without client:", "missing_clients"),
            ("Invoices without suppliers:", "missing_suppliers"),
            ("Unparsed dates:", "unparsed_dates"),
        ]
        .into_iter()
        .filter(|(_, key)| join.get(*key).and_then(Value::as_i64).unwrap_or(0) > 0)
        .map(|(label, key)| (label, count_field(join, key)))
        .collect::<Vec<(&str, String)>>();
        if !notes.is_empty() {
            lines.push(String::new());
            lines.push("Join notes:".to_string());
            lines.extend(format::key_value_rows(&notes, 2));
        }
    }

    let by_type = data
        .get("by_type")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if !by_type.is_empty() {
        lines.push(String::new());
        lines.push("Destinations by type:".to_string());
        let rows = by_type
            .iter()
            .map(|row| {
                vec![
                    row.get("destination_type")
                        .and_then(Value::as_str)
                        .unwrap_or("(discarded)")
                        .to_string(),
                    count_field(row, "count"),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(format::render_table_or_blocks(
            &[
                Column::left("Type"),
                Column::right("Invoices"),
            ],
            &rows,
            format::terminal_width(),
            "Type",
        ));
    }

    let unclassified = data
        .get("top_unclassified")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if !unclassified.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Top unclassified destinations ({} distinct keys):",
            count_field(data, "unclassified_keys")
        ));
        lines.extend(unclassified_table(&unclassified));
    }

    if let Some(next_step) = data.get("next_step") {
        let label = text_field(next_step, "label");
        let command = text_field(next_step, "command");
        lines.push(String::new());
        lines.push("What to do next:".to_string());
        lines.push(format!("  {label}:"));
        lines.push(format!("    {command}"));
    }

    Ok(lines.join("\n"))
}

fn unclassified_table(rows: &[Value]) -> Vec<String> {
    let table_rows = rows
        .iter()
        .map(|row| vec![text_field(row, "key"), count_field(row, "occurrences")])
        .collect::<Vec<Vec<String>>>();
    format::render_table_or_blocks(
        &[
            Column::left("Destination key"),
            Column::right("Occurrences"),
        ],
        &table_rows,
        format::terminal_width(),
        "Key",
    )
}

pub(super) fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

pub(super) fn count_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_i64)
        .unwrap_or(0)
        .to_string()
}
