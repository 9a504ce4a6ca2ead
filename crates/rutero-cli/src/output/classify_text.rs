use std::io;

use serde_json::Value;

use super::format::{self, Column};

pub fn render_classify(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("classify output requires rows"))?;
    let reference_source = data
        .get("reference_source")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    let mut lines = vec![
        format!("Classified {} label(s).", rows.len()),
        String::new(),
    ];
    lines.extend(format::key_value_rows(
        &[("Reference data:", reference_source.to_string())],
        2,
    ));
    lines.push(String::new());

    let columns = [
        Column::left("Input"),
        Column::left("Key"),
        Column::left("Resolver"),
        Column::left("Type"),
        Column::left("Name"),
        Column::left("Country"),
        Column::left("Continent"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            let result = row.get("result").cloned().unwrap_or(Value::Null);
            vec![
                cell(row, "input"),
                cell(row, "normalized_key"),
                cell(row, "resolver"),
                cell(&result, "type"),
                cell(&result, "name"),
                cell(&result, "country"),
                cell(&result, "continent"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Label",
    ));

    Ok(lines.join("\n"))
}

fn cell(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}
