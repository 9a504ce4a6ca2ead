use std::io;

use serde_json::Value;

use super::build_text::{count_field, text_field};
use super::format;

pub fn render_reference_stats(data: &Value) -> io::Result<String> {
    let gazetteer = data
        .get("gazetteer")
        .ok_or_else(|| io::Error::other("reference stats output requires gazetteer"))?;
    let overrides = data
        .get("overrides")
        .ok_or_else(|| io::Error::other("reference stats output requires overrides"))?;
    let similarity = data
        .get("fuzzy_min_similarity")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let mut lines = vec![
        "Reference data loaded successfully.".to_string(),
        String::new(),
        "Settings:".to_string(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Reference data:", text_field(data, "reference_source")),
            ("Domestic country:", text_field(data, "domestic_country")),
            ("Fuzzy similarity floor:", format!("{similarity:.2}")),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Gazetteer:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Continents:", count_field(gazetteer, "continents")),
            ("Countries:", count_field(gazetteer, "countries")),
            ("Country keys:", count_field(gazetteer, "country_keys")),
            ("Aliases added:", count_field(gazetteer, "aliases_added")),
            ("Cities:", count_field(gazetteer, "cities")),
            ("City keys:", count_field(gazetteer, "city_keys")),
            ("City key collisions:", count_field(gazetteer, "city_collisions")),
            ("Skipped alternates:", count_field(gazetteer, "skipped_alternates")),
            ("Skipped records:", count_field(gazetteer, "skipped_records")),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Manual overrides:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Source:", text_field(overrides, "source")),
            ("Rows read:", count_field(overrides, "rows_read")),
            ("Distinct keys:", count_field(overrides, "keys")),
            ("Discard keys:", count_field(overrides, "discard_keys")),
        ],
        2,
    ));

    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[("Region zones:", count_field(data, "region_zones"))],
        0,
    ));

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_reference_stats;

    #[test]
    fn reference_stats_lists_sections() {
        let payload = json!({
            "reference_source": "bundled gazetteer",
            "gazetteer": {
                "cities": 82, "city_keys": 140, "skipped_alternates": 3, "city_collisions": 1,
                "countries": 96, "country_keys": 300, "aliases_added": 12, "continents": 7,
                "skipped_records": 0
            },
            "overrides": {"source": "bundled override table", "rows_read": 410, "keys": 398, "discard_keys": 20},
            "region_zones": 36,
            "domestic_country": "Colombia",
            "fuzzy_min_similarity": 0.9
        });

        let rendered = render_reference_stats(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Reference data loaded successfully."));
            assert!(text.contains("Fuzzy similarity floor:  0.90"));
            assert!(text.contains("Gazetteer:"));
            assert!(text.contains("Manual overrides:"));
            assert!(text.contains("398"));
            assert!(text.contains("Region zones:"));
        }
    }
}
