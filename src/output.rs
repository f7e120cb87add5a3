use crate::error::Result;
use crate::present::Record;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV for dynamic records. The header comes from the first record.
pub fn write_records_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    if let Some(first) = records.first() {
        wtr.write_record(first.keys())?;
    }
    for record in records {
        wtr.write_record(record.values().map(cell))?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct Stamped<'a, T> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a T,
}

/// Write `value` as pretty JSON with a `generated_at` timestamp added.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let stamped = Stamped {
        generated_at: Utc::now(),
        report: value,
    };
    let s = serde_json::to_string_pretty(&stamped)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn preview_records(records: &[Record], max_rows: usize) {
    println!("{}\n", render_records(records, max_rows));
}

fn render_records(records: &[Record], max_rows: usize) -> String {
    let Some(first) = records.first() else {
        return "(no rows)".to_string();
    };
    let mut builder = Builder::default();
    builder.push_record(first.keys().cloned());
    for record in records.iter().take(max_rows) {
        builder.push_record(record.values().map(cell));
    }
    builder.build().with(Style::markdown()).to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            json!({"name": "Волгоградская", "population": "2 500 000"})
                .as_object()
                .cloned()
                .unwrap(),
            json!({"name": "Тверская", "population": "1 200 000"})
                .as_object()
                .cloned()
                .unwrap(),
        ]
    }

    #[test]
    fn records_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.csv");
        write_records_csv(&path, &records()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "name,population\nВолгоградская,2 500 000\nТверская,1 200 000\n"
        );
    }

    #[test]
    fn json_carries_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &json!({"settlements": 3})).unwrap();
        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["settlements"], json!(3));
        assert!(parsed["generated_at"].is_string());
    }

    #[test]
    fn preview_respects_row_limit() {
        let table = render_records(&records(), 1);
        assert!(table.contains("Волгоградская"));
        assert!(!table.contains("Тверская"));
        assert_eq!(render_records(&[], 5), "(no rows)");
    }
}
