//! Turning aggregates into display values: formatted numbers, ordered
//! records and the JSON payloads consumed by the charts.
use crate::error::{Error, Result};
use crate::types::{FormattedStatistics, PopulationStatistics};
use crate::util::{format_int, format_number};
use serde::Serialize;
use serde_json::{Map, Value};

/// A single row as handed to the page layer; keys keep struct field order.
pub type Record = Map<String, Value>;

/// Project rows into records, one mapping per row.
pub fn to_records<T: Serialize>(rows: &[T]) -> Result<Vec<Record>> {
    rows.iter()
        .map(|row| match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Json(serde::ser::Error::custom(format!(
                "expected a record, got {}",
                other
            )))),
        })
        .collect()
}

/// Replace the numeric `column` of every record with its formatted string.
/// Null becomes `"0"`; strings and missing keys are left alone.
pub fn format_column(records: &mut [Record], column: &str) {
    for record in records.iter_mut() {
        let Some(value) = record.get_mut(column) else {
            continue;
        };
        let formatted = match value {
            Value::Null => format_number(None),
            Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
                (Some(u), _, _) => format_int(u),
                (None, Some(i), _) => format_int(i),
                (None, None, Some(f)) if f.is_finite() => format_int(f.trunc() as i64),
                _ => format_number(None),
            },
            _ => continue,
        };
        *value = Value::String(formatted);
    }
}

pub fn statistics_to_formatted(stats: &PopulationStatistics) -> FormattedStatistics {
    FormattedStatistics {
        mean: format_number(Some(stats.mean)),
        median: format_number(Some(stats.median)),
        max: format_number(Some(stats.max)),
        min: format_number(Some(stats.min)),
        total: format_number(Some(stats.total)),
    }
}

pub fn to_json<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// One point of the population histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulationPoint {
    pub population: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Cut one page out of `items`. No page means the first one; a page outside
/// `1..=num_pages` is clamped to the last page. There is always at least one
/// (possibly empty) page.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let count = items.len();
    let num_pages = count.div_ceil(per_page).max(1);
    let number = match page.unwrap_or(1) {
        n if (1..=num_pages).contains(&n) => n,
        _ => num_pages,
    };
    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();
    Page {
        items,
        number,
        num_pages,
        count,
        per_page,
    }
}
