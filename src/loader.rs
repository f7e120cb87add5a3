use crate::error::Result;
use crate::source::InMemorySource;
use crate::types::{RawRow, Settlement};
use crate::util::parse_u64_safe;
use csv::ReaderBuilder;
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

pub const OTHER_CATEGORY: &str = "Прочее";

// Raw type abbreviations as they appear in the census export, grouped into
// the categories shown on the dashboard.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("Город", &["г", "город", "городок", "гп"]),
    ("Поселок городского типа", &["пгт", "городское поселение", "жилрайон"]),
    ("Село", &["с", "с/п", "село", "сл", "слобода"]),
    ("Деревня", &["д", "д.", "деревня", "высел", "высельки", "починок"]),
    ("Хутор", &["х", "хутор", "заимка"]),
    ("Станица", &["ст", "ст-ца", "станица"]),
    ("Поселение коренных народов", &["аал", "аул", "арбан", "улус", "у"]),
    ("Станция", &["ж/д_ст", "ж/д_платф", "ж/д_пост", "ж/д_рзд", "рзд", "рзд. п."]),
    ("Коттеджный поселок", &["кп", "дп", "массив", "мкр"]),
    ("Садоводство", &["снт", "с/о"]),
    ("Рабочий поселок", &["рп", "п/о", "п/ст", "казарма"]),
    ("Поселок", &["п", "автодорога", "кордон", "остров"]),
    (OTHER_CATEGORY, &["c", "x", "нп", "тер", "л/п", "оп", "м", "мп", "с/с"]),
];

static CATEGORY_BY_TYPE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (category, types) in CATEGORIES {
        for t in *types {
            // First category listing a type wins.
            map.entry(*t).or_insert(*category);
        }
    }
    map
});

/// Map a raw settlement type such as `"пгт"` to its dashboard category.
/// Unknown types fall into [`OTHER_CATEGORY`].
pub fn categorize(settlement_type: &str) -> &'static str {
    CATEGORY_BY_TYPE
        .get(settlement_type.trim())
        .copied()
        .unwrap_or(OTHER_CATEGORY)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub regions: usize,
    pub municipalities: usize,
}

pub fn load_settlements(path: &Path) -> Result<(InMemorySource, LoadReport)> {
    debug!("reading settlements from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_from_reader(file)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<(InMemorySource, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut source = InMemorySource::new();
    let mut regions: HashSet<String> = HashSet::new();
    let mut municipalities: HashSet<(String, String)> = HashSet::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("row {}: {}", total_rows, e);
                skipped_rows += 1;
                continue;
            }
        };

        let (Some(region), Some(municipality), Some(name)) = (
            non_empty(row.region),
            non_empty(row.municipality),
            non_empty(row.settlement),
        ) else {
            warn!("row {}: missing region, municipality or settlement name", total_rows);
            skipped_rows += 1;
            continue;
        };

        let settlement_type = categorize(row.settlement_type.as_deref().unwrap_or(""));
        regions.insert(region.clone());
        municipalities.insert((region.clone(), municipality.clone()));

        source.insert(Settlement {
            region,
            municipality,
            name,
            settlement_type: settlement_type.to_string(),
            population: parse_u64_safe(row.population.as_deref()),
            children_population: parse_u64_safe(row.children.as_deref()),
        });
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: source.len(),
        skipped_rows,
        regions: regions.len(),
        municipalities: municipalities.len(),
    };
    Ok((source, report))
}

fn non_empty(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
