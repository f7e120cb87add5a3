use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One line of the settlements CSV as it comes off disk.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub region: Option<String>,
    pub municipality: Option<String>,
    pub settlement: Option<String>,
    #[serde(rename = "type")]
    pub settlement_type: Option<String>,
    pub population: Option<String>,
    pub children: Option<String>,
}

/// A settlement after import: names trimmed, type classified into a category.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub region: String,
    pub municipality: String,
    pub name: String,
    pub settlement_type: String,
    pub population: Option<u64>,
    pub children_population: Option<u64>,
}

// Rows handed out by the row source. Populations stay optional here; the
// aggregator decides how a missing value counts.

#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub region: String,
    pub municipality: String,
    pub population: Option<u64>,
}

impl RegionRow {
    pub fn new(region: &str, municipality: &str, population: Option<u64>) -> Self {
        Self {
            region: region.to_string(),
            municipality: municipality.to_string(),
            population,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityRow {
    pub municipality: String,
    pub population: Option<u64>,
}

impl MunicipalityRow {
    pub fn new(municipality: &str, population: Option<u64>) -> Self {
        Self {
            municipality: municipality.to_string(),
            population,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRow {
    pub settlement_type: String,
    pub population: Option<u64>,
}

impl TypeRow {
    pub fn new(settlement_type: &str, population: Option<u64>) -> Self {
        Self {
            settlement_type: settlement_type.to_string(),
            population,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SettlementDetail {
    #[tabled(rename = "Settlement")]
    pub name: String,
    #[serde(rename = "type")]
    #[tabled(rename = "Type")]
    pub settlement_type: String,
    #[tabled(rename = "Population", display_with = "display_population")]
    pub population: Option<u64>,
}

fn display_population(population: &Option<u64>) -> String {
    crate::util::format_number(*population)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SettlementCounts {
    pub total: usize,
    pub populated: usize,
    pub empty: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    pub name: String,
    pub population: u64,
    #[serde(rename = "municipalities")]
    pub municipality_count: usize,
    #[serde(rename = "settlements")]
    pub settlement_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MunicipalitySummary {
    #[serde(rename = "municipality")]
    pub name: String,
    #[serde(rename = "settlements_count")]
    pub settlement_count: usize,
    pub population_total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDistribution {
    #[serde(rename = "type")]
    pub settlement_type: String,
    pub population: u64,
    pub count: usize,
}

/// Mean, median, max, min and total over the strictly positive populations
/// of a series. All zero when nothing survives the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulationStatistics {
    pub mean: u64,
    pub median: u64,
    pub max: u64,
    pub min: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct FormattedStatistics {
    #[tabled(rename = "Mean")]
    pub mean: String,
    #[tabled(rename = "Median")]
    pub median: String,
    #[tabled(rename = "Max")]
    pub max: String,
    #[tabled(rename = "Min")]
    pub min: String,
    #[tabled(rename = "Total")]
    pub total: String,
}

/// Unit and settlement counts for the overview, a region or a municipality.
///
/// `regions` is only present at the top level, `municipalities` is absent
/// when the scope is a single municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipalities: Option<usize>,
    pub settlements: usize,
    pub empty_settlements: usize,
    pub populated_settlements: usize,
}
