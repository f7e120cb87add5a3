//! Read access to settlement records.
//!
//! The report facade only talks to a [`RowSource`]. [`InMemorySource`] backs
//! it with the settlements imported from CSV.
use crate::error::Result;
use crate::types::{
    MunicipalityRow, RegionRow, Settlement, SettlementCounts, SettlementDetail, TypeRow,
};
use std::collections::{BTreeMap, BTreeSet};

/// Optional restrictions on the settlements a query sees. Every field that
/// is set must match; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementFilter {
    pub region: Option<String>,
    pub municipality: Option<String>,
    pub settlement_type: Option<String>,
    /// Population must be at least this; settlements without a population never match.
    pub min_population: Option<u64>,
    /// Case-insensitive substring of the settlement name.
    pub search: Option<String>,
}

impl SettlementFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_region(region: &str) -> Self {
        Self {
            region: Some(region.to_string()),
            ..Self::default()
        }
    }

    pub fn for_municipality(region: &str, municipality: &str) -> Self {
        Self {
            region: Some(region.to_string()),
            municipality: Some(municipality.to_string()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, settlement_type: &str) -> Self {
        self.settlement_type = Some(settlement_type.to_string());
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_min_population(mut self, min: u64) -> Self {
        self.min_population = Some(min);
        self
    }

    /// Only settlements with at least one inhabitant.
    pub fn populated(self) -> Self {
        self.with_min_population(1)
    }

    pub fn matches(&self, s: &Settlement) -> bool {
        if self.region.as_deref().is_some_and(|r| r != s.region) {
            return false;
        }
        if self.municipality.as_deref().is_some_and(|m| m != s.municipality) {
            return false;
        }
        if self.settlement_type.as_deref().is_some_and(|t| t != s.settlement_type) {
            return false;
        }
        if let Some(min) = self.min_population {
            if s.population.map_or(true, |p| p < min) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref() {
            if !s.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Storage-side queries the reports are built from.
pub trait RowSource {
    fn fetch_all(&self, filter: &SettlementFilter) -> Result<Vec<RegionRow>>;

    fn fetch_by_region(&self, region: &str) -> Result<Vec<MunicipalityRow>>;

    /// One single-column row per settlement of the municipality.
    fn fetch_by_municipality(&self, region: &str, municipality: &str)
        -> Result<Vec<(Option<u64>,)>>;

    fn fetch_types(&self, region: &str, municipality: &str) -> Result<BTreeSet<String>>;

    fn fetch_counts(
        &self,
        region: Option<&str>,
        municipality: Option<&str>,
    ) -> Result<SettlementCounts>;

    /// Settlements of a municipality, largest population first.
    fn fetch_details(
        &self,
        region: &str,
        municipality: &str,
        search: Option<&str>,
        settlement_type: Option<&str>,
    ) -> Result<Vec<SettlementDetail>>;

    fn fetch_type_populations(&self, filter: &SettlementFilter) -> Result<Vec<TypeRow>>;

    fn fetch_populations(&self, filter: &SettlementFilter) -> Result<Vec<Option<u64>>>;

    fn count_regions(&self) -> Result<usize>;

    fn count_municipalities(&self, region: Option<&str>) -> Result<usize>;

    fn has_municipality(&self, region: &str, municipality: &str) -> Result<bool>;
}

/// Row source over settlements held in memory.
///
/// Regions and municipalities are registered separately from settlements so
/// units without any settlement still count.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    municipalities: BTreeMap<String, BTreeSet<String>>,
    settlements: Vec<Settlement>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settlements(settlements: Vec<Settlement>) -> Self {
        let mut source = Self::new();
        for s in settlements {
            source.insert(s);
        }
        source
    }

    pub fn add_region(&mut self, region: &str) {
        self.municipalities.entry(region.to_string()).or_default();
    }

    pub fn add_municipality(&mut self, region: &str, municipality: &str) {
        self.municipalities
            .entry(region.to_string())
            .or_default()
            .insert(municipality.to_string());
    }

    pub fn insert(&mut self, settlement: Settlement) {
        self.add_municipality(&settlement.region, &settlement.municipality);
        self.settlements.push(settlement);
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }

    fn select<'a>(
        &'a self,
        filter: &'a SettlementFilter,
    ) -> impl Iterator<Item = &'a Settlement> + 'a {
        self.settlements.iter().filter(move |s| filter.matches(s))
    }
}

impl RowSource for InMemorySource {
    fn fetch_all(&self, filter: &SettlementFilter) -> Result<Vec<RegionRow>> {
        Ok(self
            .select(filter)
            .map(|s| RegionRow::new(&s.region, &s.municipality, s.population))
            .collect())
    }

    fn fetch_by_region(&self, region: &str) -> Result<Vec<MunicipalityRow>> {
        let filter = SettlementFilter::for_region(region);
        Ok(self
            .select(&filter)
            .map(|s| MunicipalityRow::new(&s.municipality, s.population))
            .collect())
    }

    fn fetch_by_municipality(
        &self,
        region: &str,
        municipality: &str,
    ) -> Result<Vec<(Option<u64>,)>> {
        let filter = SettlementFilter::for_municipality(region, municipality);
        Ok(self.select(&filter).map(|s| (s.population,)).collect())
    }

    fn fetch_types(&self, region: &str, municipality: &str) -> Result<BTreeSet<String>> {
        let filter = SettlementFilter::for_municipality(region, municipality);
        Ok(self
            .select(&filter)
            .map(|s| s.settlement_type.clone())
            .collect())
    }

    fn fetch_counts(
        &self,
        region: Option<&str>,
        municipality: Option<&str>,
    ) -> Result<SettlementCounts> {
        let filter = SettlementFilter {
            region: region.map(str::to_string),
            municipality: municipality.map(str::to_string),
            ..SettlementFilter::default()
        };
        let (total, populated) = self.select(&filter).fold((0, 0), |(t, p), s| {
            (t + 1, p + usize::from(s.population.unwrap_or(0) > 0))
        });
        Ok(SettlementCounts {
            total,
            populated,
            empty: total - populated,
        })
    }

    fn fetch_details(
        &self,
        region: &str,
        municipality: &str,
        search: Option<&str>,
        settlement_type: Option<&str>,
    ) -> Result<Vec<SettlementDetail>> {
        let mut filter = SettlementFilter::for_municipality(region, municipality);
        // Blank form fields mean "no restriction".
        if let Some(t) = settlement_type.filter(|t| !t.is_empty()) {
            filter = filter.with_type(t);
        }
        if let Some(q) = search.filter(|q| !q.is_empty()) {
            filter = filter.with_search(q);
        }
        let mut details: Vec<SettlementDetail> = self
            .select(&filter)
            .map(|s| SettlementDetail {
                name: s.name.clone(),
                settlement_type: s.settlement_type.clone(),
                population: s.population,
            })
            .collect();
        details.sort_by(|a, b| b.population.cmp(&a.population));
        Ok(details)
    }

    fn fetch_type_populations(&self, filter: &SettlementFilter) -> Result<Vec<TypeRow>> {
        Ok(self
            .select(filter)
            .map(|s| TypeRow::new(&s.settlement_type, s.population))
            .collect())
    }

    fn fetch_populations(&self, filter: &SettlementFilter) -> Result<Vec<Option<u64>>> {
        Ok(self.select(filter).map(|s| s.population).collect())
    }

    fn count_regions(&self) -> Result<usize> {
        Ok(self.municipalities.len())
    }

    fn count_municipalities(&self, region: Option<&str>) -> Result<usize> {
        Ok(match region {
            Some(r) => self.municipalities.get(r).map_or(0, BTreeSet::len),
            None => self.municipalities.values().map(BTreeSet::len).sum(),
        })
    }

    fn has_municipality(&self, region: &str, municipality: &str) -> Result<bool> {
        Ok(self
            .municipalities
            .get(region)
            .is_some_and(|m| m.contains(municipality)))
    }
}
