//! Named report operations for the three dashboard pages.
//!
//! Every operation runs one row-source query, aggregates the rows and hands
//! back display-ready values. The page bundles at the bottom combine them
//! the way each page needs them.
use crate::breadcrumb::{build_breadcrumb, Crumb, Location};
use crate::error::{Error, Result};
use crate::present::{
    format_column, paginate, statistics_to_formatted, to_json, to_records, Page, PopulationPoint,
    Record,
};
use crate::reports::{
    aggregate_by_municipality, aggregate_by_region, distribution_by_type,
    municipality_populations, region_populations,
};
use crate::source::{RowSource, SettlementFilter};
use crate::statistics::calculate_statistics;
use crate::types::{FormattedStatistics, GeneralStats, SettlementDetail};
use log::debug;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;

pub struct StatisticsFacade<'a, S: RowSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: RowSource + ?Sized> StatisticsFacade<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Regions ranked by population, population formatted.
    pub fn top_regions(&self) -> Result<Vec<Record>> {
        let rows = self.source.fetch_all(&SettlementFilter::all())?;
        debug!("top_regions: {} rows", rows.len());
        let mut records = to_records(&aggregate_by_region(&rows))?;
        format_column(&mut records, "population");
        Ok(records)
    }

    /// Statistics over the population sums of all regions.
    pub fn population_stats(&self) -> Result<FormattedStatistics> {
        let rows = self.source.fetch_all(&SettlementFilter::all())?;
        let stats = calculate_statistics(region_populations(&rows));
        Ok(statistics_to_formatted(&stats))
    }

    /// Unit and settlement counts. The region count is global and only
    /// reported when no region is selected.
    pub fn general_stats(&self, region: Option<&str>) -> Result<GeneralStats> {
        let regions = match region {
            Some(_) => None,
            None => Some(self.source.count_regions()?),
        };
        let municipalities = self.source.count_municipalities(region)?;
        let counts = self.source.fetch_counts(region, None)?;
        Ok(GeneralStats {
            regions,
            municipalities: Some(municipalities),
            settlements: counts.total,
            empty_settlements: counts.empty,
            populated_settlements: counts.populated,
        })
    }

    /// Statistics over the population sums of the region's municipalities.
    pub fn population_stats_by_region(&self, region: &str) -> Result<FormattedStatistics> {
        let rows = self.source.fetch_by_region(region)?;
        let stats = calculate_statistics(municipality_populations(&rows));
        Ok(statistics_to_formatted(&stats))
    }

    pub fn municipalities_by_region(&self, region: &str) -> Result<Vec<Record>> {
        let rows = self.source.fetch_by_region(region)?;
        debug!("municipalities_by_region({}): {} rows", region, rows.len());
        let mut records = to_records(&aggregate_by_municipality(&rows))?;
        format_column(&mut records, "population_total");
        Ok(records)
    }

    /// Population and settlement count per type, raw numbers for the chart.
    pub fn settlement_types_distribution(&self, filter: &SettlementFilter) -> Result<Vec<Record>> {
        let rows = self.source.fetch_type_populations(filter)?;
        to_records(&distribution_by_type(&rows))
    }

    /// JSON array of `{"population": n}` for every inhabited settlement
    /// matching `filter`.
    pub fn population_distribution(&self, filter: &SettlementFilter) -> Result<String> {
        let filter = filter.clone().populated();
        let points: Vec<PopulationPoint> = self
            .source
            .fetch_populations(&filter)?
            .into_iter()
            .flatten()
            .map(|population| PopulationPoint { population })
            .collect();
        to_json(&points)
    }

    pub fn municipality_general_stats(
        &self,
        region: &str,
        municipality: &str,
    ) -> Result<GeneralStats> {
        let counts = self.source.fetch_counts(Some(region), Some(municipality))?;
        Ok(GeneralStats {
            regions: None,
            municipalities: None,
            settlements: counts.total,
            empty_settlements: counts.empty,
            populated_settlements: counts.populated,
        })
    }

    /// Statistics over the populations of the municipality's settlements.
    pub fn municipality_population_stats(
        &self,
        region: &str,
        municipality: &str,
    ) -> Result<FormattedStatistics> {
        let rows = self.source.fetch_by_municipality(region, municipality)?;
        Ok(statistics_to_formatted(&calculate_statistics(&rows)))
    }

    pub fn municipality_settlements(
        &self,
        region: &str,
        municipality: &str,
        search: Option<&str>,
        settlement_type: Option<&str>,
    ) -> Result<Vec<SettlementDetail>> {
        self.source
            .fetch_details(region, municipality, search, settlement_type)
    }

    pub fn settlement_types(&self, region: &str, municipality: &str) -> Result<Vec<String>> {
        Ok(self
            .source
            .fetch_types(region, municipality)?
            .into_iter()
            .collect())
    }

    pub fn overview(&self) -> Result<OverviewReport> {
        let all = SettlementFilter::all();
        Ok(OverviewReport {
            top_regions: self.top_regions()?,
            population_stats: self.population_stats()?,
            settlement_types: self.settlement_types_distribution(&all)?,
            general_stats: self.general_stats(None)?,
            population_distribution: self.population_distribution(&all)?,
            breadcrumb: build_breadcrumb(&Location::Overview),
        })
    }

    pub fn region_report(&self, region: &str) -> Result<RegionReport> {
        let filter = SettlementFilter::for_region(region);
        Ok(RegionReport {
            region_name: region.to_string(),
            region_stats: self.general_stats(Some(region))?,
            population_stats: self.population_stats_by_region(region)?,
            municipalities: self.municipalities_by_region(region)?,
            settlement_types_chart: self.settlement_types_distribution(&filter)?,
            population_distribution: self.population_distribution(&filter)?,
            breadcrumb: build_breadcrumb(&Location::Region(region.to_string())),
        })
    }

    pub fn municipality_report(
        &self,
        query: &MunicipalityQuery,
        per_page: usize,
    ) -> Result<MunicipalityReport> {
        let (region, municipality) = (query.region.as_str(), query.municipality.as_str());
        if !self.source.has_municipality(region, municipality)? {
            return Err(Error::municipality_not_found(region, municipality));
        }

        let settlements = self.municipality_settlements(
            region,
            municipality,
            query.search.as_deref(),
            query.settlement_type.as_deref(),
        )?;
        let page = paginate(settlements, query.page, per_page);
        let filter = SettlementFilter::for_municipality(region, municipality);

        Ok(MunicipalityReport {
            region_name: region.to_string(),
            municipality: municipality.to_string(),
            population_stats: self.municipality_population_stats(region, municipality)?,
            general_stats: self.municipality_general_stats(region, municipality)?,
            total_results: page.count,
            page,
            search_query: query.search.clone().unwrap_or_default(),
            selected_type: query.settlement_type.clone().unwrap_or_default(),
            settlement_types: self.settlement_types(region, municipality)?,
            settlement_types_chart: self.settlement_types_distribution(&filter)?,
            population_distribution: self.population_distribution(&filter)?,
            breadcrumb: build_breadcrumb(&Location::Municipality {
                region: region.to_string(),
                municipality: municipality.to_string(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MunicipalityQuery {
    pub region: String,
    pub municipality: String,
    pub search: Option<String>,
    pub settlement_type: Option<String>,
    pub page: Option<usize>,
}

impl MunicipalityQuery {
    pub fn new(region: &str, municipality: &str) -> Self {
        Self {
            region: region.to_string(),
            municipality: municipality.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub top_regions: Vec<Record>,
    pub population_stats: FormattedStatistics,
    pub settlement_types: Vec<Record>,
    pub general_stats: GeneralStats,
    pub population_distribution: String,
    pub breadcrumb: Vec<Crumb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    pub region_name: String,
    pub region_stats: GeneralStats,
    pub population_stats: FormattedStatistics,
    pub municipalities: Vec<Record>,
    pub settlement_types_chart: Vec<Record>,
    pub population_distribution: String,
    pub breadcrumb: Vec<Crumb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MunicipalityReport {
    pub region_name: String,
    pub municipality: String,
    pub population_stats: FormattedStatistics,
    pub general_stats: GeneralStats,
    pub page: Page<SettlementDetail>,
    pub total_results: usize,
    pub search_query: String,
    pub selected_type: String,
    pub settlement_types: Vec<String>,
    pub settlement_types_chart: Vec<Record>,
    pub population_distribution: String,
    pub breadcrumb: Vec<Crumb>,
}
