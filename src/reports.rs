// Grouping of raw settlement rows into per-region, per-municipality and
// per-type summaries.
//
// Groups are collected in a `BTreeMap`, so before ranking they are ordered by
// name. The ranking sort is stable: groups with equal population keep that
// alphabetical order. Population sums saturate at `u64::MAX`.
use crate::types::{
    MunicipalityRow, MunicipalitySummary, RegionRow, RegionSummary, TypeDistribution, TypeRow,
};
use log::debug;
use std::collections::{BTreeMap, HashSet};

pub fn aggregate_by_region(rows: &[RegionRow]) -> Vec<RegionSummary> {
    #[derive(Default)]
    struct Acc<'a> {
        population: u64,
        municipalities: HashSet<&'a str>,
        settlements: usize,
    }

    let mut map: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in rows {
        let e = map.entry(r.region.as_str()).or_default();
        e.population = e.population.saturating_add(r.population.unwrap_or(0));
        e.municipalities.insert(r.municipality.as_str());
        e.settlements += 1;
    }
    debug!("aggregated {} rows into {} regions", rows.len(), map.len());

    let mut out: Vec<RegionSummary> = map
        .into_iter()
        .map(|(name, acc)| RegionSummary {
            name: name.to_string(),
            population: acc.population,
            municipality_count: acc.municipalities.len(),
            settlement_count: acc.settlements,
        })
        .collect();
    out.sort_by(|a, b| b.population.cmp(&a.population));
    out
}

/// Population sum and settlement count per municipality, largest first.
/// Settlements without a population are not counted.
pub fn aggregate_by_municipality(rows: &[MunicipalityRow]) -> Vec<MunicipalitySummary> {
    let mut map: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for r in rows {
        let e = map.entry(r.municipality.as_str()).or_insert((0, 0));
        e.0 = e.0.saturating_add(r.population.unwrap_or(0));
        e.1 += usize::from(r.population.is_some());
    }
    debug!("aggregated {} rows into {} municipalities", rows.len(), map.len());

    let mut out: Vec<MunicipalitySummary> = map
        .into_iter()
        .map(|(name, (population_total, settlement_count))| MunicipalitySummary {
            name: name.to_string(),
            settlement_count,
            population_total,
        })
        .collect();
    out.sort_by(|a, b| b.population_total.cmp(&a.population_total));
    out
}

/// Population sum and settlement count per settlement type, largest first.
///
/// Rows are not filtered here: zero populations are counted, a missing
/// population adds nothing to either figure but the type still appears.
pub fn distribution_by_type(rows: &[TypeRow]) -> Vec<TypeDistribution> {
    let mut map: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for r in rows {
        let e = map.entry(r.settlement_type.as_str()).or_insert((0, 0));
        e.0 = e.0.saturating_add(r.population.unwrap_or(0));
        e.1 += usize::from(r.population.is_some());
    }

    let mut out: Vec<TypeDistribution> = map
        .into_iter()
        .map(|(settlement_type, (population, count))| TypeDistribution {
            settlement_type: settlement_type.to_string(),
            population,
            count,
        })
        .collect();
    out.sort_by(|a, b| b.population.cmp(&a.population));
    out
}

/// Population sum of every region, in region-name order.
pub fn region_populations(rows: &[RegionRow]) -> Vec<u64> {
    let mut map: BTreeMap<&str, u64> = BTreeMap::new();
    for r in rows {
        let e = map.entry(r.region.as_str()).or_insert(0);
        *e = e.saturating_add(r.population.unwrap_or(0));
    }
    map.into_values().collect()
}

/// Population sum of every municipality, in municipality-name order.
pub fn municipality_populations(rows: &[MunicipalityRow]) -> Vec<u64> {
    let mut map: BTreeMap<&str, u64> = BTreeMap::new();
    for r in rows {
        let e = map.entry(r.municipality.as_str()).or_insert(0);
        *e = e.saturating_add(r.population.unwrap_or(0));
    }
    map.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn groups_regions() {
        let rows = vec![
            RegionRow::new("A", "X", Some(1_000_000)),
            RegionRow::new("A", "Y", Some(100_000)),
            RegionRow::new("B", "Z", Some(500_000)),
        ];
        assert_eq!(
            aggregate_by_region(&rows),
            vec![
                RegionSummary {
                    name: "A".into(),
                    population: 1_100_000,
                    municipality_count: 2,
                    settlement_count: 2,
                },
                RegionSummary {
                    name: "B".into(),
                    population: 500_000,
                    municipality_count: 1,
                    settlement_count: 1,
                },
            ]
        );
    }

    #[test]
    fn region_counts_distinct_municipalities_and_all_settlements() {
        let rows = vec![
            RegionRow::new("Волгоград", "Камышин", Some(10)),
            RegionRow::new("Волгоград", "Камышин", None),
            RegionRow::new("Волгоград", "Волжский", Some(5)),
        ];
        let out = aggregate_by_region(&rows);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].population, 15);
        assert_eq!(out[0].municipality_count, 2);
        assert_eq!(out[0].settlement_count, 3);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_by_region(&[]).is_empty());
        assert!(aggregate_by_municipality(&[]).is_empty());
        assert!(distribution_by_type(&[]).is_empty());
    }

    #[test]
    fn ties_keep_name_order() {
        let rows = vec![
            RegionRow::new("C", "x", Some(5)),
            RegionRow::new("A", "x", Some(5)),
            RegionRow::new("B", "x", Some(9)),
        ];
        let names: Vec<String> = aggregate_by_region(&rows).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn groups_municipalities() {
        let rows = vec![
            MunicipalityRow::new("A", Some(1_000_000)),
            MunicipalityRow::new("A", Some(500_000)),
            MunicipalityRow::new("B", Some(100_000)),
        ];
        assert_eq!(
            aggregate_by_municipality(&rows),
            vec![
                MunicipalitySummary {
                    name: "A".into(),
                    settlement_count: 2,
                    population_total: 1_500_000,
                },
                MunicipalitySummary {
                    name: "B".into(),
                    settlement_count: 1,
                    population_total: 100_000,
                },
            ]
        );
    }

    #[test]
    fn municipality_count_skips_missing_populations() {
        let rows = vec![
            MunicipalityRow::new("A", Some(10)),
            MunicipalityRow::new("A", None),
            MunicipalityRow::new("A", Some(0)),
        ];
        let out = aggregate_by_municipality(&rows);
        assert_eq!(out[0].settlement_count, 2);
        assert_eq!(out[0].population_total, 10);
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let rows = vec![
            RegionRow::new("A", "x", Some(u64::MAX)),
            RegionRow::new("A", "y", Some(u64::MAX)),
        ];
        assert_eq!(aggregate_by_region(&rows)[0].population, u64::MAX);
        assert_eq!(region_populations(&rows), vec![u64::MAX]);

        let rows = vec![
            MunicipalityRow::new("m", Some(u64::MAX)),
            MunicipalityRow::new("m", Some(5)),
        ];
        assert_eq!(aggregate_by_municipality(&rows)[0].population_total, u64::MAX);
        assert_eq!(municipality_populations(&rows), vec![u64::MAX]);

        let rows = vec![TypeRow::new("t", Some(u64::MAX)), TypeRow::new("t", Some(1))];
        assert_eq!(distribution_by_type(&rows)[0].population, u64::MAX);
    }

    #[test]
    fn distribution_counts_zero_but_not_missing_populations() {
        let rows = vec![
            TypeRow::new("Село", Some(300)),
            TypeRow::new("Город", Some(90_000)),
            TypeRow::new("Село", Some(0)),
            TypeRow::new("Хутор", None),
        ];
        assert_eq!(
            distribution_by_type(&rows),
            vec![
                TypeDistribution {
                    settlement_type: "Город".into(),
                    population: 90_000,
                    count: 1,
                },
                TypeDistribution {
                    settlement_type: "Село".into(),
                    population: 300,
                    count: 2,
                },
                TypeDistribution {
                    settlement_type: "Хутор".into(),
                    population: 0,
                    count: 0,
                },
            ]
        );
    }

    #[test]
    fn group_sums() {
        let rows = vec![
            RegionRow::new("B", "x", Some(1)),
            RegionRow::new("A", "y", Some(2)),
            RegionRow::new("B", "z", None),
        ];
        assert_eq!(region_populations(&rows), vec![2, 1]);
        let rows = vec![
            MunicipalityRow::new("x", Some(4)),
            MunicipalityRow::new("x", Some(6)),
        ];
        assert_eq!(municipality_populations(&rows), vec![10]);
    }

    fn region_rows() -> impl Strategy<Value = Vec<RegionRow>> {
        prop::collection::vec(
            (0usize..5, 0usize..4, prop::option::of(0u64..100_000)),
            0..40,
        )
        .prop_map(|v| {
            v.into_iter()
                .map(|(r, m, p)| RegionRow::new(&format!("R{}", r), &format!("M{}", m), p))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn one_summary_per_region_regardless_of_order(rows in region_rows()) {
            let distinct: HashSet<&str> = rows.iter().map(|r| r.region.as_str()).collect();
            let out = aggregate_by_region(&rows);
            prop_assert_eq!(out.len(), distinct.len());
            prop_assert!(out.windows(2).all(|w| w[0].population >= w[1].population));

            let mut reversed = rows.clone();
            reversed.reverse();
            prop_assert_eq!(aggregate_by_region(&reversed), out);
        }
    }
}
