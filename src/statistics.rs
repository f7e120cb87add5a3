//! Five-number population statistics.
//!
//! Series come either as plain values (group sums) or as the one-column rows
//! handed out by [`RowSource::fetch_by_municipality`](crate::source::RowSource),
//! so the input is anything implementing [`PopulationValue`].
use crate::types::PopulationStatistics;
use crate::util::{average, median};

/// A single entry of a population series.
///
/// `None` marks a missing entry. A one-column row unwraps to its inner value
/// with a missing population read as `0`. `i128` holds every `u64` and `i64`
/// value exactly.
pub trait PopulationValue {
    fn population_value(&self) -> Option<i128>;
}

impl PopulationValue for u64 {
    fn population_value(&self) -> Option<i128> {
        Some(i128::from(*self))
    }
}

impl PopulationValue for u32 {
    fn population_value(&self) -> Option<i128> {
        Some(i128::from(*self))
    }
}

impl PopulationValue for i64 {
    fn population_value(&self) -> Option<i128> {
        Some(i128::from(*self))
    }
}

impl<T: PopulationValue> PopulationValue for Option<T> {
    fn population_value(&self) -> Option<i128> {
        self.as_ref().and_then(PopulationValue::population_value)
    }
}

impl<T: PopulationValue> PopulationValue for (T,) {
    fn population_value(&self) -> Option<i128> {
        Some(self.0.population_value().unwrap_or(0))
    }
}

impl<T: PopulationValue + ?Sized> PopulationValue for &T {
    fn population_value(&self) -> Option<i128> {
        (**self).population_value()
    }
}

/// Compute mean, median, max, min and total over a population series.
///
/// Missing entries and entries `<= 0` are dropped first, so settlements with
/// no inhabitants never pull `min` down to zero. They are left out of `total`
/// as well. Fractional results are truncated; a total beyond `u64::MAX`
/// saturates.
pub fn calculate_statistics<I>(series: I) -> PopulationStatistics
where
    I: IntoIterator,
    I::Item: PopulationValue,
{
    let values: Vec<u64> = series
        .into_iter()
        .filter_map(|v| v.population_value())
        .filter(|v| *v > 0)
        .map(|v| u64::try_from(v).unwrap_or(u64::MAX))
        .collect();

    if values.is_empty() {
        return PopulationStatistics::default();
    }

    PopulationStatistics {
        mean: average(&values),
        median: median(values.clone()),
        max: values.iter().copied().max().unwrap_or(0),
        min: values.iter().copied().min().unwrap_or(0),
        total: saturating_sum(&values),
    }
}

fn saturating_sum(values: &[u64]) -> u64 {
    let sum: u128 = values.iter().map(|v| u128::from(*v)).sum();
    u64::try_from(sum).unwrap_or(u64::MAX)
}
