use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::WeatherRecord;

/// Identity of a growing region: (State, District, Block)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionKey {
    pub state: String,
    pub district: String,
    pub block: String,
}

impl RegionKey {
    pub fn new(state: &str, district: &str, block: &str) -> Self {
        Self {
            state: state.to_string(),
            district: district.to_string(),
            block: block.to_string(),
        }
    }

    /// Composite `"District-Block"` lookup key
    pub fn district_block(&self) -> String {
        district_block_key(&self.district, &self.block)
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.state, self.district, self.block)
    }
}

pub fn district_block_key(district: &str, block: &str) -> String {
    format!("{}-{}", district, block)
}

/// Date-ordered records of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    pub key: RegionKey,
    pub records: Vec<WeatherRecord>,
}

impl RegionSeries {
    /// Build a series, ordering records by date (stable for equal dates)
    pub fn new(key: RegionKey, mut records: Vec<WeatherRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { key, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn date_range(&self) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// State -> "District-Block" -> region series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionCatalog {
    regions: BTreeMap<String, BTreeMap<String, RegionSeries>>,
}

impl RegionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: RegionSeries) {
        self.regions
            .entry(series.key.state.clone())
            .or_default()
            .insert(series.key.district_block(), series);
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn district_blocks(&self, state: &str) -> Vec<&str> {
        self.regions
            .get(state)
            .map(|blocks| blocks.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn series(&self, state: &str, district_block: &str) -> Option<&RegionSeries> {
        self.regions.get(state)?.get(district_block)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionSeries> {
        self.regions.values().flat_map(|blocks| blocks.values())
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record_count(&self) -> usize {
        self.iter().map(RegionSeries::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(block: &str, day: u32) -> WeatherRecord {
        WeatherRecord::new(
            "Punjab",
            "Amritsar",
            block,
            NaiveDate::from_ymd_opt(2001, 6, day).unwrap(),
            1.0,
            35.0,
            25.0,
        )
    }

    #[test]
    fn test_district_block_key() {
        let key = RegionKey::new("Punjab", "Amritsar", "Ajnala");
        assert_eq!(key.district_block(), "Amritsar-Ajnala");
    }

    #[test]
    fn test_series_sorted_by_date() {
        let key = RegionKey::new("Punjab", "Amritsar", "Ajnala");
        let series = RegionSeries::new(key, vec![record("Ajnala", 3), record("Ajnala", 1)]);
        let days: Vec<u32> = series
            .records
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(days, vec![1, 3]);
    }

    #[test]
    fn test_catalog_lookup() {
        let mut catalog = RegionCatalog::new();
        for block in ["Ajnala", "Verka"] {
            let key = RegionKey::new("Punjab", "Amritsar", block);
            catalog.insert(RegionSeries::new(key, vec![record(block, 1)]));
        }

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.record_count(), 2);
        assert_eq!(catalog.states().collect::<Vec<_>>(), vec!["Punjab"]);
        assert_eq!(
            catalog.district_blocks("Punjab"),
            vec!["Amritsar-Ajnala", "Amritsar-Verka"]
        );
        assert!(catalog.series("Punjab", "Amritsar-Verka").is_some());
        assert!(catalog.series("Haryana", "Amritsar-Verka").is_none());
    }
}
