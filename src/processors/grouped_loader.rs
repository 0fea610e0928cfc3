use crate::error::{AtlasError, Result};
use crate::index::{FileIndexer, ScanMode};
use crate::models::{RegionCatalog, RegionKey, RegionSeries, WeatherRecord};
use crate::readers::WeatherReader;
use crate::utils::constants::{RAINFALL_TOKEN, TEMPERATURE_TOKEN};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Default)]
struct SplitPair {
    rainfall: Option<PathBuf>,
    temperature: Option<PathBuf>,
}

/// Builds State -> "District-Block" -> series catalogs from weather tables
pub struct GroupedLoader {
    reader: WeatherReader,
}

impl GroupedLoader {
    pub fn new() -> Self {
        Self {
            reader: WeatherReader::new(),
        }
    }

    /// Sort by date, then partition by region
    pub fn group_records(mut records: Vec<WeatherRecord>) -> RegionCatalog {
        records.sort_by_key(|r| r.date);

        let mut grouped: BTreeMap<RegionKey, Vec<WeatherRecord>> = BTreeMap::new();
        for record in records {
            grouped.entry(record.region_key()).or_default().push(record);
        }

        let mut catalog = RegionCatalog::new();
        for (key, records) in grouped {
            catalog.insert(RegionSeries::new(key, records));
        }
        catalog
    }

    /// Load and group the master weather table
    pub fn load_master(&self, path: &Path) -> Result<RegionCatalog> {
        let records = self.reader.read_master(path)?;
        let catalog = Self::group_records(records);

        info!(
            "Loaded {} records for {} regions from {}",
            catalog.record_count(),
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Rebuild the catalog by joining each region's Rainfall and Temperature split files
    pub fn load_split_dir(&self, dir: &Path) -> Result<RegionCatalog> {
        let scan = FileIndexer::scan(dir, ScanMode::Csv);

        let mut pairs: BTreeMap<RegionKey, SplitPair> = BTreeMap::new();
        for entry in &scan.entries {
            let descriptor = &entry.descriptor;
            if descriptor.since.is_some() {
                continue;
            }
            let pair = pairs.entry(descriptor.region_key()).or_default();
            match descriptor.variable.as_str() {
                RAINFALL_TOKEN => pair.rainfall = Some(entry.path.clone()),
                TEMPERATURE_TOKEN => pair.temperature = Some(entry.path.clone()),
                _ => {}
            }
        }

        let mut catalog = RegionCatalog::new();
        for (key, pair) in pairs {
            match (pair.rainfall, pair.temperature) {
                (Some(rainfall), Some(temperature)) => {
                    let records = self.join_split_files(&key, &rainfall, &temperature)?;
                    catalog.insert(RegionSeries::new(key, records));
                }
                (None, None) => {}
                _ => {
                    return Err(AtlasError::DataMerge(format!(
                        "region {} has only one of its Rainfall/Temperature files in {}",
                        key,
                        dir.display()
                    )))
                }
            }
        }

        if catalog.is_empty() {
            warn!("No split weather files found in {}", dir.display());
        }
        Ok(catalog)
    }

    fn join_split_files(
        &self,
        key: &RegionKey,
        rainfall_path: &Path,
        temperature_path: &Path,
    ) -> Result<Vec<WeatherRecord>> {
        let rainfall = self.reader.read_rainfall(rainfall_path)?;
        let temperature = self.reader.read_temperature(temperature_path)?;

        if rainfall.len() != temperature.len() {
            return Err(AtlasError::DataMerge(format!(
                "{}: {} rainfall rows but {} temperature rows",
                key,
                rainfall.len(),
                temperature.len()
            )));
        }

        let mut records = Vec::with_capacity(rainfall.len());
        for (rain, temp) in rainfall.into_iter().zip(temperature) {
            if rain.date != temp.date
                || rain.state != temp.state
                || rain.district != temp.district
                || rain.block != temp.block
            {
                return Err(AtlasError::DataMerge(format!(
                    "{}: rainfall row for {} does not line up with temperature row for {}",
                    key, rain.date, temp.date
                )));
            }
            records.push(WeatherRecord::from_split_rows(rain, temp));
        }

        Ok(records)
    }
}

impl Default for GroupedLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn record(block: &str, y: i32, m: u32, d: u32) -> WeatherRecord {
        WeatherRecord::new(
            "Punjab",
            "Amritsar",
            block,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            2.0,
            31.0,
            19.0,
        )
    }

    #[test]
    fn test_group_records_partitions_and_orders() {
        let records = vec![
            record("Ajnala", 2001, 1, 3),
            record("Verka", 2001, 1, 2),
            record("Ajnala", 2001, 1, 1),
        ];

        let catalog = GroupedLoader::group_records(records);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.record_count(), 3);
        let ajnala = catalog.series("Punjab", "Amritsar-Ajnala").unwrap();
        assert_eq!(ajnala.len(), 2);
        assert!(ajnala.records[0].date < ajnala.records[1].date);
    }

    #[test]
    fn test_split_dir_missing_partner() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("Punjab_Amritsar_Ajnala_Rainfall.csv"),
            "State,District,Block,Date,Rainfall\nPunjab,Amritsar,Ajnala,1995-03-05,12.5\n",
        )?;

        let err = GroupedLoader::new().load_split_dir(dir.path()).unwrap_err();
        assert!(matches!(err, AtlasError::DataMerge(_)));
        Ok(())
    }

    #[test]
    fn test_split_dir_mismatched_dates() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("Punjab_Amritsar_Ajnala_Rainfall.csv"),
            "State,District,Block,Date,Rainfall\nPunjab,Amritsar,Ajnala,1995-03-05,12.5\n",
        )?;
        fs::write(
            dir.path().join("Punjab_Amritsar_Ajnala_Temperature.csv"),
            "State,District,Block,Date,Max_Temperature,Min_Temperature\n\
             Punjab,Amritsar,Ajnala,1995-03-06,30.1,18.4\n",
        )?;

        assert!(GroupedLoader::new().load_split_dir(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_split_dir_missing_directory_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let catalog = GroupedLoader::new().load_split_dir(&dir.path().join("Met"))?;
        assert!(catalog.is_empty());
        Ok(())
    }
}
