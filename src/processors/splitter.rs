use crate::error::Result;
use crate::models::{FileDescriptor, RegionSeries, WeatherRecord};
use crate::processors::GroupedLoader;
use crate::readers::WeatherReader;
use crate::utils::constants::{MET_DIR, RAINFALL_TOKEN, TEMPERATURE_TOKEN};
use crate::utils::progress::ProgressReporter;
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SplitReport {
    pub output_dir: PathBuf,
    pub regions: usize,
    pub records: usize,
    pub files_written: Vec<PathBuf>,
}

impl SplitReport {
    pub fn summary(&self) -> String {
        format!(
            "Split {} records into {} regions ({} files) under '{}'",
            self.records,
            self.regions,
            self.files_written.len(),
            self.output_dir.display()
        )
    }
}

/// Writes one Rainfall and one Temperature CSV per (State, District, Block)
pub struct CsvSplitter {
    output_dir: PathBuf,
    reader: WeatherReader,
}

impl CsvSplitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            reader: WeatherReader::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn split_file(
        &self,
        input: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<SplitReport> {
        let records = self.reader.read_master(input)?;
        self.split_records(records, progress)
    }

    pub fn split_records(
        &self,
        records: Vec<WeatherRecord>,
        progress: Option<&ProgressReporter>,
    ) -> Result<SplitReport> {
        let record_count = records.len();
        let catalog = GroupedLoader::group_records(records);

        // Every name is checked before anything touches the disk
        let planned = catalog
            .iter()
            .map(|series| self.region_paths(series).map(|paths| (series, paths)))
            .collect::<Result<Vec<_>>>()?;

        fs::create_dir_all(&self.output_dir)?;

        let mut files_written = Vec::with_capacity(planned.len() * 2);
        for (series, paths) in planned {
            if let Some(p) = progress {
                p.set_message(&format!("Writing {}", series.key));
            }

            write_region(series, &paths)?;
            files_written.extend(paths);

            if let Some(p) = progress {
                p.increment(series.len() as u64);
            }
        }

        let report = SplitReport {
            output_dir: self.output_dir.clone(),
            regions: catalog.len(),
            records: record_count,
            files_written,
        };
        info!("{}", report.summary());
        Ok(report)
    }

    /// Rainfall and Temperature file paths for one region
    fn region_paths(&self, series: &RegionSeries) -> Result<[PathBuf; 2]> {
        let rainfall = FileDescriptor::new(&series.key, RAINFALL_TOKEN, "csv").encode()?;
        let temperature = FileDescriptor::new(&series.key, TEMPERATURE_TOKEN, "csv").encode()?;
        Ok([self.output_dir.join(rainfall), self.output_dir.join(temperature)])
    }
}

impl Default for CsvSplitter {
    fn default() -> Self {
        Self::new(MET_DIR)
    }
}

fn write_region(series: &RegionSeries, paths: &[PathBuf; 2]) -> Result<()> {
    let [rainfall_path, temperature_path] = paths;
    write_rows(
        rainfall_path,
        series.records.iter().map(WeatherRecord::rainfall_row),
    )?;
    write_rows(
        temperature_path,
        series.records.iter().map(WeatherRecord::temperature_row),
    )?;

    debug!(
        "Wrote {} rows for {} to {} and {}",
        series.len(),
        series.key,
        rainfall_path.display(),
        temperature_path.display()
    );
    Ok(())
}

fn write_rows<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
