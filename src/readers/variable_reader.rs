use crate::error::{AtlasError, Result};
use crate::utils::dates::parse_day_first;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// A single plotted variable read from a `Meteorological Variables/` CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Reads CSVs with a case-insensitive `date` column; the first other column is the value
pub struct VariableReader;

impl VariableReader {
    pub fn read(path: &Path) -> Result<VariableSeries> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        let headers = reader.headers()?.clone();

        let date_index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("date"))
            .ok_or_else(|| AtlasError::MissingColumn {
                column: "date".to_string(),
                file: path.display().to_string(),
            })?;

        let value_index = (0..headers.len())
            .find(|&i| i != date_index)
            .ok_or_else(|| AtlasError::MissingColumn {
                column: "<value>".to_string(),
                file: path.display().to_string(),
            })?;

        let name = headers.get(value_index).unwrap_or_default().to_string();
        let mut points = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result?;
            let date = parse_day_first(record.get(date_index).unwrap_or_default())?;

            match record.get(value_index).map(str::parse::<f64>) {
                Some(Ok(value)) => points.push((date, value)),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(
                "Skipped {} rows without a numeric '{}' value in {}",
                skipped,
                name,
                path.display()
            );
        }

        points.sort_by_key(|(date, _)| *date);
        Ok(VariableSeries { name, points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_first_non_date_column_is_value() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "Humidity,DATE,WindSpeed")?;
        writeln!(temp_file, "71.5,02-01-2010,3.2")?;
        writeln!(temp_file, ",01-01-2010,2.9")?;
        writeln!(temp_file, "68.0,01-01-2010,2.8")?;

        let series = VariableReader::read(temp_file.path())?;

        assert_eq!(series.name, "Humidity");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].0, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(series.points[0].1, 68.0);
        assert_eq!(series.points[1].1, 71.5);
        Ok(())
    }

    #[test]
    fn test_missing_date_column() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "Day,Humidity")?;
        writeln!(temp_file, "1,71.5")?;

        assert!(matches!(
            VariableReader::read(temp_file.path()),
            Err(AtlasError::MissingColumn { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_date_only_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "Date")?;
        writeln!(temp_file, "01-01-2010")?;

        assert!(matches!(
            VariableReader::read(temp_file.path()),
            Err(AtlasError::MissingColumn { .. })
        ));
        Ok(())
    }
}
