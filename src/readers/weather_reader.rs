use crate::error::{AtlasError, Result};
use crate::models::{RainfallRow, TemperatureRow, WeatherRecord};
use crate::utils::constants::{MASTER_COLUMNS, RAINFALL_COLUMNS, TEMPERATURE_COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Reads the master weather table and the per-region split files
pub struct WeatherReader {
    trim: bool,
}

impl WeatherReader {
    pub fn new() -> Self {
        Self { trim: true }
    }

    pub fn with_trim(trim: bool) -> Self {
        Self { trim }
    }

    /// Read the master table (`State,District,Block,Date,Rainfall,Max_Temperature,Min_Temperature`)
    pub fn read_master(&self, path: &Path) -> Result<Vec<WeatherRecord>> {
        self.read_rows(path, &MASTER_COLUMNS)
    }

    /// Read a `<State>_<District>_<Block>_Rainfall.csv` file
    pub fn read_rainfall(&self, path: &Path) -> Result<Vec<RainfallRow>> {
        self.read_rows(path, &RAINFALL_COLUMNS)
    }

    /// Read a `<State>_<District>_<Block>_Temperature.csv` file
    pub fn read_temperature(&self, path: &Path) -> Result<Vec<TemperatureRow>> {
        self.read_rows(path, &TEMPERATURE_COLUMNS)
    }

    fn read_rows<T: DeserializeOwned>(&self, path: &Path, required: &[&str]) -> Result<Vec<T>> {
        let mut reader = ReaderBuilder::new()
            .trim(if self.trim { Trim::All } else { Trim::None })
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        require_columns(&headers, required, path)?;

        let mut rows = Vec::new();
        for result in reader.deserialize::<T>() {
            rows.push(result?);
        }

        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that every required column is present in a header row
pub fn require_columns(headers: &StringRecord, required: &[&str], file: &Path) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(AtlasError::MissingColumn {
                column: column.to_string(),
                file: file.display().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_master_day_first() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "State,District,Block,Date,Rainfall,Max_Temperature,Min_Temperature"
        )?;
        writeln!(temp_file, "Punjab,Amritsar,Ajnala,05-03-1995,12.5,30.1,18.4")?;
        writeln!(temp_file, "Punjab, Amritsar ,Ajnala,06/03/1995,0,29.0,17.9")?;

        let records = WeatherReader::new().read_master(temp_file.path())?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(1995, 3, 5).unwrap());
        assert_eq!(records[0].rainfall, Some(12.5));
        assert_eq!(records[1].district, "Amritsar");
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(1995, 3, 6).unwrap());

        Ok(())
    }

    #[test]
    fn test_blank_readings_are_missing() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "State,District,Block,Date,Rainfall,Max_Temperature,Min_Temperature"
        )?;
        writeln!(temp_file, "Punjab,Amritsar,Ajnala,05-03-1995,,30.1,18.4")?;
        writeln!(temp_file, "Punjab,Amritsar,Ajnala,06-03-1995,2.0, ,")?;

        let records = WeatherReader::new().read_master(temp_file.path())?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rainfall, None);
        assert_eq!(records[0].max_temperature, Some(30.1));
        assert_eq!(records[1].max_temperature, None);
        assert_eq!(records[1].min_temperature, None);
        Ok(())
    }

    #[test]
    fn test_missing_column() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "State,District,Block,Date,Rainfall")?;
        writeln!(temp_file, "Punjab,Amritsar,Ajnala,05-03-1995,12.5")?;

        let err = WeatherReader::new().read_master(temp_file.path()).unwrap_err();
        match err {
            AtlasError::MissingColumn { column, .. } => assert_eq!(column, "Max_Temperature"),
            other => panic!("unexpected error: {}", other),
        }

        // The same file is a valid rainfall split file
        assert_eq!(WeatherReader::new().read_rainfall(temp_file.path())?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_bad_date_propagates() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "State,District,Block,Date,Rainfall,Max_Temperature,Min_Temperature"
        )?;
        writeln!(temp_file, "Punjab,Amritsar,Ajnala,someday,12.5,30.1,18.4")?;

        assert!(WeatherReader::new().read_master(temp_file.path()).is_err());
        Ok(())
    }
}
