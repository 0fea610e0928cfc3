use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::models::RegionKey;
use crate::utils::constants::{COL_MAX_TEMPERATURE, COL_MIN_TEMPERATURE, COL_RAINFALL};
use crate::utils::dates::deserialize_day_first;

/// One row of the master weather table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WeatherRecord {
    #[serde(rename = "State")]
    #[validate(length(min = 1))]
    pub state: String,

    #[serde(rename = "District")]
    #[validate(length(min = 1))]
    pub district: String,

    #[serde(rename = "Block")]
    #[validate(length(min = 1))]
    pub block: String,

    #[serde(rename = "Date", deserialize_with = "deserialize_day_first")]
    pub date: NaiveDate,

    // Millimetres; a blank cell is a missing reading and is written back blank
    #[serde(rename = "Rainfall")]
    #[validate(range(min = 0.0))]
    pub rainfall: Option<f64>,

    // Degrees Celsius
    #[serde(rename = "Max_Temperature")]
    #[validate(range(min = -60.0, max = 60.0))]
    pub max_temperature: Option<f64>,

    #[serde(rename = "Min_Temperature")]
    #[validate(range(min = -60.0, max = 60.0))]
    pub min_temperature: Option<f64>,
}

impl WeatherRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        block: impl Into<String>,
        date: NaiveDate,
        rainfall: f64,
        max_temperature: f64,
        min_temperature: f64,
    ) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            block: block.into(),
            date,
            rainfall: Some(rainfall),
            max_temperature: Some(max_temperature),
            min_temperature: Some(min_temperature),
        }
    }

    pub fn region_key(&self) -> RegionKey {
        RegionKey::new(&self.state, &self.district, &self.block)
    }

    /// Reading for `variable`, `None` when the cell was blank
    pub fn value(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::Rainfall => self.rainfall,
            Variable::MaxTemperature => self.max_temperature,
            Variable::MinTemperature => self.min_temperature,
        }
    }

    pub fn rainfall_row(&self) -> RainfallRow {
        RainfallRow {
            state: self.state.clone(),
            district: self.district.clone(),
            block: self.block.clone(),
            date: self.date,
            rainfall: self.rainfall,
        }
    }

    pub fn temperature_row(&self) -> TemperatureRow {
        TemperatureRow {
            state: self.state.clone(),
            district: self.district.clone(),
            block: self.block.clone(),
            date: self.date,
            max_temperature: self.max_temperature,
            min_temperature: self.min_temperature,
        }
    }

    /// Rebuild a full record from the two halves written by the splitter
    pub fn from_split_rows(rainfall: RainfallRow, temperature: TemperatureRow) -> Self {
        Self {
            state: rainfall.state,
            district: rainfall.district,
            block: rainfall.block,
            date: rainfall.date,
            rainfall: rainfall.rainfall,
            max_temperature: temperature.max_temperature,
            min_temperature: temperature.min_temperature,
        }
    }
}

/// Row layout of `<State>_<District>_<Block>_Rainfall.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallRow {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Block")]
    pub block: String,
    #[serde(rename = "Date", deserialize_with = "deserialize_day_first")]
    pub date: NaiveDate,
    #[serde(rename = "Rainfall")]
    pub rainfall: Option<f64>,
}

/// Row layout of `<State>_<District>_<Block>_Temperature.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRow {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Block")]
    pub block: String,
    #[serde(rename = "Date", deserialize_with = "deserialize_day_first")]
    pub date: NaiveDate,
    #[serde(rename = "Max_Temperature")]
    pub max_temperature: Option<f64>,
    #[serde(rename = "Min_Temperature")]
    pub min_temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    Rainfall,
    MaxTemperature,
    MinTemperature,
}

impl Variable {
    pub const ALL: [Variable; 3] = [
        Variable::Rainfall,
        Variable::MaxTemperature,
        Variable::MinTemperature,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Variable::Rainfall => COL_RAINFALL,
            Variable::MaxTemperature => COL_MAX_TEMPERATURE,
            Variable::MinTemperature => COL_MIN_TEMPERATURE,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variable::Rainfall => "Rainfall",
            Variable::MaxTemperature => "Max Temperature",
            Variable::MinTemperature => "Min Temperature",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Variable::Rainfall => "mm",
            Variable::MaxTemperature | Variable::MinTemperature => "°C",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Variable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "rainfall" | "rain" => Ok(Variable::Rainfall),
            "maxtemperature" | "maxtemp" | "max" => Ok(Variable::MaxTemperature),
            "mintemperature" | "mintemp" | "min" => Ok(Variable::MinTemperature),
            _ => Err(format!(
                "unknown variable '{}' (expected rainfall, max-temperature or min-temperature)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherRecord {
        WeatherRecord::new(
            "Punjab",
            "Amritsar",
            "Ajnala",
            NaiveDate::from_ymd_opt(1995, 3, 5).unwrap(),
            12.5,
            30.1,
            18.4,
        )
    }

    #[test]
    fn test_record_validation() {
        assert!(sample().validate().is_ok());

        let mut negative_rain = sample();
        negative_rain.rainfall = Some(-1.0);
        assert!(negative_rain.validate().is_err());

        let mut missing_rain = sample();
        missing_rain.rainfall = None;
        assert!(missing_rain.validate().is_ok());

        let mut blank_block = sample();
        blank_block.block.clear();
        assert!(blank_block.validate().is_err());
    }

    #[test]
    fn test_split_rows_rejoin() {
        let record = sample();
        let rejoined =
            WeatherRecord::from_split_rows(record.rainfall_row(), record.temperature_row());
        assert_eq!(rejoined, record);
    }

    #[test]
    fn test_variable_parsing() {
        assert_eq!("rainfall".parse::<Variable>().unwrap(), Variable::Rainfall);
        assert_eq!("max-temperature".parse::<Variable>().unwrap(), Variable::MaxTemperature);
        assert_eq!("Min_Temperature".parse::<Variable>().unwrap(), Variable::MinTemperature);
        assert!("humidity".parse::<Variable>().is_err());
    }

    #[test]
    fn test_variable_values() {
        let record = sample();
        assert_eq!(record.value(Variable::Rainfall), Some(12.5));
        assert_eq!(record.value(Variable::MaxTemperature), Some(30.1));
        assert_eq!(record.value(Variable::MinTemperature), Some(18.4));
    }
}
