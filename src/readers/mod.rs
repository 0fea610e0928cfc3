pub mod variable_reader;
pub mod weather_reader;

pub use variable_reader::{VariableReader, VariableSeries};
pub use weather_reader::{require_columns, WeatherReader};
