pub mod descriptor;
pub mod region;
pub mod weather;

pub use descriptor::FileDescriptor;
pub use region::{district_block_key, RegionCatalog, RegionKey, RegionSeries};
pub use weather::{RainfallRow, TemperatureRow, Variable, WeatherRecord};
