pub mod constants;
pub mod dates;
pub mod progress;

pub use constants::*;
pub use dates::{add_one_year, deserialize_day_first, parse_day_first};
pub use progress::ProgressReporter;
