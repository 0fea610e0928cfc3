pub mod chart_data;
pub mod grouped_loader;
pub mod integrity_checker;
pub mod splitter;

pub use chart_data::{ChartData, ChartOutcome, ChartPreparer, ChartRequest, PlotSeries, XDomain};
pub use grouped_loader::GroupedLoader;
pub use integrity_checker::{
    IntegrityChecker, IntegrityReport, RecordViolation, RegionStatistics, ViolationType,
};
pub use splitter::{CsvSplitter, SplitReport};
