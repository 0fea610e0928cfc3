pub mod cache;
pub mod file_index;
pub mod manifest;

pub use cache::SourceCache;
pub use file_index::{
    FileIndexer, IndexScan, IndexedFile, PercentileIndex, ScanIssue, ScanMode, VariableIndex,
};
pub use manifest::{Manifest, ManifestEntry};
