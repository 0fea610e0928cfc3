use crate::error::{AtlasError, Result};
use crate::models::FileDescriptor;
use crate::utils::constants::{CSV_EXTENSIONS, IMAGE_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// State -> "District-Block" -> label -> file
pub type VariableIndex = BTreeMap<String, BTreeMap<String, BTreeMap<String, PathBuf>>>;

/// State -> "District-Block" -> quality parameter -> percentile -> file
pub type PercentileIndex =
    BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, PathBuf>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Split weather CSVs (`Met/`, `Meteorological Variables/`)
    Csv,
    /// Market images, one per variable
    Image,
    /// Quality images, optionally percentile-qualified
    Quality,
}

impl ScanMode {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ScanMode::Csv => &CSV_EXTENSIONS,
            ScanMode::Image | ScanMode::Quality => &IMAGE_EXTENSIONS,
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions().iter().any(|x| e.eq_ignore_ascii_case(x)))
            .unwrap_or(false)
    }

    pub fn decode(&self, file_name: &str) -> Result<FileDescriptor> {
        match self {
            ScanMode::Csv | ScanMode::Image => FileDescriptor::decode_variable(file_name),
            ScanMode::Quality => FileDescriptor::decode_quality(file_name),
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanMode::Csv => "csv",
            ScanMode::Image => "image",
            ScanMode::Quality => "quality",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "met" => Ok(ScanMode::Csv),
            "image" | "images" | "market" => Ok(ScanMode::Image),
            "quality" => Ok(ScanMode::Quality),
            _ => Err(format!("unknown scan mode '{}' (expected csv, image or quality)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFile {
    pub descriptor: FileDescriptor,
    pub path: PathBuf,
}

impl IndexedFile {
    /// Leaf key: the decoded label, or the raw parameter for quality images
    pub fn key(&self, mode: ScanMode) -> String {
        match mode {
            ScanMode::Quality => self.descriptor.variable.clone(),
            ScanMode::Csv | ScanMode::Image => self.descriptor.label(),
        }
    }
}

/// Something the user should hear about; none of these stop a scan
#[derive(Debug, Clone, PartialEq)]
pub enum ScanIssue {
    MissingDirectory(PathBuf),
    Unreadable { path: PathBuf, reason: String },
    NoMatchingFiles { dir: PathBuf, extensions: String },
    MalformedFilename { file: String, reason: String },
    StaleManifestEntry { file: String },
}

impl fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanIssue::MissingDirectory(dir) => {
                write!(f, "Directory '{}' does not exist", dir.display())
            }
            ScanIssue::Unreadable { path, reason } => {
                write!(f, "Could not read '{}': {}", path.display(), reason)
            }
            ScanIssue::NoMatchingFiles { dir, extensions } => write!(
                f,
                "No {} files found in '{}'",
                extensions,
                dir.display()
            ),
            ScanIssue::MalformedFilename { file, reason } => {
                write!(f, "Skipped '{}': {}", file, reason)
            }
            ScanIssue::StaleManifestEntry { file } => {
                write!(f, "Manifest lists '{}' but the file is gone", file)
            }
        }
    }
}

/// Result of one directory scan
#[derive(Debug, Clone)]
pub struct IndexScan {
    pub dir: PathBuf,
    pub mode: ScanMode,
    pub entries: Vec<IndexedFile>,
    pub issues: Vec<ScanIssue>,
}

impl IndexScan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unqualified entries (no percentile), keyed by label
    pub fn variable_index(&self) -> VariableIndex {
        let mut index = VariableIndex::new();
        for entry in self.entries.iter().filter(|e| e.descriptor.percentile.is_none()) {
            index
                .entry(entry.descriptor.state.clone())
                .or_default()
                .entry(entry.descriptor.district_block())
                .or_default()
                .insert(entry.key(self.mode), entry.path.clone());
        }
        index
    }

    /// Percentile-qualified entries
    pub fn percentile_index(&self) -> PercentileIndex {
        let mut index = PercentileIndex::new();
        for entry in &self.entries {
            if let Some(percentile) = &entry.descriptor.percentile {
                index
                    .entry(entry.descriptor.state.clone())
                    .or_default()
                    .entry(entry.descriptor.district_block())
                    .or_default()
                    .entry(entry.key(self.mode))
                    .or_default()
                    .insert(percentile.clone(), entry.path.clone());
            }
        }
        index
    }

    pub fn lookup(&self, state: &str, district_block: &str, label: &str) -> Option<&Path> {
        self.entries
            .iter()
            .rev()
            .find(|e| {
                e.descriptor.percentile.is_none()
                    && e.descriptor.state == state
                    && e.descriptor.district_block() == district_block
                    && e.key(self.mode) == label
            })
            .map(|e| e.path.as_path())
    }

    pub fn lookup_percentile(
        &self,
        state: &str,
        district_block: &str,
        parameter: &str,
        percentile: &str,
    ) -> Option<&Path> {
        self.entries
            .iter()
            .rev()
            .find(|e| {
                e.descriptor.percentile.as_deref() == Some(percentile)
                    && e.descriptor.state == state
                    && e.descriptor.district_block() == district_block
                    && e.key(self.mode) == parameter
            })
            .map(|e| e.path.as_path())
    }

    pub fn summary(&self) -> String {
        let index = self.variable_index();
        let regions: usize = index.values().map(BTreeMap::len).sum();
        format!(
            "{} {} files across {} states and {} district-blocks in '{}' ({} issues)",
            self.entries.len(),
            self.mode,
            index.len(),
            regions,
            self.dir.display(),
            self.issues.len()
        )
    }
}

/// Rebuilds indexes from filenames alone
pub struct FileIndexer;

impl FileIndexer {
    /// Scan `dir` for files of the given mode; never fails, problems land in `issues`
    pub fn scan(dir: &Path, mode: ScanMode) -> IndexScan {
        let mut scan = IndexScan {
            dir: dir.to_path_buf(),
            mode,
            entries: Vec::new(),
            issues: Vec::new(),
        };

        let names = match Self::list_files(dir, mode) {
            Ok(names) => names,
            Err(AtlasError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!("Directory {} does not exist", dir.display());
                scan.issues.push(ScanIssue::MissingDirectory(dir.to_path_buf()));
                return scan;
            }
            Err(e) => {
                warn!("Could not list {}: {}", dir.display(), e);
                scan.issues.push(ScanIssue::Unreadable {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
                return scan;
            }
        };

        if names.is_empty() {
            warn!("No {} files found in {}", mode, dir.display());
            scan.issues.push(ScanIssue::NoMatchingFiles {
                dir: dir.to_path_buf(),
                extensions: mode.extensions().join("/"),
            });
            return scan;
        }

        for name in names {
            match mode.decode(&name) {
                Ok(descriptor) => {
                    debug!("Indexed {} as {}", name, descriptor);
                    scan.entries.push(IndexedFile {
                        path: dir.join(&name),
                        descriptor,
                    });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", name, e);
                    scan.issues.push(ScanIssue::MalformedFilename {
                        file: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!("{}", scan.summary());
        scan
    }

    /// Matching file names in `dir`, sorted
    fn list_files(dir: &Path, mode: ScanMode) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !mode.accepts(&path) {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping non UTF-8 filename {:?}", raw),
            }
        }
        names.sort();
        Ok(names)
    }
}
