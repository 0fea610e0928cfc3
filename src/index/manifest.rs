//! Typed sidecar index for a data directory.
//!
//! `index.json` records each file's descriptor explicitly so lookups no longer
//! depend on filename parsing. Directories without a manifest are still read
//! through [`FileIndexer`], which keeps the flat filename convention working.

use crate::error::Result;
use crate::index::file_index::{FileIndexer, IndexScan, IndexedFile, ScanIssue, ScanMode};
use crate::models::FileDescriptor;
use crate::utils::constants::{MANIFEST_FILE, MANIFEST_VERSION};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name relative to the manifest's directory
    pub file: String,
    #[serde(flatten)]
    pub descriptor: FileDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub mode: ScanMode,
    pub generated_at: NaiveDateTime,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn from_scan(scan: &IndexScan) -> Self {
        let entries = scan
            .entries
            .iter()
            .filter_map(|entry| {
                let file = entry.path.file_name()?.to_str()?.to_string();
                Some(ManifestEntry {
                    file,
                    descriptor: entry.descriptor.clone(),
                })
            })
            .collect();

        Self {
            version: MANIFEST_VERSION,
            mode: scan.mode,
            generated_at: Local::now().naive_local(),
            entries,
        }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Write `index.json` into `dir`
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = Self::path_in(dir);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!("Wrote {} manifest entries to {}", self.entries.len(), path.display());
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Resolve entries against `dir`, dropping any whose file no longer exists
    pub fn into_scan(self, dir: &Path) -> IndexScan {
        let mut scan = IndexScan {
            dir: dir.to_path_buf(),
            mode: self.mode,
            entries: Vec::with_capacity(self.entries.len()),
            issues: Vec::new(),
        };

        for entry in self.entries {
            if entry.file.contains(['/', '\\']) || entry.file == ".." {
                scan.issues.push(ScanIssue::MalformedFilename {
                    file: entry.file,
                    reason: "manifest entries must be plain file names".to_string(),
                });
                continue;
            }

            let path = dir.join(&entry.file);
            if !path.is_file() {
                warn!("Manifest entry {} points at a missing file", entry.file);
                scan.issues.push(ScanIssue::StaleManifestEntry { file: entry.file });
                continue;
            }

            scan.entries.push(IndexedFile {
                descriptor: entry.descriptor,
                path,
            });
        }

        scan
    }

    /// Prefer the directory's manifest; fall back to decoding filenames.
    ///
    /// Files added after the manifest was written are still indexed, by name.
    pub fn load_index(dir: &Path, mode: ScanMode) -> IndexScan {
        let path = Self::path_in(dir);
        if !path.is_file() {
            return FileIndexer::scan(dir, mode);
        }

        match Self::read(&path) {
            Ok(manifest) if manifest.version == MANIFEST_VERSION && manifest.mode == mode => {
                info!("Using manifest {}", path.display());
                let listed: HashSet<String> =
                    manifest.entries.iter().map(|e| e.file.clone()).collect();
                let mut scan = manifest.into_scan(dir);
                merge_unlisted(&mut scan, FileIndexer::scan(dir, mode), &listed);
                scan
            }
            Ok(manifest) => {
                warn!(
                    "Ignoring manifest {} (version {}, mode {}); scanning filenames",
                    path.display(),
                    manifest.version,
                    manifest.mode
                );
                FileIndexer::scan(dir, mode)
            }
            Err(e) => {
                warn!("Unreadable manifest {}: {}; scanning filenames", path.display(), e);
                let mut scan = FileIndexer::scan(dir, mode);
                scan.issues.push(ScanIssue::Unreadable {
                    path,
                    reason: e.to_string(),
                });
                scan
            }
        }
    }

    /// Scan `dir` by filename and write the result as its manifest
    pub fn export(dir: &Path, mode: ScanMode) -> Result<(Self, PathBuf)> {
        let scan = FileIndexer::scan(dir, mode);
        let manifest = Self::from_scan(&scan);
        let path = manifest.write(dir)?;
        Ok((manifest, path))
    }
}

/// Append filename-decoded entries for files the manifest does not name
fn merge_unlisted(scan: &mut IndexScan, by_filename: IndexScan, listed: &HashSet<String>) {
    let mut unlisted = 0;
    for entry in by_filename.entries {
        let name = entry.path.file_name().and_then(|n| n.to_str());
        if name.map_or(false, |n| listed.contains(n)) {
            continue;
        }
        scan.entries.push(entry);
        unlisted += 1;
    }

    for issue in by_filename.issues {
        if matches!(&issue, ScanIssue::MalformedFilename { file, .. } if !listed.contains(file)) {
            scan.issues.push(issue);
        }
    }

    if unlisted > 0 {
        warn!(
            "{} files in {} are not in its manifest; indexed by filename",
            unlisted,
            scan.dir.display()
        );
    }
}
