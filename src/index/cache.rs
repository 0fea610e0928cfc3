use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

struct CachedSource<T> {
    modified: SystemTime,
    value: Arc<T>,
}

/// Read-through cache keyed by source path.
///
/// An entry is reused while the path's modification time is unchanged. For a
/// directory that is the newest mtime among the directory and the files directly
/// in it, so files rewritten in place are noticed. Paths without a readable
/// mtime are never cached.
pub struct SourceCache<T> {
    entries: HashMap<PathBuf, CachedSource<T>>,
}

impl<T> SourceCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        let modified = source_modified(path);

        if let (Some(modified), Some(cached)) = (modified, self.entries.get(path)) {
            if cached.modified == modified {
                debug!("Cache hit for {}", path.display());
                return Ok(Arc::clone(&cached.value));
            }
        }

        let value = Arc::new(load(path)?);
        match modified {
            Some(modified) => {
                self.entries.insert(
                    path.to_path_buf(),
                    CachedSource {
                        modified,
                        value: Arc::clone(&value),
                    },
                );
            }
            None => {
                self.entries.remove(path);
            }
        }
        Ok(value)
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn source_modified(path: &Path) -> Option<SystemTime> {
    let metadata = fs::metadata(path).ok()?;
    let mut newest = metadata.modified().ok()?;

    if metadata.is_dir() {
        for entry in fs::read_dir(path).ok()?.flatten() {
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                newest = newest.max(modified);
            }
        }
    }
    Some(newest)
}
