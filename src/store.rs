// src/store.rs
// =============================================================================
// Flat JSON persistence for the crawl results.
//
// Each dataset lives in its own file, data_<name>.json, as a pretty-printed
// JSON array. Saving always rewrites the whole file; merging with earlier
// results happens in memory (see reconcile.rs) before we get here.
// =============================================================================

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::model::Record;

pub const CONTRIBUTORS: &str = "contributors";
pub const DEPENDENTS: &str = "dependents";

pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the document for a dataset name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("data_{}.json", name))
    }

    /// Loads a dataset. A file that does not exist yet means "no prior state".
    pub fn load<T: Record>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let path = self.path_for(name);
        if !path.exists() {
            warn!(path = %path.display(), "file not found, starting without prior data");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let document = serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        Ok(T::from_documents(document))
    }

    /// Overwrites a dataset with `records`.
    pub fn save<T: Record>(&self, name: &str, records: &[T]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name);
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
        }

        let bytes = to_pretty_json(records).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        write_file(&path, &bytes)?;

        info!(path = %path.display(), count = records.len(), "data saved");
        Ok(path)
    }
}

// Four-space indentation, matching what earlier runs wrote
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
