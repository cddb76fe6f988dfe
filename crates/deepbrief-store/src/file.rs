//! File-backed context store - one JSON record per identity.
//!
//! Writes go to a temp file in the same directory and are renamed into
//! place, so a reader never observes a half-written record and concurrent
//! upserts for the same identity resolve to whichever rename lands last.

use crate::{ContextStore, StoreError};
use deepbrief_core::{ContextRecord, FinalBrief, Identity};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileContextStore {
    dir: PathBuf,
}

impl FileContextStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, identity: &Identity) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(identity.as_str())))
    }
}

/// Map an opaque identity onto a safe filename.
fn sanitize(identity: &str) -> String {
    identity
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl ContextStore for FileContextStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, identity: &Identity) -> Result<Option<ContextRecord>, StoreError> {
        let path = self.record_path(identity);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: ContextRecord = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?;
        Ok(Some(record))
    }

    async fn put(&self, identity: &Identity, brief: &FinalBrief) -> Result<(), StoreError> {
        let record = ContextRecord::new(identity.clone(), brief.clone());
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let path = self.record_path(identity);
        let tmp = self
            .dir
            .join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;

        debug!("Stored brief for '{}' at {}", identity, path.display());
        Ok(())
    }
}
