//! JSON Lines file history backend.
//!
//! One serialized `ProbeResult` per line, appended as results arrive.
//! Queries scan the whole file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::history::{sort_newest_first, HistorySink, StorageError};
use crate::probe::ProbeResult;

/// Append-only file of probe results.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    /// Held for appends and for the read in `query`, so a reader never sees a
    /// half-written line. Parsing happens after the lock is released.
    writer: Mutex<File>,
}

impl FileHistory {
    /// Open (or create) the history file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!(path = %path.display(), "Opened history file");
        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, File>, StorageError> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Unavailable("history writer lock poisoned".into()))
    }
}

impl HistorySink for FileHistory {
    fn append(&self, result: &ProbeResult) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(result)?;
        line.push('\n');

        let mut file = self.lock()?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn query(&self, target: &str) -> Result<Vec<ProbeResult>, StorageError> {
        let contents = {
            let _guard = self.lock()?;
            match fs::read(&self.path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            }
        };

        let mut results = Vec::new();
        for (index, line) in contents.split(|b| *b == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<ProbeResult>(line) {
                Ok(result) if result.target == target => results.push(result),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "Skipping unreadable history line"
                    );
                }
            }
        }

        sort_newest_first(&mut results);
        Ok(results)
    }
}
