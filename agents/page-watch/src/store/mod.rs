//! Last-seen fingerprint persistence
//!
//! A single plain text file holding one trimmed digest. Single writer, no
//! locking. Anything that prevents reading the file counts as "no baseline".

use crate::contracts::Fingerprint;
use crate::error::StoreError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed fingerprint store
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last persisted fingerprint, if any
    pub fn load(&self) -> Option<Fingerprint> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let fingerprint = Fingerprint::from_persisted(&content);
                if let Some(ref fp) = fingerprint {
                    if !fp.is_well_formed() {
                        tracing::warn!(
                            path = %self.path.display(),
                            "State file does not hold a SHA-256 digest, treating as a stale baseline"
                        );
                    }
                }
                fingerprint
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read state file, treating as absent"
                );
                None
            }
        }
    }

    /// Overwrite the persisted fingerprint
    pub fn save(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        std::fs::write(&self.path, fingerprint.as_str()).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
