// allocation-core/src/infrastructure/store/json.rs

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::AllocationError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::store::{Snapshot, SnapshotStore};

/// Store persistant : un fichier JSON unique, réécrit atomiquement à chaque commit.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Snapshot, AllocationError> {
        if !self.path.exists() {
            debug!("No store file yet, starting from an empty snapshot");
            return Ok(Snapshot::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), AllocationError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        // Fichier temporaire dans le même dossier : le rename reste atomique.
        let mut temp_file = tempfile::NamedTempFile::new_in(&parent)?;
        serde_json::to_writer_pretty(&mut temp_file, snapshot)?;
        temp_file.flush()?;
        temp_file
            .persist(&self.path)
            .map_err(|e| InfrastructureError::Io(e.error))?;

        debug!(products = snapshot.products.len(), "Snapshot persisted");
        Ok(())
    }
}
