// allocation-core/src/infrastructure/store/memory.rs

use crate::error::AllocationError;
use crate::ports::store::{Snapshot, SnapshotStore};

/// Store volatile : tests et exécutions sans persistance.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshot: Snapshot,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Snapshot, AllocationError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), AllocationError> {
        self.snapshot = snapshot.clone();
        Ok(())
    }
}
