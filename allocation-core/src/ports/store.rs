// allocation-core/src/ports/store.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::model::Product;
use crate::domain::read_model::AllocationsView;
use crate::error::AllocationError;

/// État persisté complet : agrégats (écriture) + read model (lecture).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub products: BTreeMap<String, Product>,
    #[serde(default)]
    pub allocations: AllocationsView,
}

pub trait SnapshotStore: Send {
    fn load(&self) -> Result<Snapshot, AllocationError>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), AllocationError>;
}

// Permet `StoreUnitOfWork<Box<dyn SnapshotStore>>` quand le backend est choisi par la config.
impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self) -> Result<Snapshot, AllocationError> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), AllocationError> {
        (**self).save(snapshot)
    }
}
