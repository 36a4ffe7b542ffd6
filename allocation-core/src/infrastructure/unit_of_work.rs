// allocation-core/src/infrastructure/unit_of_work.rs

use std::collections::VecDeque;
use tracing::{debug, instrument};

use crate::domain::Event;
use crate::domain::model::Product;
use crate::domain::ports::Repository;
use crate::domain::read_model::AllocationsView;
use crate::error::AllocationError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::repository::InMemoryRepository;
use crate::ports::store::{Snapshot, SnapshotStore};
use crate::ports::unit_of_work::{AllocationUnitOfWork, UnitOfWork};

/// Unit of Work adossé à un `SnapshotStore`.
///
/// - `begin` recharge l'état commité depuis le store ;
/// - `commit` relit le store, vérifie la version de chaque agrégat modifié
///   (concurrence optimiste), n'y écrit que ces agrégats et le delta du read
///   model, puis transfère leurs events dans une outbox ;
/// - `rollback` restaure le dernier état commité et jette les events non commités ;
/// - `collect_new_events` vide l'outbox.
///
/// Les agrégats non modifiés dans le scope ne sont jamais réécrits : un commit
/// ne peut pas écraser le travail commité par un autre processus.
pub struct StoreUnitOfWork<S: SnapshotStore> {
    store: S,
    committed: Snapshot,
    products: InMemoryRepository,
    allocations: AllocationsView,
    outbox: VecDeque<Box<dyn Event>>,
}

impl<S: SnapshotStore> StoreUnitOfWork<S> {
    pub fn open(store: S) -> Result<Self, AllocationError> {
        let committed = store.load()?;
        Ok(Self {
            store,
            products: InMemoryRepository::new(committed.products.clone()),
            allocations: committed.allocations.clone(),
            committed,
            outbox: VecDeque::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Dernier état commité vu par ce scope (chargé au `begin`, fusionné au `commit`).
    pub fn committed(&self) -> &Snapshot {
        &self.committed
    }

    fn restore_committed(&mut self) {
        self.products.replace(self.committed.products.clone());
        self.allocations = self.committed.allocations.clone();
    }

    /// Agrégats vus dans le scope dont la version diffère de celle chargée.
    fn modified_products(&self) -> Vec<&Product> {
        self.products
            .seen()
            .iter()
            .filter_map(|sku| self.products.products().get(sku))
            .filter(|product| {
                let loaded = self.committed.products.get(&product.sku);
                loaded.map(|p| p.version_number) != Some(product.version_number)
            })
            .collect()
    }

    fn check_versions(
        &self,
        current: &Snapshot,
        modified: &[&Product],
    ) -> Result<(), InfrastructureError> {
        for product in modified {
            let expected = self
                .committed
                .products
                .get(&product.sku)
                .map(|p| p.version_number);
            let found = current.products.get(&product.sku).map(|p| p.version_number);
            if found != expected {
                return Err(InfrastructureError::ConcurrentModification {
                    sku: product.sku.clone(),
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

impl<S: SnapshotStore> UnitOfWork for StoreUnitOfWork<S> {
    fn begin(&mut self) -> Result<(), AllocationError> {
        self.committed = self.store.load()?;
        self.restore_committed();
        Ok(())
    }

    #[instrument(skip(self))]
    fn commit(&mut self) -> Result<(), AllocationError> {
        // On repart de l'état le plus récent du store, pas de la copie du scope.
        let mut merged = self.store.load()?;

        let modified = self.modified_products();
        self.check_versions(&merged, &modified)?;
        debug!(products = modified.len(), "Commit: writing modified products");
        for product in modified {
            merged.products.insert(product.sku.clone(), product.clone());
        }
        merged
            .allocations
            .apply_changes(&self.committed.allocations, &self.allocations);

        self.store.save(&merged)?;

        // Seuls les faits commités partent vers le bus.
        let events = self.products.drain_seen_events();
        debug!(events = events.len(), "Commit: events moved to outbox");
        self.outbox.extend(events);
        self.committed = merged;
        self.restore_committed();
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), AllocationError> {
        // Les agrégats remplacés emportent leurs events non commités.
        self.restore_committed();
        Ok(())
    }

    fn collect_new_events(&mut self) -> Vec<Box<dyn Event>> {
        self.outbox.drain(..).collect()
    }
}

impl<S: SnapshotStore> AllocationUnitOfWork for StoreUnitOfWork<S> {
    type Products = InMemoryRepository;

    fn products(&mut self) -> &mut InMemoryRepository {
        &mut self.products
    }

    fn allocations_view(&mut self) -> &mut AllocationsView {
        &mut self.allocations
    }
}
