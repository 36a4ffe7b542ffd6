// allocation-core/src/ports/unit_of_work.rs

// Le Unit of Work est la frontière transactionnelle consommée par le message bus.
// Le bus n'a besoin que d'une chose : `collect_new_events`, appelé après chaque handler.
// Les handlers, eux, ouvrent une `Transaction` : commit explicite, rollback par défaut.

use std::ops::{Deref, DerefMut};
use tracing::warn;

use crate::domain::message::Event;
use crate::domain::ports::Repository;
use crate::domain::read_model::AllocationsView;
use crate::error::AllocationError;

pub trait UnitOfWork {
    /// Entrée dans le scope transactionnel.
    fn begin(&mut self) -> Result<(), AllocationError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), AllocationError>;

    /// Annule tout ce qui n'a pas été commité. Sans effet juste après un commit.
    fn rollback(&mut self) -> Result<(), AllocationError>;

    /// Vide les events accumulés par les agrégats touchés dans ce scope.
    /// Un second appel sans nouveau travail renvoie une liste vide.
    fn collect_new_events(&mut self) -> Vec<Box<dyn Event>>;
}

/// Unit of Work de l'exemple d'allocation : un repository de Product + le read model.
pub trait AllocationUnitOfWork: UnitOfWork {
    type Products: Repository;

    fn products(&mut self) -> &mut Self::Products;

    fn allocations_view(&mut self) -> &mut AllocationsView;
}

/// Scope transactionnel (équivalent d'un `with uow:`).
///
/// Le drop déclenche toujours un rollback : tout ce qui n'a pas été commité
/// est perdu, y compris quand le handler sort en erreur via `?`.
pub struct Transaction<'a, U: UnitOfWork + ?Sized> {
    uow: &'a mut U,
}

impl<'a, U: UnitOfWork + ?Sized> Transaction<'a, U> {
    pub fn begin(uow: &'a mut U) -> Result<Self, AllocationError> {
        uow.begin()?;
        Ok(Self { uow })
    }

    pub fn commit(self) -> Result<(), AllocationError> {
        self.uow.commit()
    }
}

impl<U: UnitOfWork + ?Sized> Deref for Transaction<'_, U> {
    type Target = U;

    fn deref(&self) -> &U {
        self.uow
    }
}

impl<U: UnitOfWork + ?Sized> DerefMut for Transaction<'_, U> {
    fn deref_mut(&mut self) -> &mut U {
        self.uow
    }
}

impl<U: UnitOfWork + ?Sized> Drop for Transaction<'_, U> {
    fn drop(&mut self) {
        if let Err(e) = self.uow.rollback() {
            warn!(error = %e, "Rollback failed while leaving transaction scope");
        }
    }
}
