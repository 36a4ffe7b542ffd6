// allocation-core/src/application/views.rs

// Côté Query de CQRS : lecture directe du read model, sans charger d'agrégat
// ni passer par le bus.

use crate::domain::read_model::AllocationRow;
use crate::error::AllocationError;
use crate::ports::unit_of_work::{AllocationUnitOfWork, Transaction};

/// Allocations connues pour une commande (vide si aucune).
pub fn allocations<U: AllocationUnitOfWork + ?Sized>(
    orderid: &str,
    uow: &mut U,
) -> Result<Vec<AllocationRow>, AllocationError> {
    // Lecture seule : la transaction se termine par un rollback.
    let mut tx = Transaction::begin(uow)?;
    Ok(tx.allocations_view().for_order(orderid))
}
