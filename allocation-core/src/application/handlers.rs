// allocation-core/src/application/handlers.rs

// Handlers du domaine d'allocation.
// - Command handlers : ouvrent une Transaction, font le travail, commitent. L'erreur remonte.
// - Event handlers   : réagissent à un fait. Une erreur ici est loggée par le bus, pas propagée.
// Aucun handler n'appelle un autre handler : les suites passent par les events ou ctx.issue().

use std::sync::Arc;
use tracing::{debug, info};

use crate::application::bus::HandlerContext;
use crate::domain::commands::{Allocate, ChangeBatchQuantity, CreateBatch};
use crate::domain::error::DomainError;
use crate::domain::events::{Allocated, Deallocated, OutOfStock};
use crate::domain::model::{Batch, OrderLine, Product};
use crate::domain::ports::Repository;
use crate::error::AllocationError;
use crate::ports::notifications::Notifications;
use crate::ports::unit_of_work::{AllocationUnitOfWork, Transaction};

/// Nom des dépendances injectées par `bootstrap`.
pub const NOTIFICATIONS: &str = "notifications";
pub const OUT_OF_STOCK_RECIPIENT: &str = "out_of_stock_recipient";

type Outcome = Result<Option<String>, AllocationError>;

// --- Command Handlers ---

/// Crée un lot. Le produit est créé à la volée s'il n'existe pas encore.
pub fn add_batch<U: AllocationUnitOfWork>(
    cmd: &CreateBatch,
    ctx: &mut HandlerContext<'_, U>,
) -> Outcome {
    let batch = Batch::new(&cmd.reference, &cmd.sku, cmd.qty, cmd.eta);

    let mut tx = Transaction::begin(ctx.uow())?;
    let products = tx.products();
    match products.get(&cmd.sku) {
        Some(product) => product.add_batch(batch),
        None => {
            debug!(sku = %cmd.sku, "New product");
            products.add(Product::new(&cmd.sku, vec![batch]));
        }
    }
    tx.commit()?;
    Ok(None)
}

/// Alloue une ligne de commande et retourne la référence du lot choisi
/// (`None` en cas de rupture, signalée par l'event `OutOfStock`).
pub fn allocate<U: AllocationUnitOfWork>(cmd: &Allocate, ctx: &mut HandlerContext<'_, U>) -> Outcome {
    let line = OrderLine::new(&cmd.orderid, &cmd.sku, cmd.qty);

    let mut tx = Transaction::begin(ctx.uow())?;
    let product = tx
        .products()
        .get(&cmd.sku)
        .ok_or_else(|| DomainError::InvalidSku(cmd.sku.clone()))?;
    let batchref = product.allocate(line);
    tx.commit()?;
    Ok(batchref)
}

pub fn change_batch_quantity<U: AllocationUnitOfWork>(
    cmd: &ChangeBatchQuantity,
    ctx: &mut HandlerContext<'_, U>,
) -> Outcome {
    let mut tx = Transaction::begin(ctx.uow())?;
    let product = tx
        .products()
        .get_by_batchref(&cmd.reference)
        .ok_or_else(|| DomainError::UnknownBatch(cmd.reference.clone()))?;
    product.change_batch_quantity(&cmd.reference, cmd.qty)?;
    tx.commit()?;
    Ok(None)
}

// --- Event Handlers ---

/// Point de sortie vers l'extérieur (broker, webhook...). Ici : un log structuré.
pub fn publish_allocated_event<U: AllocationUnitOfWork>(
    event: &Allocated,
    _ctx: &mut HandlerContext<'_, U>,
) -> Result<(), AllocationError> {
    info!(
        orderid = %event.orderid,
        sku = %event.sku,
        qty = event.qty,
        batchref = %event.batchref,
        "📦 Allocated"
    );
    Ok(())
}

pub fn add_allocation_to_read_model<U: AllocationUnitOfWork>(
    event: &Allocated,
    ctx: &mut HandlerContext<'_, U>,
) -> Result<(), AllocationError> {
    let mut tx = Transaction::begin(ctx.uow())?;
    tx.allocations_view()
        .insert(&event.orderid, &event.sku, &event.batchref);
    tx.commit()?;
    Ok(())
}

/// Une ligne désallouée repart dans le circuit normal d'allocation.
pub fn reallocate<U: AllocationUnitOfWork>(
    event: &Deallocated,
    ctx: &mut HandlerContext<'_, U>,
) -> Result<(), AllocationError> {
    ctx.issue(Allocate {
        orderid: event.orderid.clone(),
        sku: event.sku.clone(),
        qty: event.qty,
    });
    Ok(())
}

pub fn remove_allocation_from_read_model<U: AllocationUnitOfWork>(
    event: &Deallocated,
    ctx: &mut HandlerContext<'_, U>,
) -> Result<(), AllocationError> {
    let mut tx = Transaction::begin(ctx.uow())?;
    tx.allocations_view().remove(&event.orderid, &event.sku);
    tx.commit()?;
    Ok(())
}

pub fn send_out_of_stock_notification<U: AllocationUnitOfWork>(
    event: &OutOfStock,
    ctx: &mut HandlerContext<'_, U>,
) -> Result<(), AllocationError> {
    let notifications: Arc<dyn Notifications> = ctx.dependency(NOTIFICATIONS)?;
    let recipient: String = ctx.dependency(OUT_OF_STOCK_RECIPIENT)?;

    notifications.send(&recipient, &format!("Out of stock for SKU {}", event.sku))?;
    Ok(())
}
