// allocation-core/src/application/bootstrap.rs

// Composition Root : le seul endroit qui connaît à la fois les handlers,
// les adapters concrets et la configuration.

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::application::bus::MessageBus;
use crate::application::handlers::{self, NOTIFICATIONS, OUT_OF_STOCK_RECIPIENT};
use crate::domain::commands::{Allocate, ChangeBatchQuantity, CreateBatch};
use crate::domain::configuration::{AppConfig, NotificationsKind, StoreKind};
use crate::domain::events::{Allocated, Deallocated, OutOfStock};
use crate::error::AllocationError;
use crate::infrastructure::notifications::{JsonlNotifications, LogNotifications};
use crate::infrastructure::store::{JsonFileStore, MemoryStore};
use crate::infrastructure::unit_of_work::StoreUnitOfWork;
use crate::ports::notifications::Notifications;
use crate::ports::store::SnapshotStore;
use crate::ports::unit_of_work::AllocationUnitOfWork;

/// Le bus de l'application : résultat = référence de lot éventuelle.
pub type AllocationBus<U> = MessageBus<U, Option<String>, AllocationError>;

/// Unit of Work choisi par la configuration.
pub type ConfiguredUnitOfWork = StoreUnitOfWork<Box<dyn SnapshotStore>>;

pub fn bootstrap<U>(
    uow: U,
    notifications: Arc<dyn Notifications>,
    config: &AppConfig,
) -> Result<AllocationBus<U>, AllocationError>
where
    U: AllocationUnitOfWork + 'static,
{
    let bus = AllocationBus::<U>::builder()
        // Commands
        .command::<CreateBatch, _>(&[], handlers::add_batch::<U>)
        .command::<Allocate, _>(&[], handlers::allocate::<U>)
        .command::<ChangeBatchQuantity, _>(&[], handlers::change_batch_quantity::<U>)
        // Events
        .event::<Allocated, _>(&[], handlers::publish_allocated_event::<U>)
        .event::<Allocated, _>(&[], handlers::add_allocation_to_read_model::<U>)
        .event::<Deallocated, _>(&[], handlers::reallocate::<U>)
        .event::<Deallocated, _>(&[], handlers::remove_allocation_from_read_model::<U>)
        .event::<OutOfStock, _>(
            &[NOTIFICATIONS, OUT_OF_STOCK_RECIPIENT],
            handlers::send_out_of_stock_notification::<U>,
        )
        // Dependencies
        .dependency(NOTIFICATIONS, notifications)
        .dependency(
            OUT_OF_STOCK_RECIPIENT,
            config.notifications.out_of_stock_recipient.clone(),
        )
        .config(config.bus.clone())
        .build(uow)?;

    info!(
        app = %config.name,
        max_messages = ?config.bus.max_messages,
        "🚌 Message bus ready"
    );
    Ok(bus)
}

/// Store de snapshots selon `store.kind`. Les chemins relatifs partent du dossier projet.
pub fn store_from_config(config: &AppConfig, project_dir: &Path) -> Box<dyn SnapshotStore> {
    match config.store.kind {
        StoreKind::Memory => Box::new(MemoryStore::default()),
        StoreKind::Json => Box::new(JsonFileStore::new(project_dir.join(&config.store.path))),
    }
}

pub fn notifications_from_config(config: &AppConfig, project_dir: &Path) -> Arc<dyn Notifications> {
    match config.notifications.kind {
        NotificationsKind::Log => Arc::new(LogNotifications),
        NotificationsKind::Jsonl => Arc::new(JsonlNotifications::new(
            project_dir.join(&config.notifications.path),
        )),
    }
}

/// Assemble tout depuis la configuration : store, Unit of Work, notifications, bus.
pub fn bootstrap_from_config(
    config: &AppConfig,
    project_dir: &Path,
) -> Result<AllocationBus<ConfiguredUnitOfWork>, AllocationError> {
    let uow = StoreUnitOfWork::open(store_from_config(config, project_dir))?;
    bootstrap(uow, notifications_from_config(config, project_dir), config)
}
