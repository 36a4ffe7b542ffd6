// allocation-core/src/ports/mod.rs

pub mod notifications;
pub mod store;
pub mod unit_of_work;

pub use notifications::Notifications;
pub use store::{Snapshot, SnapshotStore};
pub use unit_of_work::{AllocationUnitOfWork, Transaction, UnitOfWork};
