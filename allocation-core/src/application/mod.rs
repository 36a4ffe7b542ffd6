// allocation-core/src/application/mod.rs

pub mod bootstrap;
pub mod bus;
pub mod handlers;
pub mod views;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait simplement :
// `use allocation_core::application::{bootstrap_from_config, views};`

pub use bootstrap::{AllocationBus, ConfiguredUnitOfWork, bootstrap, bootstrap_from_config};
pub use bus::{BusError, HandlerContext, Message, MessageBus, MessageBusBuilder};
