// allocation-core/src/infrastructure/mod.rs

pub mod config;
pub mod error;
pub mod notifications;
pub mod repository;
pub mod store;
pub mod unit_of_work;

pub use config::load_app_config;
pub use notifications::{JsonlNotifications, LogNotifications};
pub use repository::InMemoryRepository;
pub use store::{JsonFileStore, MemoryStore};
pub use unit_of_work::StoreUnitOfWork;
