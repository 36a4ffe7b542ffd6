pub mod commands;
pub mod configuration;
pub mod error;
pub mod events;
pub mod message;
pub mod model;
pub mod ports;
pub mod read_model;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
pub use message::{Command, Event, Message};
