// allocation-core/src/application/bus/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Erreurs propres au message bus (câblage et exécution).
///
/// Les erreurs métier des handlers de commandes ne passent PAS par ici :
/// elles remontent telles quelles dans le type d'erreur `E` du bus.
#[derive(Error, Debug, Diagnostic)]
pub enum BusError {
    #[error("No handler registered for command {command}")]
    #[diagnostic(
        code(allocation::bus::unhandled_command),
        help("Register a handler with MessageBusBuilder::command before building the bus.")
    )]
    UnhandledCommand { command: &'static str },

    #[error("Command {command} already handled by {existing}, cannot also register {duplicate}")]
    #[diagnostic(
        code(allocation::bus::duplicate_command_handler),
        help("A command has exactly one handler. Use an event for fan-out.")
    )]
    DuplicateCommandHandler {
        command: &'static str,
        existing: &'static str,
        duplicate: &'static str,
    },

    #[error("'uow' is reserved for the unit of work and cannot be registered as a dependency")]
    #[diagnostic(code(allocation::bus::reserved_dependency))]
    ReservedDependency,

    #[error("Handler {handler} requires dependency '{name}', which is not registered")]
    #[diagnostic(
        code(allocation::bus::missing_dependency),
        help("Add it with MessageBusBuilder::dependency(\"{name}\", ...).")
    )]
    MissingDependency { handler: &'static str, name: String },

    #[error("Handler {handler} asked for dependency '{name}' without declaring it")]
    #[diagnostic(code(allocation::bus::undeclared_dependency))]
    UndeclaredDependency { handler: &'static str, name: String },

    #[error("Dependency '{name}' is not of type {expected}")]
    #[diagnostic(code(allocation::bus::dependency_type_mismatch))]
    DependencyTypeMismatch { name: String, expected: &'static str },

    #[error("Handler {handler} received a payload that is not a {expected}")]
    #[diagnostic(code(allocation::bus::payload_mismatch))]
    PayloadMismatch {
        handler: &'static str,
        expected: &'static str,
    },

    #[error("Cascade limit exceeded: more than {limit} messages in a single handle() call")]
    #[diagnostic(
        code(allocation::bus::cascade_limit),
        help("An event handler probably re-emits the event that triggered it. Raise bus.max-messages only if the cascade is legitimate.")
    )]
    CascadeLimitExceeded { limit: usize },

    #[error("{} problems in message bus configuration", .problems.len())]
    #[diagnostic(code(allocation::bus::configuration))]
    Configuration {
        #[related]
        problems: Vec<BusError>,
    },
}
