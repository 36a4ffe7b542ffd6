// allocation-core/src/application/bus/registry.rs

// Table de routage du bus, construite une fois puis partagée en lecture seule.
// - Command : TypeId -> exactement un handler.
// - Event   : TypeId -> liste ordonnée de handlers (ordre d'enregistrement).
// Les handlers sont stockés effacés (`&dyn Any` en entrée) et re-typés par downcast.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::application::bus::dependencies::{Dependencies, HandlerContext};
use crate::application::bus::error::BusError;
use crate::application::bus::MessageBus;
use crate::domain::configuration::BusConfig;
use crate::domain::message::{Command, Event};

pub(crate) type CommandFn<U, R, E> =
    Box<dyn Fn(&dyn Any, &mut HandlerContext<'_, U>) -> Result<R, E> + Send + Sync>;
pub(crate) type EventFn<U, E> =
    Box<dyn Fn(&dyn Any, &mut HandlerContext<'_, U>) -> Result<(), E> + Send + Sync>;

/// Un handler enregistré : identité (chemin Rust), dépendances déclarées, appel effacé.
pub(crate) struct Route<F> {
    pub message: &'static str,
    pub handler: &'static str,
    pub requires: &'static [&'static str],
    pub call: F,
}

pub struct HandlerRegistry<U, R, E> {
    commands: HashMap<TypeId, Route<CommandFn<U, R, E>>>,
    events: HashMap<TypeId, Vec<Route<EventFn<U, E>>>>,
}

impl<U, R, E> Default for HandlerRegistry<U, R, E> {
    fn default() -> Self {
        Self {
            commands: HashMap::new(),
            events: HashMap::new(),
        }
    }
}

impl<U, R, E> HandlerRegistry<U, R, E> {
    pub(crate) fn command_route(&self, type_id: TypeId) -> Option<&Route<CommandFn<U, R, E>>> {
        self.commands.get(&type_id)
    }

    /// Absence d'entrée = liste vide.
    pub(crate) fn event_routes(&self, type_id: TypeId) -> &[Route<EventFn<U, E>>] {
        self.events.get(&type_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn command_handler_count(&self) -> usize {
        self.commands.len()
    }

    pub fn event_handler_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    fn routes(&self) -> impl Iterator<Item = (&'static str, &'static [&'static str])> + '_ {
        let commands = self.commands.values().map(|r| (r.handler, r.requires));
        let events = self
            .events
            .values()
            .flatten()
            .map(|r| (r.handler, r.requires));
        commands.chain(events)
    }
}

// Fixe la signature higher-ranked attendue pour la closure effacée.
fn erase_command<U, R, E, F>(f: F) -> CommandFn<U, R, E>
where
    F: Fn(&dyn Any, &mut HandlerContext<'_, U>) -> Result<R, E> + Send + Sync + 'static,
{
    Box::new(f)
}

fn erase_event<U, E, F>(f: F) -> EventFn<U, E>
where
    F: Fn(&dyn Any, &mut HandlerContext<'_, U>) -> Result<(), E> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Assemble le registre et la carte de dépendances, puis valide le tout dans `build`.
///
/// Les problèmes de câblage (handler de commande en double, dépendance "uow",
/// dépendance déclarée mais absente) sont accumulés et remontés ensemble.
pub struct MessageBusBuilder<U, R, E> {
    registry: HandlerRegistry<U, R, E>,
    dependencies: Dependencies,
    config: BusConfig,
    problems: Vec<BusError>,
}

impl<U, R, E> Default for MessageBusBuilder<U, R, E> {
    fn default() -> Self {
        Self {
            registry: HandlerRegistry::default(),
            dependencies: Dependencies::default(),
            config: BusConfig::default(),
            problems: Vec::new(),
        }
    }
}

impl<U, R, E> MessageBusBuilder<U, R, E>
where
    U: 'static,
    R: 'static,
    E: From<BusError> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre LE handler de la commande `C`.
    pub fn command<C, F>(mut self, requires: &'static [&'static str], handler: F) -> Self
    where
        C: Command,
        F: Fn(&C, &mut HandlerContext<'_, U>) -> Result<R, E> + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<C>();
        let handler_name = type_name::<F>();

        if let Some(existing) = self.registry.commands.get(&type_id) {
            self.problems.push(BusError::DuplicateCommandHandler {
                command: existing.message,
                existing: existing.handler,
                duplicate: handler_name,
            });
            return self;
        }

        let call = erase_command(move |payload, ctx| {
            let command = payload
                .downcast_ref::<C>()
                .ok_or(BusError::PayloadMismatch {
                    handler: handler_name,
                    expected: type_name::<C>(),
                })?;
            handler(command, ctx)
        });

        self.registry.commands.insert(
            type_id,
            Route {
                message: type_name::<C>(),
                handler: handler_name,
                requires,
                call,
            },
        );
        self
    }

    /// Ajoute un handler (de plus) pour l'event `Ev`.
    pub fn event<Ev, F>(mut self, requires: &'static [&'static str], handler: F) -> Self
    where
        Ev: Event,
        F: Fn(&Ev, &mut HandlerContext<'_, U>) -> Result<(), E> + Send + Sync + 'static,
    {
        let handler_name = type_name::<F>();

        let call = erase_event(move |payload, ctx| {
            let event = payload
                .downcast_ref::<Ev>()
                .ok_or(BusError::PayloadMismatch {
                    handler: handler_name,
                    expected: type_name::<Ev>(),
                })?;
            handler(event, ctx)
        });

        self.registry
            .events
            .entry(TypeId::of::<Ev>())
            .or_default()
            .push(Route {
                message: type_name::<Ev>(),
                handler: handler_name,
                requires,
                call,
            });
        self
    }

    pub fn dependency<T: Any + Send + Sync>(mut self, name: &'static str, value: T) -> Self {
        if let Err(problem) = self.dependencies.insert(name, value) {
            self.problems.push(problem);
        }
        self
    }

    pub fn config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(mut self, uow: U) -> Result<MessageBus<U, R, E>, BusError> {
        let missing: Vec<BusError> = self
            .registry
            .routes()
            .flat_map(|(handler, requires)| {
                requires
                    .iter()
                    .filter(|name| !self.dependencies.contains(name))
                    .map(move |name| BusError::MissingDependency {
                        handler,
                        name: name.to_string(),
                    })
            })
            .collect();
        self.problems.extend(missing);

        match self.problems.len() {
            0 => {}
            1 => return Err(self.problems.remove(0)),
            _ => {
                return Err(BusError::Configuration {
                    problems: self.problems,
                });
            }
        }

        debug!(
            commands = self.registry.command_handler_count(),
            event_handlers = self.registry.event_handler_count(),
            dependencies = ?self.dependencies,
            "Message bus built"
        );

        Ok(MessageBus::from_parts(
            Arc::new(self.registry),
            Arc::new(self.dependencies),
            self.config,
            uow,
        ))
    }
}
