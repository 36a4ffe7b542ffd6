// allocation-core/src/application/bus/mod.rs

// Le cœur : une file FIFO qui entrelace commands et events.
//
//   handle(msg) : file = [msg]
//     tant que la file n'est pas vide :
//       - Command -> son unique handler ; erreur = abandon de tout l'appel
//       - Event   -> chacun de ses handlers ; erreur = log + handler suivant
//       après chaque handler réussi : commandes émises (ctx.issue) puis
//       uow.collect_new_events() rejoignent la queue de file.
//
// Un seul Unit of Work sert toute la cascade. Pas de concurrence interne.

pub mod dependencies;
pub mod error;
pub mod registry;

use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub use crate::domain::message::Message;
pub use dependencies::{Dependencies, HandlerContext};
pub use error::BusError;
pub use registry::{HandlerRegistry, MessageBusBuilder};

use crate::domain::configuration::BusConfig;
use crate::domain::message::{Command, Event};
use crate::ports::unit_of_work::UnitOfWork;

pub struct MessageBus<U, R, E> {
    registry: Arc<HandlerRegistry<U, R, E>>,
    dependencies: Arc<Dependencies>,
    config: BusConfig,
    uow: U,
}

impl<U, R, E> MessageBus<U, R, E> {
    pub(crate) fn from_parts(
        registry: Arc<HandlerRegistry<U, R, E>>,
        dependencies: Arc<Dependencies>,
        config: BusConfig,
        uow: U,
    ) -> Self {
        Self {
            registry,
            dependencies,
            config,
            uow,
        }
    }

    pub fn uow(&self) -> &U {
        &self.uow
    }

    pub fn uow_mut(&mut self) -> &mut U {
        &mut self.uow
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }
}

impl<U, R, E> MessageBus<U, R, E>
where
    U: UnitOfWork + 'static,
    R: 'static,
    E: From<BusError> + Display + 'static,
{
    pub fn builder() -> MessageBusBuilder<U, R, E> {
        MessageBusBuilder::new()
    }

    /// Nouveau bus avec son propre Unit of Work ; registre et dépendances partagés.
    pub fn fork(&self, uow: U) -> Self {
        Self::from_parts(
            Arc::clone(&self.registry),
            Arc::clone(&self.dependencies),
            self.config.clone(),
            uow,
        )
    }

    /// Traite `message` et toute la cascade qu'il déclenche.
    ///
    /// Retourne un résultat par commande dépilée, dans l'ordre de dépilement.
    /// La première erreur de handler de commande est renvoyée telle quelle,
    /// les résultats déjà obtenus sont alors perdus.
    #[instrument(skip_all, fields(message = message.name()))]
    pub fn handle(&mut self, message: Message) -> Result<Vec<R>, E> {
        let mut queue = VecDeque::from([message]);
        let mut results = Vec::new();
        let mut processed = 0usize;

        while let Some(message) = queue.pop_front() {
            processed += 1;
            if let Some(limit) = self.config.max_messages.filter(|&limit| processed > limit) {
                error!(
                    limit,
                    dropped = queue.len() + 1,
                    "Cascade limit reached, aborting"
                );
                return Err(BusError::CascadeLimitExceeded { limit }.into());
            }

            debug!(message = message.name(), queued = queue.len(), "Handling message");
            match message {
                Message::Event(event) => self.dispatch_event(&*event, &mut queue),
                Message::Command(command) => {
                    match self.dispatch_command(&*command, &mut queue) {
                        Ok(result) => results.push(result),
                        Err(e) => {
                            // Ce que le handler a commité avant d'échouer ne doit pas
                            // ressortir au prochain appel.
                            let discarded = self.uow.collect_new_events();
                            error!(
                                command = ?command,
                                error = %e,
                                dropped = queue.len(),
                                discarded_events = discarded.len(),
                                "Command failed, aborting"
                            );
                            return Err(e);
                        }
                    }
                }
            }
        }

        debug!(processed, results = results.len(), "Cascade complete");
        Ok(results)
    }

    fn dispatch_event(&mut self, event: &dyn Event, queue: &mut VecDeque<Message>) {
        let registry = Arc::clone(&self.registry);
        let routes = registry.event_routes(event.type_id_of());
        if routes.is_empty() {
            debug!(event = event.name(), "No handler for event");
        }

        for route in routes {
            let mut ctx = HandlerContext::new(
                &mut self.uow,
                &self.dependencies,
                route.handler,
                route.requires,
            );
            match (route.call)(event.as_any(), &mut ctx) {
                Ok(()) => {
                    queue.extend(ctx.into_issued());
                    self.enqueue_new_events(queue);
                }
                Err(e) => {
                    // Un event handler en échec n'arrête ni les autres handlers ni la cascade.
                    error!(
                        event = ?event,
                        event_type = route.message,
                        handler = route.handler,
                        error = %e,
                        "Exception handling event"
                    );
                }
            }
        }
    }

    fn dispatch_command(
        &mut self,
        command: &dyn Command,
        queue: &mut VecDeque<Message>,
    ) -> Result<R, E> {
        let registry = Arc::clone(&self.registry);
        let route = registry
            .command_route(command.type_id_of())
            .ok_or(BusError::UnhandledCommand {
                command: command.name(),
            })?;

        let mut ctx = HandlerContext::new(
            &mut self.uow,
            &self.dependencies,
            route.handler,
            route.requires,
        );
        let result = (route.call)(command.as_any(), &mut ctx)?;
        queue.extend(ctx.into_issued());
        self.enqueue_new_events(queue);
        Ok(result)
    }

    fn enqueue_new_events(&mut self, queue: &mut VecDeque<Message>) {
        queue.extend(self.uow.collect_new_events().into_iter().map(Message::Event));
    }
}
