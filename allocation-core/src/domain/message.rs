// allocation-core/src/domain/message.rs

// Deux familles de messages, et seulement deux :
// - Command : une intention ("fais X"), exactement un handler, l'erreur remonte.
// - Event   : un fait passé ("X s'est produit"), 0..N handlers, erreurs isolées.
// Chaque famille reste ouverte : tout type 'static qui implémente le trait marqueur
// devient un message routable, identifié à l'exécution par son TypeId.

use std::any::{Any, TypeId};
use std::fmt;

/// Accès `&dyn Any` depuis un trait object, pour le routage par `TypeId`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Marqueur des commandes (Directive).
pub trait Command: AsAny + fmt::Debug + Send + Sync {
    /// Nom court du type concret, utilisé dans les logs et les erreurs.
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Marqueur des événements (Notification).
pub trait Event: AsAny + fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

impl dyn Command {
    pub fn type_id_of(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn is<T: Command>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Command>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl dyn Event {
    pub fn type_id_of(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Unité de travail du dispatcher : somme fermée de deux variantes.
#[derive(Debug)]
pub enum Message {
    Command(Box<dyn Command>),
    Event(Box<dyn Event>),
}

impl Message {
    pub fn command<C: Command + 'static>(command: C) -> Self {
        Message::Command(Box::new(command))
    }

    pub fn event<E: Event + 'static>(event: E) -> Self {
        Message::Event(Box::new(event))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Message::Command(command) => command.name(),
            Message::Event(event) => event.name(),
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Message::Command(_))
    }
}

// "allocation_core::domain::commands::Allocate" -> "Allocate"
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
