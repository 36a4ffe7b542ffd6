// allocation-core/src/application/bus/dependencies.rs

// Injection par nom, mais typée : chaque handler déclare les noms dont il a besoin,
// et les récupère via `HandlerContext::dependency::<T>(name)`.
// Le nom "uow" est réservé : le Unit of Work est passé directement par le contexte.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::application::bus::error::BusError;
use crate::domain::message::{Command, Message};

pub const UOW: &str = "uow";

/// Carte nom -> instance, partagée (immutable) entre les bus forkés.
#[derive(Default, Clone)]
pub struct Dependencies {
    entries: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl Dependencies {
    pub fn insert<T: Any + Send + Sync>(
        &mut self,
        name: &'static str,
        value: T,
    ) -> Result<(), BusError> {
        if name == UOW {
            return Err(BusError::ReservedDependency);
        }
        self.entries.insert(name, Arc::new(value));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        name == UOW || self.entries.contains_key(name)
    }

    /// Résolution par nom exact puis par type concret.
    pub fn get<T: Any + Clone>(&self, name: &str) -> Result<T, BusError> {
        let entry = self.entries.get(name).ok_or_else(|| BusError::MissingDependency {
            handler: "<direct lookup>",
            name: name.to_string(),
        })?;
        entry
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| BusError::DependencyTypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("Dependencies").field("names", &names).finish()
    }
}

/// Ce que voit un handler pendant son exécution.
pub struct HandlerContext<'a, U> {
    uow: &'a mut U,
    dependencies: &'a Dependencies,
    handler: &'static str,
    requires: &'static [&'static str],
    issued: Vec<Message>,
}

impl<'a, U> HandlerContext<'a, U> {
    pub(crate) fn new(
        uow: &'a mut U,
        dependencies: &'a Dependencies,
        handler: &'static str,
        requires: &'static [&'static str],
    ) -> Self {
        Self {
            uow,
            dependencies,
            handler,
            requires,
            issued: Vec::new(),
        }
    }

    /// La dépendance réservée "uow".
    pub fn uow(&mut self) -> &mut U {
        self.uow
    }

    pub fn dependency<T: Any + Clone>(&self, name: &str) -> Result<T, BusError> {
        if !self.requires.iter().any(|declared| *declared == name) {
            return Err(BusError::UndeclaredDependency {
                handler: self.handler,
                name: name.to_string(),
            });
        }
        self.dependencies.get(name).map_err(|err| match err {
            BusError::MissingDependency { name, .. } => BusError::MissingDependency {
                handler: self.handler,
                name,
            },
            other => other,
        })
    }

    /// Émet une commande de suivi. Elle rejoint la file après le retour
    /// (réussi) du handler, avant les events collectés dans le Unit of Work.
    pub fn issue<C: Command>(&mut self, command: C) {
        self.issued.push(Message::command(command));
    }

    pub(crate) fn into_issued(self) -> Vec<Message> {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_uow_name_is_reserved() {
        let mut deps = Dependencies::default();

        assert!(matches!(deps.insert(UOW, 1u32), Err(BusError::ReservedDependency)));
        assert!(deps.contains(UOW));
    }

    #[test]
    fn test_get_by_name_and_type() -> Result<()> {
        let mut deps = Dependencies::default();
        deps.insert("recipient", "ops@example.com".to_string())?;

        let recipient: String = deps.get("recipient")?;
        assert_eq!(recipient, "ops@example.com");

        assert!(matches!(
            deps.get::<u64>("recipient"),
            Err(BusError::DependencyTypeMismatch { .. })
        ));
        assert!(matches!(
            deps.get::<String>("absent"),
            Err(BusError::MissingDependency { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_context_only_resolves_declared_names() -> Result<()> {
        let mut deps = Dependencies::default();
        deps.insert("limit", 3usize)?;
        deps.insert("secret", 42usize)?;
        let mut uow = ();

        let ctx = HandlerContext::new(&mut uow, &deps, "my_handler", &["limit", "ghost"]);

        assert_eq!(ctx.dependency::<usize>("limit")?, 3);
        assert!(matches!(
            ctx.dependency::<usize>("secret"),
            Err(BusError::UndeclaredDependency { handler: "my_handler", .. })
        ));
        assert!(matches!(
            ctx.dependency::<usize>("ghost"),
            Err(BusError::MissingDependency { handler: "my_handler", .. })
        ));
        Ok(())
    }
}
