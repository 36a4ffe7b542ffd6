// allocation-core/src/ports/notifications.rs

// Le domaine veut "prévenir quelqu'un", sans savoir si c'est un email, un log ou un fichier.

use crate::error::AllocationError;

pub trait Notifications: Send + Sync {
    fn send(&self, destination: &str, message: &str) -> Result<(), AllocationError>;
}
