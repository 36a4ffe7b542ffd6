// allocation-core/src/error.rs

use crate::application::bus::BusError;
use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum AllocationError {
    // --- ERREURS DU DOMAINE (SKU inconnu, lot inconnu) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, JSON, Config, Concurrence) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS DU MESSAGE BUS (configuration, cascade) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Bus(#[from] BusError),
}

// Raccourci pour le `?` sur les appels std::fs
impl From<std::io::Error> for AllocationError {
    fn from(err: std::io::Error) -> Self {
        AllocationError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<serde_json::Error> for AllocationError {
    fn from(err: serde_json::Error) -> Self {
        AllocationError::Infrastructure(InfrastructureError::Json(err))
    }
}
