// allocation-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(allocation::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- STORE (JSON) ---
    #[error("JSON Store Error: {0}")]
    #[diagnostic(
        code(allocation::infra::json),
        help("The store file is corrupted or was written by an incompatible version.")
    )]
    Json(#[from] serde_json::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(allocation::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(allocation::infra::config_invalid))]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    // --- NOTIFICATIONS ---
    #[error("Notification to '{destination}' failed: {reason}")]
    #[diagnostic(code(allocation::infra::notification))]
    Notification { destination: String, reason: String },

    // --- CONCURRENCE OPTIMISTE ---
    #[error("Product '{sku}' was modified concurrently (expected version {expected:?}, found {found:?})")]
    #[diagnostic(
        code(allocation::infra::concurrent_modification),
        help("Another process committed this product first. Retry the command.")
    )]
    ConcurrentModification {
        sku: String,
        expected: Option<u64>,
        found: Option<u64>,
    },
}
