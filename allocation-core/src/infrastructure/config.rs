// allocation-core/src/infrastructure/config.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::configuration::AppConfig;
use crate::infrastructure::error::InfrastructureError;

pub const STORE_PATH_ENV: &str = "ALLOCATION_STORE_PATH";
pub const MAX_MESSAGES_ENV: &str = "ALLOCATION_MAX_MESSAGES";

const CONFIG_CANDIDATES: [&str; 2] = ["allocation.yaml", "allocation.yml"];

/// Charge `allocation.yaml` (ou `.yml`) depuis le dossier projet.
///
/// Pas de fichier = configuration par défaut. Les variables d'environnement
/// passent par-dessus le YAML, puis le tout est validé.
#[instrument(skip(project_dir))]
pub fn load_app_config(project_dir: &Path) -> Result<AppConfig, InfrastructureError> {
    load_app_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Variante testable : `lookup` remplace `std::env::var`.
pub fn load_app_config_with(
    project_dir: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, InfrastructureError> {
    let mut config = match find_config(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading configuration");
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)?
        }
        None => {
            info!(dir = ?project_dir, "No configuration file, using defaults");
            AppConfig::default()
        }
    };

    apply_env_overrides(&mut config, lookup)?;
    config.validate()?;
    Ok(config)
}

fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

// Layering : ALLOCATION_STORE_PATH=/tmp/a.json allocation allocate ...
fn apply_env_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), InfrastructureError> {
    if let Some(val) = lookup(STORE_PATH_ENV) {
        info!(old = ?config.store.path, new = ?val, "Overriding store path via ENV");
        config.store.path = val;
    }
    if let Some(val) = lookup(MAX_MESSAGES_ENV) {
        let parsed = parse_max_messages(&val)?;
        info!(old = ?config.bus.max_messages, new = ?parsed, "Overriding max messages via ENV");
        config.bus.max_messages = parsed;
    }
    Ok(())
}

// "none" (ou "unbounded") désactive la limite.
fn parse_max_messages(raw: &str) -> Result<Option<usize>, InfrastructureError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("unbounded") {
        return Ok(None);
    }
    raw.parse::<usize>().map(Some).map_err(|e| {
        InfrastructureError::ConfigError(format!("{MAX_MESSAGES_ENV}='{raw}' is not a number: {e}"))
    })
}
