// allocation/src/commands/mod.rs

pub mod add_batch;
pub mod allocate;
pub mod allocations;
pub mod change_quantity;

use anyhow::Context;
use std::path::Path;

use allocation_core::application::{AllocationBus, ConfiguredUnitOfWork, bootstrap_from_config};
use allocation_core::infrastructure::load_app_config;

/// Config + store + bus, le tout câblé depuis `allocation.yaml`.
pub fn open_bus(project_dir: &Path) -> anyhow::Result<AllocationBus<ConfiguredUnitOfWork>> {
    let config = load_app_config(project_dir)
        .with_context(|| format!("Failed to load configuration from {}", project_dir.display()))?;
    Ok(bootstrap_from_config(&config, project_dir)?)
}
