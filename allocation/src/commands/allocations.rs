// allocation/src/commands/allocations.rs
//
// USE CASE: Query the allocations read model (CQRS read side).

use comfy_table::{Table, presets::UTF8_FULL};
use std::path::Path;

use allocation_core::application::views;

pub fn execute(project_dir: &Path, orderid: &str) -> anyhow::Result<()> {
    let mut bus = super::open_bus(project_dir)?;
    let rows = views::allocations(orderid, bus.uow_mut())?;

    if rows.is_empty() {
        println!("No allocation for order {orderid}");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["SKU", "Batch"]);
    for row in &rows {
        table.add_row(vec![row.sku.as_str(), row.batchref.as_str()]);
    }

    println!("📋 Allocations for {orderid}");
    println!("{table}");
    Ok(())
}
