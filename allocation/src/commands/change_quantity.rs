// allocation/src/commands/change_quantity.rs
//
// USE CASE: Change the purchased quantity of a batch.
// Lines that no longer fit are deallocated then reallocated by the bus cascade.

use std::path::Path;

use allocation_core::Message;
use allocation_core::domain::commands::ChangeBatchQuantity;

pub fn execute(project_dir: &Path, reference: String, qty: i64) -> anyhow::Result<()> {
    let mut bus = super::open_bus(project_dir)?;

    let results = bus.handle(Message::command(ChangeBatchQuantity {
        reference: reference.clone(),
        qty,
    }))?;

    println!("✅ Batch {reference} now holds {qty}");
    // Les résultats suivants viennent des Allocate émis par la réallocation.
    for reallocation in results.iter().skip(1) {
        match reallocation {
            Some(batchref) => println!("   ↪ line reallocated to {batchref}"),
            None => println!("   ↪ line could not be reallocated (out of stock)"),
        }
    }
    Ok(())
}
