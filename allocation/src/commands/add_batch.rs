// allocation/src/commands/add_batch.rs
//
// USE CASE: Register a new batch of stock.

use chrono::NaiveDate;
use std::path::Path;

use allocation_core::Message;
use allocation_core::domain::commands::CreateBatch;

pub fn execute(
    project_dir: &Path,
    reference: String,
    sku: String,
    qty: i64,
    eta: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let mut bus = super::open_bus(project_dir)?;

    bus.handle(Message::command(CreateBatch {
        reference: reference.clone(),
        sku: sku.clone(),
        qty,
        eta,
    }))?;

    match eta {
        Some(date) => println!("✅ Batch {reference} added: {qty} x {sku} (ETA {date})"),
        None => println!("✅ Batch {reference} added: {qty} x {sku} (in stock)"),
    }
    Ok(())
}
