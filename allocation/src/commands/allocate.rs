// allocation/src/commands/allocate.rs
//
// USE CASE: Allocate an order line to the best batch.

use std::path::Path;

use allocation_core::Message;
use allocation_core::domain::commands::Allocate;

pub fn execute(project_dir: &Path, orderid: String, sku: String, qty: i64) -> anyhow::Result<()> {
    let mut bus = super::open_bus(project_dir)?;

    let results = bus.handle(Message::command(Allocate {
        orderid: orderid.clone(),
        sku: sku.clone(),
        qty,
    }))?;

    // Premier résultat = celui de la commande soumise.
    match results.into_iter().next().flatten() {
        Some(batchref) => println!("✅ {orderid} allocated to batch {batchref}"),
        None => println!("⚠️  Out of stock: no batch can take {qty} x {sku} for {orderid}"),
    }
    Ok(())
}
