// allocation/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "allocation")]
#[command(about = "Stock allocation driven by a command/event message bus", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Debug-level logs on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📦 Adds a batch of stock (creates the product if needed)
    AddBatch {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Batch reference (ex: "batch-001")
        #[arg(long)]
        reference: String,

        #[arg(long)]
        sku: String,

        /// Purchased quantity
        #[arg(long)]
        qty: i64,

        /// Expected arrival date (YYYY-MM-DD). Omit for stock already in the warehouse.
        #[arg(long)]
        eta: Option<NaiveDate>,
    },

    /// 🎯 Allocates an order line and prints the chosen batch
    Allocate {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        orderid: String,

        #[arg(long)]
        sku: String,

        #[arg(long)]
        qty: i64,
    },

    /// ✏️  Changes the purchased quantity of a batch (excess lines are reallocated)
    ChangeQuantity {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        reference: String,

        #[arg(long)]
        qty: i64,
    },

    /// 📋 Lists the allocations of an order (read model)
    Allocations {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        orderid: String,
    },
}
