// allocation/src/main.rs

use clap::Parser;
use std::process::ExitCode;
use tracing::Level;

use allocation_core::AllocationError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1. Setup Logging (Tracing). stdout reste réservé à la sortie des commandes.
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Les erreurs du cœur portent un code et une aide miette : on les affiche en entier.
            match err.downcast::<AllocationError>() {
                Ok(diagnostic) => eprintln!("{:?}", miette::Report::new(diagnostic)),
                Err(other) => eprintln!("❌ {other:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::AddBatch {
            project_dir,
            reference,
            sku,
            qty,
            eta,
        } => commands::add_batch::execute(&project_dir, reference, sku, qty, eta),

        Commands::Allocate {
            project_dir,
            orderid,
            sku,
            qty,
        } => commands::allocate::execute(&project_dir, orderid, sku, qty),

        Commands::ChangeQuantity {
            project_dir,
            reference,
            qty,
        } => commands::change_quantity::execute(&project_dir, reference, qty),

        Commands::Allocations {
            project_dir,
            orderid,
        } => commands::allocations::execute(&project_dir, &orderid),
    }
}
