//! # Migrate Subcommand
//!
//! Applies the migrations embedded in `reqdoc-api` and exits.

use anyhow::Result;
use clap::Args;

use crate::DatabaseArgs;

/// Arguments for the `reqdoc migrate` subcommand.
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Execute the migrate subcommand.
pub fn run_migrate(args: &MigrateArgs) -> Result<u8> {
    crate::runtime()?.block_on(async {
        args.database.connect().await?;
        println!("Database migrations applied");
        Ok(0)
    })
}
