//! # reqdoc-cli: Command-Line Tool for reqdoc
//!
//! ## Subcommands
//!
//! - `reqdoc import <FILE>`: bulk-import requirements and documents from CSV.
//! - `reqdoc migrate`: apply the embedded database migrations.
//!
//! Both connect to the database named by `--database-url` or
//! `DATABASE_URL`.
//!
//! ```bash
//! reqdoc migrate
//! reqdoc import requirements.csv --database-url postgres://localhost/reqdoc
//! ```

pub mod import;
pub mod migrate;

use anyhow::{Context, Result};
use clap::Args;
use reqdoc_api::db;
use reqdoc_api::store::Repository;

/// Database connection options shared by the subcommands.
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

impl DatabaseArgs {
    /// Connect, apply migrations, and return a Postgres-backed repository.
    pub async fn connect(&self) -> Result<Repository> {
        let pool = db::init_pool(&self.database_url)
            .await
            .context("failed to connect to the database")?;
        db::run_migrations(&pool)
            .await
            .context("failed to apply database migrations")?;
        Ok(Repository::postgres(pool))
    }
}

/// Build a single-threaded Tokio runtime for one subcommand.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
