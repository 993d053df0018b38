//! # Import Subcommand
//!
//! Bulk-imports requirements and documents from a CSV file into the
//! database. See [`reqdoc_api::import`] for the file format.
//!
//! The summary is printed to stdout as JSON. The exit code is `0` when every
//! row was imported and `2` when some rows were skipped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use reqdoc_api::import::{import_csv, ImportSummary};
use reqdoc_api::store::Repository;

use crate::DatabaseArgs;

/// Exit code when the import finished but skipped rows.
pub const EXIT_PARTIAL: u8 = 2;

/// Arguments for the `reqdoc import` subcommand.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file: header row, then `name,description,documents,...` rows.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Execute the import subcommand.
pub fn run_import(args: &ImportArgs) -> Result<u8> {
    crate::runtime()?.block_on(async {
        let repository = args.database.connect().await?;
        let summary = import_file(&repository, &args.file).await?;

        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");

        if summary.skipped.is_empty() {
            Ok(0)
        } else {
            tracing::warn!(
                skipped = summary.skipped.len(),
                "some rows were not imported"
            );
            Ok(EXIT_PARTIAL)
        }
    })
}

/// Read `path` and import it into `repository`.
pub async fn import_file(repository: &Repository, path: &Path) -> Result<ImportSummary> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    tracing::info!(file = %path.display(), size = bytes.len(), "importing CSV");
    Ok(import_csv(repository, &bytes).await)
}
