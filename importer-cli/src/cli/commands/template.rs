//! `template` command handler

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;

use crate::backend::demo::DemoBackend;
use crate::backend::ImportBackend;
use crate::catalog;

/// Write the CSV template for a destination table.
pub async fn handle_template_command(table: String, output: Option<PathBuf>) -> Result<()> {
    if catalog::table(&table).is_none() {
        anyhow::bail!(
            "Unknown table '{}'. Run 'importer-cli tables' to list the available tables.",
            table
        );
    }

    let backend = DemoBackend::default();
    let template = backend.template(&table).await?;

    match output {
        Some(path) => {
            fs::write(&path, &template)
                .with_context(|| format!("Failed to write template to: {}", path.display()))?;
            println!(
                "Template saved to: {}",
                path.display().to_string().bright_green()
            );
        }
        None => {
            std::io::stdout().write_all(&template)?;
        }
    }
    Ok(())
}
