//! `tables` command handler

use anyhow::Result;
use colored::*;

use crate::catalog;

/// List the importable destination tables with their fields.
pub fn handle_tables_command() -> Result<()> {
    for table in catalog::TABLES {
        println!(
            "{} {}",
            table.id.bright_green().bold(),
            format!("({})", table.display_name).dimmed()
        );

        let required = catalog::required_fields(table.id);
        for field in catalog::fields(table.id) {
            let marker = if required.contains(&field.id) {
                "*".bright_yellow().to_string()
            } else {
                " ".to_string()
            };
            println!("  {} {:<12} {}", marker, field.id, field.display_name.dimmed());
        }
        println!();
    }
    println!("{}", "* required field".dimmed());
    Ok(())
}
