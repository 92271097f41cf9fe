//! `run` command handler
//!
//! Drives the wizard end to end from the command line: source selection,
//! validation preview, mapping review, then the import itself, printing
//! each step's report as it goes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;

use crate::backend::demo::DemoBackend;
use crate::backend::{AdvancedToggle, CsvFile, ImportBackend, ImportOutcome, ValidationReport};
use crate::catalog::{self, ImportType};
use crate::services::reconcile::ColumnMapping;
use crate::wizard::{Msg, WizardSession, WizardStep};

pub struct RunArgs {
    pub file: PathBuf,
    pub table: String,
    pub import_type: String,
    pub toggles: Vec<String>,
    pub delimiter: char,
    pub encoding: String,
    pub seed: Option<u64>,
    pub json: bool,
    pub errors_report: Option<PathBuf>,
    pub no_color: bool,
}

pub async fn handle_run_command(args: RunArgs) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if catalog::table(&args.table).is_none() {
        anyhow::bail!(
            "Unknown table '{}'. Run 'importer-cli tables' to list the available tables.",
            args.table
        );
    }

    let import_type: ImportType = args.import_type.parse()?;
    let toggles = args
        .toggles
        .iter()
        .map(|t| t.parse::<AdvancedToggle>())
        .collect::<Result<Vec<_>>>()?;

    let file = describe_file(&args.file)?;

    let backend: Arc<dyn ImportBackend> = match args.seed {
        Some(seed) => Arc::new(DemoBackend::seeded(seed)),
        None => Arc::new(DemoBackend::default()),
    };
    let mut session = WizardSession::new(backend.clone());

    // Step 1: source selection
    session.dispatch(Msg::FileSelected(file)).await;
    if session.state().source.file_type_error {
        anyhow::bail!("The file format is not valid. Select a CSV file.");
    }
    session.dispatch(Msg::TableSelected(args.table.clone())).await;
    session.dispatch(Msg::ImportTypeSelected(import_type)).await;
    for toggle in toggles {
        session.dispatch(Msg::AdvancedToggled(toggle)).await;
    }
    session.dispatch(Msg::DelimiterChanged(args.delimiter)).await;
    session.dispatch(Msg::EncodingChanged(args.encoding.clone())).await;

    // Step 2: validation preview
    session.dispatch(Msg::Next).await;
    if let Some(error) = &session.state().error {
        anyhow::bail!("{}", error);
    }
    let report = session
        .state()
        .validation
        .clone()
        .context("Validation produced no report")?;
    if !args.json {
        print_validation_report(&report);
    }

    session.dispatch(Msg::Next).await;
    if session.state().step == WizardStep::Validate {
        anyhow::bail!("The file did not pass validation");
    }

    // Step 3: mapping review
    if !args.json {
        print_mappings(session.state().mappings.as_slice());
    }
    session.dispatch(Msg::Next).await;
    if session.state().step == WizardStep::MapColumns {
        let error = session.state().error.clone().unwrap_or_default();
        anyhow::bail!("{}", error);
    }

    // Step 4: import
    session.dispatch(Msg::Next).await;
    if let Some(error) = &session.state().error {
        anyhow::bail!("{}", error);
    }
    let outcome = session
        .state()
        .import
        .clone()
        .context("Import produced no outcome")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    if let Some(path) = args.errors_report {
        let csv = backend.errors_report(outcome.error_details()).await?;
        fs::write(&path, &csv)
            .with_context(|| format!("Failed to write errors report to: {}", path.display()))?;
        if !args.json {
            println!(
                "Errors report saved to: {}",
                path.display().to_string().bright_green()
            );
        }
    }

    Ok(())
}

/// Build the file handle the wizard works with from a path on disk.
fn describe_file(path: &Path) -> Result<CsvFile> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Cannot read file: {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("Not a file: {}", path.display());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let media_type = name
        .to_lowercase()
        .ends_with(".csv")
        .then(|| "text/csv".to_string());

    Ok(CsvFile::new(name, media_type, metadata.len()))
}

fn check_mark(valid: bool) -> ColoredString {
    if valid {
        "✓".bright_green()
    } else {
        "✗".bright_red()
    }
}

fn print_validation_report(report: &ValidationReport) {
    println!("{}", "Validation".bold());
    if let Some(file_error) = &report.file_error {
        println!("  {} {}", check_mark(false), file_error);
        println!();
        return;
    }
    println!("  {} {}", check_mark(report.columns.valid), report.columns.message);
    println!(
        "  {} {}",
        check_mark(report.required_fields.valid),
        report.required_fields.message
    );
    println!("  {} {}", check_mark(report.categories.valid), report.categories.message);

    if !report.format_errors.is_empty() {
        println!("  {}", "Format errors:".bright_red());
        for e in &report.format_errors {
            println!("    row {} [{}] '{}': {}", e.row, e.column, e.value.dimmed(), e.message);
        }
    }
    if !report.encoding_errors.is_empty() {
        println!("  {}", "File issues:".bright_red());
        for issue in &report.encoding_errors {
            println!("    {}", issue.message);
        }
    }
    if let Some(preview) = &report.preview {
        println!("  Detected columns: {}", preview.headers.join(", ").dimmed());
    }
    println!();
}

fn print_mappings(mappings: &[ColumnMapping]) {
    println!("{}", "Column mapping".bold());
    for m in mappings {
        match &m.target_field {
            Some(target) => {
                let matched = m
                    .matched_by
                    .map(|k| format!(" ({})", k.label()))
                    .unwrap_or_default();
                println!(
                    "  {:<20} → {}{}",
                    m.source_column,
                    target.bright_green(),
                    matched.dimmed()
                );
            }
            None => {
                println!("  {:<20} → {}", m.source_column, "ignored".dimmed());
            }
        }
    }
    println!();
}

fn print_outcome(outcome: &ImportOutcome) {
    println!("{}", "Result".bold());
    match outcome {
        ImportOutcome::Completed { counts, error_details, timestamp } => {
            println!("  {} Import {}", check_mark(true), "completed".bright_green().bold());
            println!("  Total rows:  {}", counts.total_rows);
            println!("  Imported:    {}", counts.imported);
            if counts.updated > 0 {
                println!("  Updated:     {}", counts.updated);
            }
            if counts.added > 0 {
                println!("  Added:       {}", counts.added);
            }
            if counts.deleted > 0 {
                println!("  Deleted:     {} ({} soft)", counts.deleted, counts.soft_deleted);
            }
            if counts.errors > 0 {
                println!("  Errors:      {}", counts.errors.to_string().bright_yellow());
            }
            print_error_details(error_details);
            println!("  Finished at: {}", timestamp.to_rfc3339().dimmed());
        }
        ImportOutcome::Interrupted {
            total_rows,
            processed_rows,
            imported,
            errors,
            message,
            error_details,
            timestamp,
        } => {
            println!(
                "  {} Import {}: {}",
                check_mark(false),
                "interrupted".bright_yellow().bold(),
                message
            );
            println!("  Processed:   {} of {}", processed_rows, total_rows);
            println!("  Imported:    {}", imported);
            println!("  Errors:      {}", errors.to_string().bright_red());
            print_error_details(error_details);
            println!("  Stopped at:  {}", timestamp.to_rfc3339().dimmed());
        }
        ImportOutcome::Error { code, message, system_message, suggestions, timestamp } => {
            println!(
                "  {} {} ({}): {}",
                check_mark(false),
                "Import failed".bright_red().bold(),
                code,
                message
            );
            println!("  {}", system_message.dimmed());
            if !suggestions.is_empty() {
                println!("  Suggestions:");
                for s in suggestions {
                    println!("    - {}", s);
                }
            }
            println!("  Failed at:   {}", timestamp.to_rfc3339().dimmed());
        }
    }
    if let Some(percent) = outcome.completion_percent() {
        println!("  Completion:  {:.1}%", percent);
    }
}

fn print_error_details(details: &[crate::backend::CellError]) {
    if details.is_empty() {
        return;
    }
    println!("  {}", "Row errors:".bright_yellow());
    for e in details {
        println!("    row {} [{}] '{}': {}", e.row, e.column, e.value.dimmed(), e.message);
    }
}
