//! State types for the import wizard
//!
//! This module contains the single mutable aggregate owned by a wizard
//! session, plus the step-specific helpers used by the guard checks.

use crate::backend::{AdvancedOptions, CsvFile, ImportOutcome, ValidationReport};
use crate::catalog::{self, ImportType};
use crate::services::reconcile::{self, ColumnMapping};

use super::types::WizardStep;

/// Main application state for the import wizard
#[derive(Debug, Default)]
pub struct State {
    /// Current step in the wizard
    pub step: WizardStep,

    /// Step 1: file and table selection
    pub source: SourceState,

    /// How imported rows are applied (update or replace)
    pub import_type: ImportType,

    /// Import-time configuration flags
    pub advanced: AdvancedOptions,

    /// Current column→field mapping, one entry per source column
    pub mappings: Vec<ColumnMapping>,

    /// Result of the last validation call (populated at step 2)
    pub validation: Option<ValidationReport>,

    /// Result of the last import call (populated at step 5)
    pub import: Option<ImportOutcome>,

    /// Whether a backend call is in flight; while set, `Next` is rejected
    pub is_loading: bool,

    /// Blocking message to display (guard violations, backend failures)
    pub error: Option<String>,

    /// Monotonic tag for backend calls; responses carrying an older tag
    /// are stale (issued before a reset) and must be discarded
    pub call_tag: u64,
}

impl State {
    /// Required destination field ids for the selected table.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match &self.source.selected_table {
            Some(table) => catalog::required_fields(table),
            None => &[],
        }
    }

    /// Required field ids not satisfied by the current mapping.
    pub fn unmet_required(&self) -> Vec<String> {
        reconcile::check_required_mappings(&self.mappings, self.required_fields())
    }
}

/// State for Step 1: source selection
#[derive(Debug, Default)]
pub struct SourceState {
    /// The accepted input file, if any
    pub selected_file: Option<CsvFile>,

    /// Selected destination table id
    pub selected_table: Option<String>,

    /// Set when the last picked file failed the CSV acceptance rule
    pub file_type_error: bool,
}

impl SourceState {
    /// Check if we can proceed to the validation step
    pub fn can_proceed(&self) -> bool {
        self.selected_file.is_some() && self.selected_table.is_some() && !self.file_type_error
    }

    /// Get validation error message
    pub fn validation_error(&self) -> Option<&'static str> {
        if self.file_type_error {
            Some("The file format is not valid. Select a CSV file.")
        } else if self.selected_file.is_none() {
            Some("Select a CSV file before proceeding")
        } else if self.selected_table.is_none() {
            Some("Select a destination table before proceeding")
        } else {
            None
        }
    }
}
