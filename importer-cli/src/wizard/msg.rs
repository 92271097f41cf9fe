//! Message types for the import wizard
//!
//! This module defines all the messages (events/actions) that can occur
//! in the wizard flow.

use crate::backend::{AdvancedToggle, CsvFile, ImportOutcome, ValidationReport};
use crate::catalog::ImportType;

/// All messages for the import wizard
#[derive(Debug, Clone)]
pub enum Msg {
    // === Navigation ===
    /// Proceed to the next step (guarded)
    Next,
    /// Go back to the previous step (no data loss)
    Back,
    /// Return every field to its session-initial value
    Reset,

    // === Step 1: Source selection ===
    /// A file was picked; non-CSV files are rejected and cleared
    FileSelected(CsvFile),
    /// A destination table was picked
    TableSelected(String),
    /// The import type was picked
    ImportTypeSelected(ImportType),

    // === Step 3: Column mapping ===
    /// Manual edit of one mapping's destination field
    MappingTargetChanged {
        index: usize,
        target: Option<String>,
    },

    // === Step 4: Advanced options ===
    /// Flip one of the boolean advanced options
    AdvancedToggled(AdvancedToggle),
    /// Set the CSV delimiter
    DelimiterChanged(char),
    /// Set the expected file encoding
    EncodingChanged(String),

    // === Backend responses ===
    /// Validation finished; `tag` identifies the call this answers
    ValidationLoaded {
        tag: u64,
        result: Result<ValidationReport, String>,
    },
    /// Import finished; `tag` identifies the call this answers
    ImportFinished {
        tag: u64,
        result: Result<ImportOutcome, String>,
    },

    // === General ===
    /// Dismiss the reported error message
    DismissError,
}
