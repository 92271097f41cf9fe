//! Import backend capability
//!
//! The wizard core consumes an abstract backend for file validation and
//! import execution; whatever transport the surrounding application chooses
//! implements [`ImportBackend`]. The demo implementation lives in
//! [`demo`] and fabricates responses the way a staging server would.

pub mod demo;

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ImportType;
use crate::services::reconcile::ColumnMapping;

/// Maximum accepted upload size (10MB), matching the server-side limit.
pub const MAX_IMPORT_BYTES: u64 = 10 * 1024 * 1024;

/// Handle to a user-selected input file.
///
/// The wizard never reads the file contents itself (parsing is the
/// backend's job); it only needs the name, declared media type and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvFile {
    pub name: String,
    pub media_type: Option<String>,
    pub size_bytes: u64,
}

impl CsvFile {
    pub fn new(name: impl Into<String>, media_type: Option<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            media_type,
            size_bytes,
        }
    }

    /// File acceptance rule: declared media type `text/csv`, or a name
    /// ending in `.csv` (case-insensitive).
    pub fn is_csv(&self) -> bool {
        self.media_type.as_deref() == Some("text/csv")
            || self.name.to_lowercase().ends_with(".csv")
    }
}

/// Import-time configuration flags.
///
/// A fixed struct with statically known fields: unknown options are
/// unrepresentable rather than rejected at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedOptions {
    pub skip_header: bool,
    pub strict_validation: bool,
    pub send_notification: bool,
    pub delimiter: char,
    pub encoding: String,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            skip_header: true,
            strict_validation: false,
            send_notification: false,
            delimiter: ',',
            encoding: "UTF-8".to_string(),
        }
    }
}

impl AdvancedOptions {
    /// Flip one of the boolean flags.
    pub fn toggle(&mut self, option: AdvancedToggle) {
        match option {
            AdvancedToggle::SkipHeader => self.skip_header = !self.skip_header,
            AdvancedToggle::StrictValidation => self.strict_validation = !self.strict_validation,
            AdvancedToggle::SendNotification => self.send_notification = !self.send_notification,
        }
    }
}

/// The toggleable boolean advanced options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancedToggle {
    SkipHeader,
    StrictValidation,
    SendNotification,
}

impl FromStr for AdvancedToggle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip-header" => Ok(Self::SkipHeader),
            "strict-validation" => Ok(Self::StrictValidation),
            "send-notification" => Ok(Self::SendNotification),
            other => anyhow::bail!(
                "unknown advanced option '{}' (expected one of: skip-header, strict-validation, send-notification)",
                other
            ),
        }
    }
}

/// Outcome of one per-check validation (columns / required fields / categories).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub valid: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { valid: true, message: message.into() }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { valid: false, message: message.into() }
    }
}

/// A single cell-level error (format error during validation, or a row
/// error reported by the import).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellError {
    pub row: u32,
    pub column: String,
    pub value: String,
    pub message: String,
}

impl CellError {
    pub fn new(row: u32, column: &str, value: &str, message: &str) -> Self {
        Self {
            row,
            column: column.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}

/// File-level issues outside any single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Encoding,
    Delimiter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingIssue {
    pub kind: IssueKind,
    pub message: String,
}

/// Preview of the uploaded CSV as detected by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
}

/// Result of validating an uploaded file against a destination table.
///
/// Immutable once received; drives both the step-2 guard and the
/// header-driven mapping reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Set when the file itself was unusable (empty, oversized).
    pub file_error: Option<String>,
    pub columns: CheckOutcome,
    pub required_fields: CheckOutcome,
    pub categories: CheckOutcome,
    pub format_errors: Vec<CellError>,
    pub encoding_errors: Vec<EncodingIssue>,
    pub preview: Option<CsvPreview>,
}

/// Row counts reported by a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportCounts {
    pub total_rows: u64,
    pub imported: u64,
    pub errors: u64,
    pub updated: u64,
    pub added: u64,
    pub deleted: u64,
    pub soft_deleted: u64,
}

/// Result of an import call, one closed variant per status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ImportOutcome {
    /// The import ran to completion (individual rows may still have failed).
    Completed {
        counts: ImportCounts,
        error_details: Vec<CellError>,
        timestamp: DateTime<Utc>,
    },
    /// The import stopped early; partial counts describe what was done.
    Interrupted {
        total_rows: u64,
        processed_rows: u64,
        imported: u64,
        errors: u64,
        message: String,
        error_details: Vec<CellError>,
        timestamp: DateTime<Utc>,
    },
    /// A system failure before or during processing.
    Error {
        code: String,
        message: String,
        system_message: String,
        suggestions: Vec<String>,
        timestamp: DateTime<Utc>,
    },
}

impl ImportOutcome {
    /// Business-level success: only a completed import counts.
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Interrupted { .. } => "interrupted",
            Self::Error { .. } => "error",
        }
    }

    pub fn error_details(&self) -> &[CellError] {
        match self {
            Self::Completed { error_details, .. } => error_details,
            Self::Interrupted { error_details, .. } => error_details,
            Self::Error { .. } => &[],
        }
    }

    /// Imported rows as a percentage of total rows, where counts exist.
    pub fn completion_percent(&self) -> Option<f64> {
        match self {
            Self::Completed { counts, .. } if counts.total_rows > 0 => {
                Some(counts.imported as f64 / counts.total_rows as f64 * 100.0)
            }
            Self::Interrupted { total_rows, imported, .. } if *total_rows > 0 => {
                Some(*imported as f64 / *total_rows as f64 * 100.0)
            }
            _ => None,
        }
    }
}

/// Everything the backend needs besides the file to execute an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub mappings: Vec<ColumnMapping>,
    pub options: AdvancedOptions,
}

/// The import backend capability consumed by the wizard core.
#[async_trait]
pub trait ImportBackend: Send + Sync {
    /// Validate an uploaded file against a destination table.
    ///
    /// Must be safe to call with an empty or oversized file: such inputs
    /// produce `is_valid = false` with descriptive per-check messages
    /// rather than an error.
    async fn validate(&self, file: &CsvFile, table_id: &str) -> anyhow::Result<ValidationReport>;

    /// Execute the import.
    async fn import(
        &self,
        file: &CsvFile,
        table_id: &str,
        import_type: ImportType,
        config: &ImportConfig,
    ) -> anyhow::Result<ImportOutcome>;

    /// CSV template for a table: header row plus one example row.
    async fn template(&self, table_id: &str) -> anyhow::Result<Vec<u8>>;

    /// CSV report of error details: `Row,Column,Value,Message` header plus
    /// one row per detail.
    async fn errors_report(&self, details: &[CellError]) -> anyhow::Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_acceptance_by_extension() {
        assert!(CsvFile::new("data.csv", None, 10).is_csv());
        assert!(CsvFile::new("DATA.CSV", None, 10).is_csv());
        assert!(!CsvFile::new("data.txt", Some("text/plain".into()), 10).is_csv());
        assert!(!CsvFile::new("data", None, 10).is_csv());
    }

    #[test]
    fn test_file_acceptance_by_media_type() {
        assert!(CsvFile::new("export.dat", Some("text/csv".into()), 10).is_csv());
        assert!(!CsvFile::new("export.dat", Some("application/octet-stream".into()), 10).is_csv());
    }

    #[test]
    fn test_advanced_toggle_parse_rejects_unknown() {
        assert!("skip-header".parse::<AdvancedToggle>().is_ok());
        assert!("compress-output".parse::<AdvancedToggle>().is_err());
    }

    #[test]
    fn test_advanced_toggle_flips_flag() {
        let mut options = AdvancedOptions::default();
        assert!(options.skip_header);
        options.toggle(AdvancedToggle::SkipHeader);
        assert!(!options.skip_header);
        options.toggle(AdvancedToggle::StrictValidation);
        assert!(options.strict_validation);
    }

    #[test]
    fn test_outcome_status_serializes_as_tag() {
        let outcome = ImportOutcome::Error {
            code: "SYSTEM_ERROR".into(),
            message: "boom".into(),
            system_message: "db down".into(),
            suggestions: vec![],
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn test_completion_percent() {
        let outcome = ImportOutcome::Completed {
            counts: ImportCounts {
                total_rows: 200,
                imported: 150,
                ..Default::default()
            },
            error_details: vec![],
            timestamp: Utc::now(),
        };
        assert_eq!(outcome.completion_percent(), Some(75.0));
    }
}
