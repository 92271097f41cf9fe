//! Shared test fixtures for the wizard tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::backend::{
    CellError, CheckOutcome, CsvFile, CsvPreview, ImportBackend, ImportConfig, ImportCounts,
    ImportOutcome, ValidationReport,
};
use crate::catalog::ImportType;

pub(crate) fn csv_file() -> CsvFile {
    CsvFile::new("products.csv", Some("text/csv".to_string()), 2048)
}

pub(crate) fn valid_report(headers: &[&str]) -> ValidationReport {
    ValidationReport {
        is_valid: true,
        file_error: None,
        columns: CheckOutcome::ok("All required columns are present"),
        required_fields: CheckOutcome::ok("All required fields are filled"),
        categories: CheckOutcome::ok("All references are valid"),
        format_errors: vec![],
        encoding_errors: vec![],
        preview: Some(CsvPreview {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            sample_rows: vec![],
        }),
    }
}

pub(crate) fn invalid_report() -> ValidationReport {
    ValidationReport {
        is_valid: false,
        file_error: None,
        columns: CheckOutcome::fail("Missing required columns"),
        required_fields: CheckOutcome::ok("All required fields are filled"),
        categories: CheckOutcome::ok("All references are valid"),
        format_errors: vec![CellError::new(3, "Prezzo", "abc", "Invalid price format")],
        encoding_errors: vec![],
        preview: None,
    }
}

pub(crate) fn completed_outcome() -> ImportOutcome {
    ImportOutcome::Completed {
        counts: ImportCounts {
            total_rows: 100,
            imported: 97,
            errors: 3,
            updated: 60,
            added: 37,
            ..Default::default()
        },
        error_details: vec![],
        timestamp: Utc::now(),
    }
}

/// Backend returning canned responses, for driving `update` and the
/// session runner without randomness.
pub(crate) struct ScriptedBackend {
    pub validation: Option<ValidationReport>,
    pub outcome: Option<ImportOutcome>,
}

impl ScriptedBackend {
    pub fn new(validation: ValidationReport, outcome: ImportOutcome) -> Self {
        Self { validation: Some(validation), outcome: Some(outcome) }
    }

    /// Backend whose calls all fail at the transport level.
    pub fn failing() -> Self {
        Self { validation: None, outcome: None }
    }
}

#[async_trait]
impl ImportBackend for ScriptedBackend {
    async fn validate(&self, _file: &CsvFile, _table_id: &str) -> anyhow::Result<ValidationReport> {
        self.validation
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }

    async fn import(
        &self,
        _file: &CsvFile,
        _table_id: &str,
        _import_type: ImportType,
        _config: &ImportConfig,
    ) -> anyhow::Result<ImportOutcome> {
        self.outcome
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }

    async fn template(&self, _table_id: &str) -> anyhow::Result<Vec<u8>> {
        Ok(b"ID,Nome\n".to_vec())
    }

    async fn errors_report(&self, _details: &[CellError]) -> anyhow::Result<Vec<u8>> {
        Ok(b"Row,Column,Value,Message\n".to_vec())
    }
}

pub(crate) fn stub_backend() -> Arc<dyn ImportBackend> {
    Arc::new(ScriptedBackend::new(
        valid_report(&["ID", "Nome", "Prezzo", "SKU"]),
        completed_outcome(),
    ))
}
