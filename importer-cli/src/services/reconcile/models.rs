use serde::{Deserialize, Serialize};

/// How a source column was matched to its destination field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Seed mapping supplied for a table before any file was validated
    Seed,
    /// Normalized header equals the field id (case-insensitive)
    Id,
    /// Raw header equals the field display name (case-insensitive)
    DisplayName,
}

impl MatchKind {
    /// Get display label for match kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::Seed => "[Seed]",
            Self::Id => "[Id]",
            Self::DisplayName => "[Name]",
        }
    }
}

/// Association between one detected source column and one destination field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// The source column header as it appeared in the CSV
    pub source_column: String,
    /// Destination field id, `None` when the column is unmapped
    pub target_field: Option<String>,
    /// How the match was made, `None` when unmapped
    pub matched_by: Option<MatchKind>,
}

impl ColumnMapping {
    /// Create a mapped entry
    pub fn mapped(source: impl Into<String>, target: impl Into<String>, kind: MatchKind) -> Self {
        Self {
            source_column: source.into(),
            target_field: Some(target.into()),
            matched_by: Some(kind),
        }
    }

    /// Create an unmapped entry (no destination field)
    pub fn unmapped(source: impl Into<String>) -> Self {
        Self {
            source_column: source.into(),
            target_field: None,
            matched_by: None,
        }
    }

    /// Check if this mapping targets a specific field
    pub fn targets(&self, field_id: &str) -> bool {
        self.target_field.as_deref() == Some(field_id)
    }
}
