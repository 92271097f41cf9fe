// Mapping reconciliation service
//
// Pure business logic for matching detected CSV headers against a
// destination table's field catalog, decoupled from the wizard state
// machine and reusable across different contexts.

pub mod core;
pub mod models;

// Re-export commonly used items
pub use self::core::{check_required_mappings, default_mappings, reconcile_headers};
pub use models::{ColumnMapping, MatchKind};
