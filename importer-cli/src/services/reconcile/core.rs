//! Core reconciliation functions for header-to-field mapping
//!
//! Given the headers detected in an uploaded CSV and a destination table's
//! field catalog, produce a best-effort column→field mapping, and check a
//! mapping for completeness against the table's required-field set.

use super::models::{ColumnMapping, MatchKind};
use crate::catalog::CatalogField;

/// Normalize a header string for id comparison:
/// lowercase, trim, collapse internal whitespace runs to a single `_`,
/// strip any character outside `[a-z0-9_]`.
pub fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut in_whitespace = false;

    for c in header.trim().to_lowercase().chars() {
        if c.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        if in_whitespace {
            out.push('_');
            in_whitespace = false;
        }
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            out.push(c);
        }
    }

    out
}

/// Derive a mapping sequence from detected CSV headers.
///
/// For each header, in order, the first catalog entry (declared catalog
/// order) whose id equals the normalized header (case-insensitive) or whose
/// display name equals the raw header (case-insensitive) wins. Headers with
/// no match map to an unmapped entry, which the required-field check will
/// later catch.
///
/// The result always has the same length and order as `headers`.
pub fn reconcile_headers(headers: &[String], catalog: &[CatalogField]) -> Vec<ColumnMapping> {
    headers
        .iter()
        .map(|header| {
            let normalized = normalize_header(header);
            let raw_lower = header.to_lowercase();

            // First match in declared catalog order is deterministic;
            // the catalog is not assumed to contain unique matches.
            for field in catalog {
                if field.id.to_lowercase() == normalized {
                    return ColumnMapping::mapped(header.clone(), field.id, MatchKind::Id);
                }
                if field.display_name.to_lowercase() == raw_lower {
                    return ColumnMapping::mapped(header.clone(), field.id, MatchKind::DisplayName);
                }
            }

            ColumnMapping::unmapped(header.clone())
        })
        .collect()
}

/// Return the required field ids not satisfied by the mapping.
///
/// A required field is satisfied iff it appears as the target of at least
/// one mapping entry. Duplicate mappings to the same target are allowed;
/// the first mapping for a target wins at import time.
pub fn check_required_mappings(mappings: &[ColumnMapping], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| !mappings.iter().any(|m| m.targets(field)))
        .map(|field| (*field).to_string())
        .collect()
}

/// Seed mapping for a table, used for display before any file has been
/// validated. Always superseded once header-driven reconciliation runs.
pub fn default_mappings(table_id: &str) -> Vec<ColumnMapping> {
    let pairs: &[(&str, &str)] = match table_id {
        "products" => &[
            ("id", "id"),
            ("nome", "name"),
            ("descrizione", "description"),
            ("prezzo", "price"),
            ("categoria", "category_id"),
            ("sku", "sku"),
            ("quantita", "quantity"),
        ],
        "customers" => &[
            ("id", "id"),
            ("nome", "first_name"),
            ("cognome", "last_name"),
            ("email", "email"),
            ("telefono", "phone"),
            ("codice_fiscale", "tax_code"),
            ("indirizzo", "address"),
        ],
        "suppliers" => &[
            ("id", "id"),
            ("nome", "name"),
            ("partita_iva", "vat_number"),
            ("email", "email"),
            ("telefono", "phone"),
            ("indirizzo", "address"),
        ],
        "categories" => &[
            ("id", "id"),
            ("nome", "name"),
            ("descrizione", "description"),
        ],
        _ => &[],
    };

    pairs
        .iter()
        .map(|(source, target)| ColumnMapping::mapped(*source, *target, MatchKind::Seed))
        .collect()
}
