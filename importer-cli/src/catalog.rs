//! Static catalog of importable destination tables.
//!
//! The catalog is the wizard's source of truth for what can be imported:
//! the known tables, the destination fields each table exposes, and the
//! per-table set of required field ids. Everything here is immutable and
//! loaded at startup.

use std::fmt;
use std::str::FromStr;

/// An importable destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// A destination field description, one set per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogField {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// All importable destination tables.
pub const TABLES: &[Table] = &[
    Table { id: "products", display_name: "Catalogo prodotti" },
    Table { id: "customers", display_name: "Anagrafica clienti" },
    Table { id: "suppliers", display_name: "Fornitori" },
    Table { id: "categories", display_name: "Categorie" },
];

const PRODUCT_FIELDS: &[CatalogField] = &[
    CatalogField { id: "id", display_name: "ID" },
    CatalogField { id: "name", display_name: "Nome" },
    CatalogField { id: "description", display_name: "Descrizione" },
    CatalogField { id: "price", display_name: "Prezzo" },
    CatalogField { id: "category_id", display_name: "Categoria" },
    CatalogField { id: "sku", display_name: "SKU" },
    CatalogField { id: "quantity", display_name: "Quantità" },
    CatalogField { id: "created_at", display_name: "Data creazione" },
    CatalogField { id: "updated_at", display_name: "Data aggiornamento" },
    CatalogField { id: "is_active", display_name: "Attivo" },
];

const CUSTOMER_FIELDS: &[CatalogField] = &[
    CatalogField { id: "id", display_name: "ID" },
    CatalogField { id: "first_name", display_name: "Nome" },
    CatalogField { id: "last_name", display_name: "Cognome" },
    CatalogField { id: "email", display_name: "Email" },
    CatalogField { id: "phone", display_name: "Telefono" },
    CatalogField { id: "tax_code", display_name: "Codice Fiscale" },
    CatalogField { id: "address", display_name: "Indirizzo" },
];

const SUPPLIER_FIELDS: &[CatalogField] = &[
    CatalogField { id: "id", display_name: "ID" },
    CatalogField { id: "name", display_name: "Nome" },
    CatalogField { id: "vat_number", display_name: "Partita IVA" },
    CatalogField { id: "email", display_name: "Email" },
    CatalogField { id: "phone", display_name: "Telefono" },
    CatalogField { id: "address", display_name: "Indirizzo" },
];

const CATEGORY_FIELDS: &[CatalogField] = &[
    CatalogField { id: "id", display_name: "ID" },
    CatalogField { id: "name", display_name: "Nome" },
    CatalogField { id: "description", display_name: "Descrizione" },
    CatalogField { id: "parent_id", display_name: "Categoria padre" },
];

/// Look up a table by id.
pub fn table(table_id: &str) -> Option<&'static Table> {
    TABLES.iter().find(|t| t.id == table_id)
}

/// The field catalog for a table, in declared order.
///
/// Declared order matters: header reconciliation resolves ambiguous
/// matches by taking the first catalog entry that matches.
pub fn fields(table_id: &str) -> &'static [CatalogField] {
    match table_id {
        "products" => PRODUCT_FIELDS,
        "customers" => CUSTOMER_FIELDS,
        "suppliers" => SUPPLIER_FIELDS,
        "categories" => CATEGORY_FIELDS,
        _ => &[],
    }
}

/// Required destination field ids for a table.
///
/// Invariant: every id listed here exists in the table's field catalog.
pub fn required_fields(table_id: &str) -> &'static [&'static str] {
    match table_id {
        "products" => &["name", "price", "sku"],
        "customers" => &["first_name", "last_name", "email"],
        "suppliers" => &["name", "vat_number"],
        "categories" => &["name"],
        _ => &[],
    }
}

/// How imported rows are applied to the destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    #[default]
    Update,
    Replace,
}

impl ImportType {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Replace => "replace",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Update => "Aggiornamento (Update or append)",
            Self::Replace => "Sostituzione (Delete and Create)",
        }
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ImportType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(Self::Update),
            "replace" => Ok(Self::Replace),
            other => anyhow::bail!("unknown import type '{}' (expected 'update' or 'replace')", other),
        }
    }
}
