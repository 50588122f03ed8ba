//! # Edition CSV Export
//!
//! Produces the administrative spreadsheet of editions: one header row, one
//! row per edition, UTF-8, `\n` line endings. Text fields are always quoted
//! with RFC 4180 escaping; dates use the es-PE short form `dd/mm/yyyy`.

use crate::types::{CatalogError, Edition};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Header row, in column order.
pub const CSV_HEADERS: [&str; 7] = [
    "ID",
    "Nombre",
    "Año",
    "Descripción",
    "Estado",
    "Fecha Creación",
    "Última Actualización",
];

/// MIME type of the export.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Status text for an active edition.
pub const STATUS_ACTIVE: &str = "ACTIVA";

/// Status text for an inactive edition.
pub const STATUS_INACTIVE: &str = "INACTIVA";

/// A rendered export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// `convocatorias_<YYYY-MM-DD>.csv`
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("convocatorias_{}.csv", date.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn local_date(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

fn edition_row(edition: &Edition) -> String {
    [
        edition.id.to_string(),
        quote(&edition.name),
        edition.year.to_string(),
        quote(&edition.description),
        if edition.active {
            STATUS_ACTIVE
        } else {
            STATUS_INACTIVE
        }
        .to_string(),
        local_date(&edition.created_at),
        local_date(&edition.updated_at),
    ]
    .join(",")
}

/// Render `editions` as CSV text, in the given order.
///
/// # Errors
///
/// Returns `CatalogError::NothingToExport` for an empty slice.
pub fn editions_to_csv(editions: &[Edition]) -> Result<String, CatalogError> {
    if editions.is_empty() {
        return Err(CatalogError::NothingToExport);
    }

    let mut lines = Vec::with_capacity(editions.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    lines.extend(editions.iter().map(edition_row));
    Ok(lines.join("\n"))
}

/// Render `editions` and name the file after `date`.
pub fn export_editions(editions: &[Edition], date: NaiveDate) -> Result<CsvExport, CatalogError> {
    Ok(CsvExport {
        file_name: export_file_name(date),
        content: editions_to_csv(editions)?,
    })
}

// =============================================================================
// TESTS
// =============================================================================
