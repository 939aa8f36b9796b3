//! Resolve user-supplied references (ID prefixes, names, crime labels).

use casebook_core::{Casebook, Crime, CrimeKey, Note, PerpetratorFile, Report, ReportPreset};

use super::parsing::match_id;

pub fn find_note<'a>(book: &'a Casebook, query: &str) -> anyhow::Result<&'a Note> {
    match_id(book.notes().notes(), query, |n| n.id, "note", "casebook note list")
}

pub fn find_report<'a>(book: &'a Casebook, query: &str) -> anyhow::Result<&'a Report> {
    match_id(
        book.ledger().reports(),
        query,
        |r| r.id,
        "report",
        "casebook report list",
    )
}

/// A perpetrator file by name (case-insensitive), else by ID prefix.
pub fn find_file<'a>(book: &'a Casebook, query: &str) -> anyhow::Result<&'a PerpetratorFile> {
    if let Some(file) = book.ledger().find_perpetrator_by_name(query) {
        return Ok(file);
    }
    match_id(
        book.ledger().perpetrator_files(),
        query,
        |f| f.id,
        "perpetrator file",
        "casebook file list",
    )
}

/// A preset by name (case-insensitive), else by ID prefix.
pub fn find_preset<'a>(book: &'a Casebook, query: &str) -> anyhow::Result<&'a ReportPreset> {
    if let Some(preset) = book.presets().find(query) {
        return Ok(preset);
    }
    match_id(
        book.presets().presets(),
        query,
        |p| p.id,
        "preset",
        "casebook preset list",
    )
}

/// A catalog crime by `"Name (Statute)"` label or unambiguous name.
pub fn find_crime(book: &Casebook, label: &str) -> anyhow::Result<CrimeKey> {
    Ok(book.catalog().resolve(label)?.key())
}

/// Resolve every label against the catalog, keeping order and repeats.
pub fn resolve_crimes(book: &Casebook, labels: &[String]) -> anyhow::Result<Vec<Crime>> {
    let crimes = labels
        .iter()
        .map(|label| book.catalog().resolve(label))
        .collect::<casebook_core::Result<Vec<_>>>()?;
    Ok(crimes)
}
