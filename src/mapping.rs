//! Loads and holds the artwork mapping table.
//!
//! The table is fetched once, at startup, from a module-relative JSON resource
//! and is immutable afterwards. Until the fetch resolves, the shared
//! `MappingCell` stays empty and the overlay runs in pass-through mode; a
//! failed fetch leaves it empty for the rest of the process's life. There is
//! deliberately no retry and no reload path.

use std::collections::HashMap;

use eyre::{Context, Result};
use itertools::Itertools;
use once_cell::sync::OnceCell;
use serde::Deserialize;

/// The file name of the mapping resource within the module's directory.
const MAPPING_FILE: &str = "mapping.json";

/// Returns the URL of the mapping resource relative to `base`, the module's
/// own directory (e.g. `https://host/modules/my-art-module`).
pub fn mapping_url(base: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), MAPPING_FILE)
}

/// The replacement artwork for a single record. Anything else the mapping
/// author put in the object is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OverrideRecord {
    /// The replacement image path. A record without one means "no change".
    pub img: Option<String>,
}

impl OverrideRecord {
    /// The replacement image path, if this record actually carries one.
    pub fn image(&self) -> Option<&str> {
        self.img.as_deref()
    }
}

/// The parsed mapping: collection identifier to record identifier to override.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MappingTable(HashMap<String, HashMap<String, OverrideRecord>>);

impl MappingTable {
    /// Parses a mapping table from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<MappingTable> {
        serde_json::from_slice(bytes).wrap_err("unable to parse mapping JSON")
    }

    /// Parses a mapping table from a reader over JSON text.
    pub fn from_reader(reader: impl std::io::Read) -> Result<MappingTable> {
        serde_json::from_reader(reader).wrap_err("unable to parse mapping JSON")
    }

    /// Looks up the override for `record_id` within `collection_id`. Absent
    /// keys at either level just mean there is no override.
    pub fn lookup(&self, collection_id: &str, record_id: &str) -> Option<&OverrideRecord> {
        self.0.get(collection_id)?.get(record_id)
    }

    /// Returns true if the table has an override set for the collection.
    pub fn contains_collection(&self, collection_id: &str) -> bool {
        self.0.contains_key(collection_id)
    }

    /// The identifiers of every collection the table covers.
    pub fn collection_ids(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The shared slot the mapping table lives in once loaded.
///
/// It starts empty, is filled at most once, and is only ever read after that.
/// Readers check readiness through the cell itself, so a load that never
/// completes simply leaves every consumer passing data through untouched.
#[derive(Debug, Default)]
pub struct MappingCell {
    table: OnceCell<MappingTable>,
}

impl MappingCell {
    pub fn new() -> MappingCell {
        MappingCell {
            table: OnceCell::new(),
        }
    }

    /// Returns true once a table has been loaded into the cell.
    pub fn is_ready(&self) -> bool {
        self.table.get().is_some()
    }

    /// The loaded table, if there is one yet.
    pub fn get(&self) -> Option<&MappingTable> {
        self.table.get()
    }

    /// Looks up an override, returning `None` while the cell is unfilled or
    /// when the table has nothing for the given keys.
    pub fn lookup(&self, collection_id: &str, record_id: &str) -> Option<&OverrideRecord> {
        self.table.get()?.lookup(collection_id, record_id)
    }

    /// Fills the cell. Filling twice is a programming error: the table is
    /// loaded exactly once per process.
    pub fn fill(&self, table: MappingTable) {
        if self.table.set(table).is_err() {
            log::error!("mapping table filled twice; keeping the first load");
        }
    }
}

/// Fetches and parses the mapping resource at `url`. A network failure, a
/// non-success status or malformed JSON all come back as errors; the caller
/// decides how loudly to fail (the bootstrap layer just logs and carries on).
pub fn fetch_mapping(url: &str) -> Result<MappingTable> {
    let response = reqwest::blocking::get(url)
        .wrap_err_with(|| format!("unable to fetch mapping from {url}"))?
        .error_for_status()
        .wrap_err("mapping fetch returned an error status")?;

    MappingTable::from_reader(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_table() -> MappingTable {
        MappingTable::from_slice(
            br#"{ "pack.items": { "abc123": { "img": "art/sword.webp" } } }"#,
        )
        .unwrap()
    }

    #[test]
    fn lookup_finds_known_override() {
        let table = example_table();

        let record = table.lookup("pack.items", "abc123").unwrap();
        assert_eq!(record.image(), Some("art/sword.webp"));
    }

    #[test]
    fn lookup_tolerates_absent_keys() {
        let table = example_table();

        assert!(table.lookup("pack.other", "abc123").is_none());
        assert!(table.lookup("pack.items", "zzz999").is_none());
    }

    #[test]
    fn unknown_override_fields_are_ignored() {
        let table = MappingTable::from_slice(
            br#"{ "pack.items": { "abc123": { "img": "a.webp", "artist": "someone", "scale": 2 } } }"#,
        )
        .unwrap();

        let record = table.lookup("pack.items", "abc123").unwrap();
        assert_eq!(record.image(), Some("a.webp"));
    }

    #[test]
    fn override_without_image_parses_as_no_change() {
        let table =
            MappingTable::from_slice(br#"{ "pack.items": { "abc123": { "note": "todo" } } }"#)
                .unwrap();

        let record = table.lookup("pack.items", "abc123").unwrap();
        assert_eq!(record.image(), None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(MappingTable::from_slice(b"{ not json").is_err());
    }

    #[test]
    fn cell_starts_empty_and_fills_once() {
        let cell = MappingCell::new();
        assert!(!cell.is_ready());
        assert!(cell.lookup("pack.items", "abc123").is_none());

        cell.fill(example_table());
        assert!(cell.is_ready());
        assert!(cell.lookup("pack.items", "abc123").is_some());
    }

    #[test]
    fn mapping_url_joins_cleanly() {
        assert_eq!(
            mapping_url("https://host/modules/art"),
            "https://host/modules/art/mapping.json"
        );
        assert_eq!(
            mapping_url("https://host/modules/art/"),
            "https://host/modules/art/mapping.json"
        );
    }
}
