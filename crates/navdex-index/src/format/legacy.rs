//! Importer for legacy `sidebar-items.js` fragments.
//!
//! Older API-reference generators emit one JavaScript file per module that
//! registers its sidebar as an executable call:
//!
//! ```text
//! initSidebarItems({"struct":[["Oid","The OID SQL type."]],"type":[["Serial","Alias for Integer"]]});
//! ```
//!
//! The payload is a JSON object mapping category tags to `[name, summary]`
//! pairs (newer generators emit bare names). The module path is not part of
//! the payload and must come from the file's location.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{CategoryEntries, FormatError};
use crate::model::{ItemCategory, ModuleFragment, ModulePath, SidebarItem};

static WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A\s*(?:window\.)?initSidebarItems\s*\((.*)\)\s*;?\s*\z").unwrap()
});

/// One entry of a legacy category array.
#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyEntry {
    Pair(String, String),
    Name(String),
}

impl From<LegacyEntry> for SidebarItem {
    fn from(entry: LegacyEntry) -> Self {
        match entry {
            LegacyEntry::Pair(name, summary) => SidebarItem::new(name, summary),
            LegacyEntry::Name(name) => SidebarItem::new(name, ""),
        }
    }
}

/// Parse a legacy `initSidebarItems(...)` file into a fragment.
///
/// # Arguments
///
/// * `path` - Module path the file documents (derived from its location)
/// * `source` - File contents
///
/// # Errors
///
/// Fails if the wrapper call is missing, the payload is not a category
/// object, a category is unknown, or an item repeats within a category.
pub fn parse_legacy_sidebar(path: ModulePath, source: &str) -> Result<ModuleFragment, FormatError> {
    let payload = WRAPPER_RE
        .captures(source)
        .and_then(|caps| caps.get(1))
        .ok_or(FormatError::MissingWrapper)?
        .as_str();

    let raw: CategoryEntries<LegacyEntry> = serde_json::from_str(payload)?;
    let groups = raw
        .into_iter()
        .map(|(tag, entries)| -> Result<_, FormatError> {
            let category = tag.parse::<ItemCategory>()?;
            let items: Vec<SidebarItem> = entries.into_iter().map(SidebarItem::from).collect();
            Ok((category, items))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ModuleFragment::new(path, groups)?)
}
