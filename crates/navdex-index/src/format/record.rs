//! Versioned fragment records.

use serde::{Deserialize, Serialize};

use super::{CategoryEntries, FORMAT_VERSION, FormatError, check_version};
use crate::model::{ItemCategory, ModuleFragment, ModulePath, SidebarItem};

/// Serialized form of one [`ModuleFragment`].
///
/// Category keys are kept as strings so that an unknown category is
/// reported by name instead of as a generic JSON error. A key repeated in
/// the JSON object is kept as a separate entry and merged on conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRecord {
    /// Format version, see [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Module path.
    pub path: String,
    /// Items by category tag.
    #[serde(default)]
    pub items: CategoryEntries<SidebarItem>,
}

impl From<&ModuleFragment> for FragmentRecord {
    fn from(fragment: &ModuleFragment) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            path: fragment.path().to_string(),
            items: fragment
                .groups()
                .map(|(category, items)| (category.tag().to_owned(), items.to_vec()))
                .collect(),
        }
    }
}

impl FragmentRecord {
    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the record to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, FormatError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Validate the record and convert it into a fragment.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported version, an invalid path, an unknown
    /// category or a duplicate item.
    pub fn into_fragment(self) -> Result<ModuleFragment, FormatError> {
        check_version(self.format_version)?;
        let path = ModulePath::parse(&self.path)?;
        let groups = self
            .items
            .into_iter()
            .map(|(tag, items)| -> Result<_, FormatError> {
                Ok((tag.parse::<ItemCategory>()?, items))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ModuleFragment::new(path, groups)?)
    }
}
