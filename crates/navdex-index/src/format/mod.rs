//! Serialization formats for fragments and navigation trees.
//!
//! - [`FragmentRecord`]: versioned JSON record of one module fragment
//! - [`NavigationDocument`]: versioned JSON document of a built tree
//! - [`parse_legacy_sidebar`]: importer for `initSidebarItems({...});` files
//!
//! # Fragment Record Format
//!
//! ```json
//! {
//!     "format_version": 1,
//!     "path": "diesel::pg::types::sql_types",
//!     "items": {
//!         "struct": [{"name": "Oid", "summary": "The OID SQL type."}],
//!         "type": [{"name": "Serial", "summary": "Alias for Integer"}]
//!     }
//! }
//! ```

mod document;
mod entries;
mod legacy;
mod record;

pub use document::{GroupRecord, NavigationDocument, NodeRecord};
pub use entries::CategoryEntries;
pub use legacy::parse_legacy_sidebar;
pub use record::FragmentRecord;

use crate::error::RegistryError;
use crate::model::{CategoryError, ItemCategory, PathError};

/// Current version of every format in this module.
pub const FORMAT_VERSION: u32 = 1;

/// Error returned when a serialized fragment or tree cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Malformed JSON or unexpected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Record written by an incompatible version.
    #[error("unsupported format version {found}")]
    UnsupportedVersion {
        /// Version found in the input.
        found: u32,
    },
    /// Legacy file without the `initSidebarItems(...)` wrapper.
    #[error("expected an initSidebarItems(...) call")]
    MissingWrapper,
    /// Invalid module path.
    #[error(transparent)]
    Path(#[from] PathError),
    /// Unknown item category.
    #[error(transparent)]
    Category(#[from] CategoryError),
    /// Duplicate item within the fragment.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A category listed twice for the same node of a navigation document.
    #[error("node `{path}` lists category {category} more than once")]
    DuplicateCategory {
        /// Node path.
        path: String,
        /// Repeated category.
        category: ItemCategory,
    },
    /// An item name listed twice in one category group of a navigation document.
    #[error("node `{path}` lists {category} `{name}` more than once")]
    DuplicateItem {
        /// Node path.
        path: String,
        /// Category of the repeated item.
        category: ItemCategory,
        /// Repeated item name.
        name: String,
    },
    /// Two children of one node share a segment.
    #[error("node `{path}` has more than one child named `{segment}`")]
    DuplicateSegment {
        /// Parent node path.
        path: String,
        /// Repeated segment.
        segment: String,
    },
    /// A node path that is not its parent path joined with its segment.
    #[error("node path `{found}` does not match its position, expected `{expected}`")]
    PathMismatch {
        /// Path implied by the node's ancestors and segment.
        expected: String,
        /// Path stored in the document.
        found: String,
    },
}

/// Reject versions other than [`FORMAT_VERSION`].
fn check_version(found: u32) -> Result<(), FormatError> {
    if found == FORMAT_VERSION {
        Ok(())
    } else {
        Err(FormatError::UnsupportedVersion { found })
    }
}
