//! Versioned navigation documents.
//!
//! A [`NavigationDocument`] is what `navdex build` writes for the site
//! renderer:
//!
//! ```json
//! {
//!     "format_version": 1,
//!     "modules": 1,
//!     "root": {
//!         "segment": "",
//!         "path": "",
//!         "children": [
//!             {
//!                 "segment": "pg",
//!                 "path": "pg",
//!                 "items": [
//!                     {"category": "struct", "title": "Structs", "items": [{"name": "Oid", "summary": "..."}]}
//!                 ]
//!             }
//!         ]
//!     }
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{FORMAT_VERSION, FormatError, check_version};
use crate::model::{ItemCategory, ModulePath, PATH_SEPARATOR, SidebarItem};
use crate::tree::{CategoryGroup, ModuleListing, NavNode, NavigationTree};

/// Serialized navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationDocument {
    /// Format version, see [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Number of module nodes.
    pub modules: usize,
    /// Root node.
    pub root: NodeRecord,
}

/// Serialized navigation node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Segment name (empty for the root).
    pub segment: String,
    /// Canonical path prefix.
    pub path: String,
    /// Category groups, present only for module nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<GroupRecord>>,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

/// Serialized category group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Category tag.
    pub category: ItemCategory,
    /// Display heading for renderers.
    pub title: String,
    /// Items in name order.
    pub items: Vec<SidebarItem>,
}

impl From<&NavNode> for NodeRecord {
    fn from(node: &NavNode) -> Self {
        Self {
            segment: node.segment().to_owned(),
            path: node.path().to_owned(),
            items: node.module().map(|listing| {
                listing
                    .groups()
                    .iter()
                    .map(|group| GroupRecord {
                        category: group.category(),
                        title: group.title().to_owned(),
                        items: group.items().to_vec(),
                    })
                    .collect()
            }),
            children: node.children().iter().map(NodeRecord::from).collect(),
        }
    }
}

impl From<&NavigationTree> for NavigationDocument {
    fn from(tree: &NavigationTree) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            modules: tree.module_count(),
            root: NodeRecord::from(tree.root()),
        }
    }
}

impl NavigationDocument {
    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, FormatError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Rebuild the navigation tree for read-only traversal.
    ///
    /// Ordering is restored even if the document was edited by hand; the
    /// `modules` count is recomputed rather than trusted. The root's segment
    /// is ignored.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported version, a node whose path does not follow
    /// from its ancestors, sibling nodes sharing a segment, or a node listing
    /// a category or an item name twice.
    pub fn into_tree(self) -> Result<NavigationTree, FormatError> {
        check_version(self.format_version)?;
        Ok(NavigationTree::new(node_from_record(self.root, None)?))
    }
}

/// Convert a node record, checking it against its parent's path.
///
/// `parent` is `None` for the root.
fn node_from_record(record: NodeRecord, parent: Option<&str>) -> Result<NavNode, FormatError> {
    let (segment, expected) = match parent {
        None => (String::new(), String::new()),
        Some(parent) => {
            ModulePath::from_segments([&record.segment])?;
            let expected = if parent.is_empty() {
                record.segment.clone()
            } else {
                format!("{parent}{PATH_SEPARATOR}{}", record.segment)
            };
            (record.segment, expected)
        }
    };
    if record.path != expected {
        return Err(FormatError::PathMismatch {
            expected,
            found: record.path,
        });
    }

    let module = match record.items {
        Some(groups) => Some(listing_from_groups(&record.path, groups)?),
        None => None,
    };

    let mut segments = HashSet::new();
    let mut children = Vec::with_capacity(record.children.len());
    for child in record.children {
        if !segments.insert(child.segment.clone()) {
            return Err(FormatError::DuplicateSegment {
                path: record.path.clone(),
                segment: child.segment,
            });
        }
        children.push(node_from_record(child, Some(record.path.as_str()))?);
    }
    children.sort_by(|a, b| a.segment().cmp(b.segment()));

    Ok(NavNode::new(segment, record.path, module, children))
}

fn listing_from_groups(path: &str, groups: Vec<GroupRecord>) -> Result<ModuleListing, FormatError> {
    let mut seen = HashSet::new();
    let mut converted = Vec::with_capacity(groups.len());
    for group in groups {
        if !seen.insert(group.category) {
            return Err(FormatError::DuplicateCategory {
                path: path.to_owned(),
                category: group.category,
            });
        }
        if let Some(name) = first_repeated_name(&group.items) {
            return Err(FormatError::DuplicateItem {
                path: path.to_owned(),
                category: group.category,
                name: name.to_owned(),
            });
        }
        converted.push(CategoryGroup::new(group.category, group.items));
    }
    Ok(ModuleListing::from_groups(converted))
}

fn first_repeated_name(items: &[SidebarItem]) -> Option<&str> {
    let mut names = HashSet::new();
    items
        .iter()
        .map(|item| item.name.as_str())
        .find(|name| !names.insert(*name))
}
