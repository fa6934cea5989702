//! Navigation tree construction.
//!
//! Groups fragments by path-segment hierarchy. Intermediate segments that
//! were never registered become plain nodes; registered modules carry their
//! listing whether or not they have submodules.

use std::collections::BTreeMap;

use crate::model::{ModuleFragment, PATH_SEPARATOR};
use crate::tree::{ModuleListing, NavNode, NavigationTree};

/// Mutable node used while fragments are being added.
#[derive(Default)]
struct DraftNode {
    module: Option<ModuleListing>,
    children: BTreeMap<String, DraftNode>,
}

/// Builder for constructing [`NavigationTree`] instances.
pub(crate) struct NavigationTreeBuilder {
    root: DraftNode,
}

impl NavigationTreeBuilder {
    /// Create an empty builder.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            root: DraftNode::default(),
        }
    }

    /// Add one module fragment.
    ///
    /// Paths are unique per registry, so a node never receives two listings.
    pub(crate) fn add_module(&mut self, fragment: &ModuleFragment) {
        let node = fragment
            .path()
            .segments()
            .fold(&mut self.root, |node, segment| {
                node.children.entry(segment.to_owned()).or_default()
            });
        debug_assert!(
            node.module.is_none(),
            "module `{}` added twice",
            fragment.path()
        );
        node.module = Some(ModuleListing::from_fragment(fragment));
    }

    /// Build the [`NavigationTree`] instance.
    #[must_use]
    pub(crate) fn build(self) -> NavigationTree {
        NavigationTree::new(finish(String::new(), String::new(), self.root))
    }
}

/// Convert a draft subtree into ordered [`NavNode`]s.
fn finish(segment: String, path: String, draft: DraftNode) -> NavNode {
    let children = draft
        .children
        .into_iter()
        .map(|(child_segment, child)| {
            let child_path = if path.is_empty() {
                child_segment.clone()
            } else {
                format!("{path}{PATH_SEPARATOR}{child_segment}")
            };
            finish(child_segment, child_path, child)
        })
        .collect();

    NavNode::new(segment, path, draft.module, children)
}

/// Build a tree from a set of fragments with unique paths.
pub(crate) fn build_tree<'a>(
    fragments: impl IntoIterator<Item = &'a ModuleFragment>,
) -> NavigationTree {
    let mut builder = NavigationTreeBuilder::new();
    for fragment in fragments {
        builder.add_module(fragment);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemCategory, ModulePath, SidebarItem};
    use pretty_assertions::assert_eq;

    fn fragment(path: &str, groups: Vec<(ItemCategory, Vec<SidebarItem>)>) -> ModuleFragment {
        ModuleFragment::new(ModulePath::parse(path).unwrap(), groups).unwrap()
    }

    #[test]
    fn test_empty_builder_produces_bare_root() {
        let tree = NavigationTreeBuilder::new().build();

        assert_eq!(tree.module_count(), 0);
        assert!(tree.root().is_leaf());
        assert!(!tree.root().is_module());
    }

    #[test]
    fn test_intermediate_segments_are_created() {
        let tree = build_tree(&[fragment("diesel::pg::types", Vec::new())]);

        let pg = tree.node("diesel::pg").unwrap();
        assert!(!pg.is_module());
        assert_eq!(pg.path(), "diesel::pg");
        assert!(tree.node("diesel::pg::types").unwrap().is_module());
        assert_eq!(tree.module_count(), 1);
    }

    #[test]
    fn test_children_sorted_regardless_of_insertion_order() {
        let fragments = [
            fragment("diesel::sqlite", Vec::new()),
            fragment("diesel::mysql", Vec::new()),
            fragment("diesel::pg", Vec::new()),
            fragment("diesel::Pg", Vec::new()),
        ];

        let tree = build_tree(&fragments);

        assert_eq!(
            tree.children("diesel"),
            Some(vec!["Pg", "mysql", "pg", "sqlite"])
        );
    }

    #[test]
    fn test_registered_parent_keeps_listing_and_children() {
        let fragments = [
            fragment("diesel::pg::types", Vec::new()),
            fragment(
                "diesel::pg",
                vec![(ItemCategory::Struct, vec![SidebarItem::new("Pg", "")])],
            ),
        ];

        let tree = build_tree(&fragments);

        let pg = tree.node("diesel::pg").unwrap();
        assert_eq!(pg.module().map(ModuleListing::item_count), Some(1));
        assert_eq!(tree.children("diesel::pg"), Some(vec!["types"]));
        assert_eq!(tree.module_count(), 2);
    }
}
