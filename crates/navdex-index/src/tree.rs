//! Navigation tree for sidebar rendering.
//!
//! The tree is rooted at an unnamed node whose children are crate segments.
//! Every node is one module path segment; nodes that correspond to a
//! registered module carry its [`ModuleListing`].
//!
//! # Ordering
//!
//! - Children are ordered by segment (byte-wise), so a pre-order walk visits
//!   modules in path order
//! - Categories within a listing follow [`ItemCategory`]'s canonical order
//! - Items within a category are ordered by name, case-sensitively

use crate::model::{ItemCategory, ModuleFragment, ModulePath, SidebarItem};

/// Items of one category within a module listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryGroup {
    category: ItemCategory,
    items: Vec<SidebarItem>,
}

impl CategoryGroup {
    /// Create a group, sorting its items by name.
    pub(crate) fn new(category: ItemCategory, mut items: Vec<SidebarItem>) -> Self {
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Self { category, items }
    }

    /// Category of this group.
    #[must_use]
    pub fn category(&self) -> ItemCategory {
        self.category
    }

    /// Heading for this group (e.g. "Type Aliases").
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.category.display_name()
    }

    /// Items in ascending name order.
    #[must_use]
    pub fn items(&self) -> &[SidebarItem] {
        &self.items
    }
}

/// Category-ordered item listing of one module.
///
/// Empty categories are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleListing {
    groups: Vec<CategoryGroup>,
}

impl ModuleListing {
    /// Build a listing from a registered fragment.
    pub(crate) fn from_fragment(fragment: &ModuleFragment) -> Self {
        Self::from_groups(
            fragment
                .groups()
                .map(|(category, items)| CategoryGroup::new(category, items.to_vec())),
        )
    }

    /// Build a listing from groups, dropping empty ones and restoring canonical order.
    pub(crate) fn from_groups(groups: impl IntoIterator<Item = CategoryGroup>) -> Self {
        let mut groups: Vec<CategoryGroup> =
            groups.into_iter().filter(|g| !g.items.is_empty()).collect();
        groups.sort_by_key(|g| g.category);
        Self { groups }
    }

    /// Non-empty category groups in canonical order.
    #[must_use]
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Items of one category, `None` if the module lists none.
    #[must_use]
    pub fn get(&self, category: ItemCategory) -> Option<&[SidebarItem]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(CategoryGroup::items)
    }

    /// Total number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// True if the module lists no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One path segment in the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavNode {
    segment: String,
    path: String,
    module: Option<ModuleListing>,
    children: Vec<NavNode>,
}

impl NavNode {
    /// Create a node. `children` must already be ordered by segment.
    pub(crate) fn new(
        segment: String,
        path: String,
        module: Option<ModuleListing>,
        children: Vec<NavNode>,
    ) -> Self {
        Self {
            segment,
            path,
            module,
            children,
        }
    }

    /// Segment name (empty for the root).
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Canonical path prefix of this node (empty for the root).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Item listing if this node is a registered module.
    #[must_use]
    pub fn module(&self) -> Option<&ModuleListing> {
        self.module.as_ref()
    }

    /// True if this node corresponds to a registered module.
    #[must_use]
    pub fn is_module(&self) -> bool {
        self.module.is_some()
    }

    /// Child nodes ordered by segment.
    #[must_use]
    pub fn children(&self) -> &[NavNode] {
        &self.children
    }

    /// True if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn child(&self, segment: &str) -> Option<&NavNode> {
        self.children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.children[i])
    }
}

/// Deterministic navigation tree built from a sealed registry.
///
/// Read-only after construction. Lookups accept paths with either `::` or
/// `.` separators; the empty string addresses the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTree {
    root: NavNode,
    module_count: usize,
}

impl NavigationTree {
    /// Create a tree from its root node, counting module nodes.
    pub(crate) fn new(root: NavNode) -> Self {
        let module_count = Modules::new(&root).count();
        Self { root, module_count }
    }

    /// Unnamed root node; its children are crate segments.
    #[must_use]
    pub fn root(&self) -> &NavNode {
        &self.root
    }

    /// Number of registered modules in the tree.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.module_count
    }

    /// Get the node at a path prefix.
    ///
    /// # Arguments
    ///
    /// * `path` - Module path prefix (e.g. "diesel::pg"), empty for the root
    ///
    /// # Returns
    ///
    /// Node reference if the prefix exists, `None` otherwise (including
    /// unparseable paths).
    #[must_use]
    pub fn node(&self, path: &str) -> Option<&NavNode> {
        if path.is_empty() {
            return Some(&self.root);
        }
        let path = ModulePath::parse(path).ok()?;
        path.segments()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Child segment names below a path prefix, in display order.
    #[must_use]
    pub fn children(&self, prefix: &str) -> Option<Vec<&str>> {
        self.node(prefix)
            .map(|node| node.children.iter().map(NavNode::segment).collect())
    }

    /// Category-ordered listing of a registered module.
    #[must_use]
    pub fn module(&self, path: &str) -> Option<&ModuleListing> {
        self.node(path).and_then(NavNode::module)
    }

    /// Iterate over module nodes in path order (pre-order).
    #[must_use]
    pub fn modules(&self) -> Modules<'_> {
        Modules::new(&self.root)
    }
}

/// Pre-order iterator over the module nodes of a [`NavigationTree`].
pub struct Modules<'a> {
    stack: Vec<&'a NavNode>,
}

impl<'a> Modules<'a> {
    fn new(root: &'a NavNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Modules<'a> {
    type Item = &'a NavNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children.iter().rev());
            if node.is_module() {
                return Some(node);
            }
        }
        None
    }
}
