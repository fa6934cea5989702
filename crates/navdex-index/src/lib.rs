//! Sidebar fragment registry and navigation tree builder for navdex.
//!
//! This crate provides:
//! - [`FragmentRegistry`]: build-scoped accumulator of per-module sidebar fragments
//! - [`NavigationTree`]: deterministic, read-only navigation tree built from a sealed registry
//! - [`format`]: versioned serialization of fragments and trees, plus the legacy
//!   `initSidebarItems(...)` importer
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use navdex_index::{FragmentRegistry, ItemCategory, ModulePath, SidebarItem};
//!
//! let registry = FragmentRegistry::new();
//! registry.register(
//!     ModulePath::parse("pg::types")?,
//!     [(ItemCategory::Struct, vec![SidebarItem::new("Oid", "The OID SQL type.")])],
//! )?;
//! registry.seal();
//!
//! let tree = registry.build()?;
//! assert_eq!(tree.module_count(), 1);
//! assert_eq!(tree.children("pg"), Some(vec!["types"]));
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
pub mod format;
mod model;
mod registry;
mod tree;

pub use error::RegistryError;
pub use model::{
    CategoryError, ItemCategory, ModuleFragment, ModulePath, PATH_SEPARATOR, PathError,
    SidebarItem,
};
pub use registry::{FragmentRegistry, RegistryPhase};
pub use tree::{CategoryGroup, ModuleListing, Modules, NavNode, NavigationTree};
