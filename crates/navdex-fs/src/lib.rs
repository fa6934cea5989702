//! Filesystem loading of sidebar fragments for navdex.
//!
//! This crate provides [`FragmentLoader`], which walks a documentation output
//! directory and registers every fragment it finds into a
//! [`FragmentRegistry`](navdex_index::FragmentRegistry):
//!
//! - `sidebar-items.json`: versioned fragment records carrying their own module path
//! - `sidebar-items.js`: legacy `initSidebarItems(...)` files, whose module path is
//!   the directory they sit in (`diesel/pg/sidebar-items.js` documents `diesel::pg`)
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use navdex_fs::FragmentLoader;
//! use navdex_index::FragmentRegistry;
//!
//! let registry = FragmentRegistry::new();
//! let summary = FragmentLoader::new(PathBuf::from("target/doc")).load_into(&registry)?;
//! registry.seal();
//! println!("{} modules", summary.fragments);
//! # Ok(())
//! # }
//! ```

mod error;
mod loader;
mod scanner;

pub use error::LoadError;
pub use loader::{DEFAULT_LEGACY_FILENAME, DEFAULT_RECORD_FILENAME, FragmentLoader, LoadSummary};
