//! Build-scoped fragment registry.
//!
//! Provides [`FragmentRegistry`], the single registration entry point used by
//! extraction workers, and the two-phase `seal()` / `build()` protocol that
//! turns the collected fragments into a [`NavigationTree`].
//!
//! # Thread Safety
//!
//! The registry is designed for concurrent registration without external locking:
//! - `register()` and `seal()` take the internal write lock, so the insert and
//!   its uniqueness checks are atomic and `seal()` happens-after every prior
//!   registration
//! - `build()` takes the read lock and may run in parallel with other reads
//!   once the registry is sealed
//!
//! # Example
//!
//! ```
//! use std::thread;
//! use navdex_index::{FragmentRegistry, ModulePath};
//!
//! let registry = FragmentRegistry::new();
//! thread::scope(|s| {
//!     for name in ["pg", "mysql", "sqlite"] {
//!         let registry = &registry;
//!         s.spawn(move || {
//!             let path = ModulePath::parse(&format!("diesel::{name}")).unwrap();
//!             registry.register(path, []).unwrap();
//!         });
//!     }
//! });
//! registry.seal();
//! assert_eq!(registry.build().unwrap().module_count(), 3);
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::builder::build_tree;
use crate::error::RegistryError;
use crate::model::{ItemCategory, ModuleFragment, ModulePath, SidebarItem};
use crate::tree::NavigationTree;

/// Lifecycle phase of a [`FragmentRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryPhase {
    /// Accepts registrations.
    Open,
    /// Rejects registrations, accepts builds.
    Sealed,
}

/// Registry state guarded by the lock.
struct RegistryState {
    phase: RegistryPhase,
    fragments: HashMap<ModulePath, ModuleFragment>,
}

/// Accumulator of module fragments for one build invocation.
///
/// Construct one at build start, share it by reference with every
/// extraction worker, seal it once extraction completes and drop it when
/// the build ends. Nothing persists across builds.
pub struct FragmentRegistry {
    state: RwLock<RegistryState>,
}

impl Default for FragmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentRegistry {
    /// Create an empty, open registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                phase: RegistryPhase::Open,
                fragments: HashMap::new(),
            }),
        }
    }

    /// Register the sidebar items of one module.
    ///
    /// # Arguments
    ///
    /// * `path` - Module path, unique within this build
    /// * `items` - Category groups; a category may appear more than once
    ///
    /// # Errors
    ///
    /// - [`RegistryError::RegistryClosed`] if the registry is sealed
    /// - [`RegistryError::DuplicateModule`] if `path` is already registered
    /// - [`RegistryError::DuplicateItem`] if a `(category, name)` pair repeats
    pub fn register<I>(&self, path: ModulePath, items: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (ItemCategory, Vec<SidebarItem>)>,
    {
        let mut state = self.write();
        if state.phase == RegistryPhase::Sealed {
            return Err(RegistryError::RegistryClosed { path });
        }
        let fragment = ModuleFragment::new(path, items)?;
        Self::insert(&mut state, fragment)
    }

    /// Register an already constructed fragment.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::RegistryClosed`] if the registry is sealed
    /// - [`RegistryError::DuplicateModule`] if the path is already registered
    pub fn register_fragment(&self, fragment: ModuleFragment) -> Result<(), RegistryError> {
        let mut state = self.write();
        if state.phase == RegistryPhase::Sealed {
            return Err(RegistryError::RegistryClosed {
                path: fragment.path().clone(),
            });
        }
        Self::insert(&mut state, fragment)
    }

    fn insert(state: &mut RegistryState, fragment: ModuleFragment) -> Result<(), RegistryError> {
        match state.fragments.entry(fragment.path().clone()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateModule {
                path: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(
                    module = %fragment.path(),
                    items = fragment.item_count(),
                    "Registered module fragment"
                );
                entry.insert(fragment);
                Ok(())
            }
        }
    }

    /// Close the registry to further registrations.
    ///
    /// The transition is one-way; sealing a sealed registry does nothing.
    pub fn seal(&self) {
        let mut state = self.write();
        if state.phase == RegistryPhase::Sealed {
            tracing::debug!("Fragment registry already sealed");
            return;
        }
        state.phase = RegistryPhase::Sealed;
        tracing::info!(modules = state.fragments.len(), "Sealed fragment registry");
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RegistryPhase {
        self.read().phase
    }

    /// Number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().fragments.len()
    }

    /// True if no module has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().fragments.is_empty()
    }

    /// True if `path` has been registered.
    #[must_use]
    pub fn contains(&self, path: &ModulePath) -> bool {
        self.read().fragments.contains_key(path)
    }

    /// Build the navigation tree from the sealed registry.
    ///
    /// Idempotent: every call after sealing returns a structurally equal tree.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::IncompleteRegistry`] if the registry is not sealed
    /// - [`RegistryError::EmptyRegistry`] if nothing was registered; see
    ///   [`build_if_any`](Self::build_if_any) to treat that as "no navigation"
    pub fn build(&self) -> Result<NavigationTree, RegistryError> {
        let state = self.read();
        if state.phase != RegistryPhase::Sealed {
            return Err(RegistryError::IncompleteRegistry);
        }
        if state.fragments.is_empty() {
            return Err(RegistryError::EmptyRegistry);
        }

        let tree = build_tree(state.fragments.values());
        tracing::debug!(modules = tree.module_count(), "Built navigation tree");
        Ok(tree)
    }

    /// Build the navigation tree, mapping an empty registry to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IncompleteRegistry`] if the registry is not sealed.
    pub fn build_if_any(&self) -> Result<Option<NavigationTree>, RegistryError> {
        match self.build() {
            Ok(tree) => Ok(Some(tree)),
            Err(e) if e.is_soft() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // Writers never leave the state half-updated; a poisoned lock is reused as is.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
