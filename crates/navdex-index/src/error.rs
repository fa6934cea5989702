//! Registry error types.

use crate::model::{ItemCategory, ModulePath};

/// Error returned by [`FragmentRegistry`](crate::FragmentRegistry) operations.
///
/// Every variant except [`EmptyRegistry`](Self::EmptyRegistry) signals a
/// configuration bug in the upstream generator. No variant is transient, so
/// retrying never helps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The module path was already registered in this build.
    #[error("module `{path}` is already registered")]
    DuplicateModule {
        /// Path registered twice.
        path: ModulePath,
    },
    /// A fragment lists the same item twice in one category.
    #[error("module `{path}` lists {category} `{name}` more than once")]
    DuplicateItem {
        /// Module containing the duplicate.
        path: ModulePath,
        /// Category of the duplicate item.
        category: ItemCategory,
        /// Duplicated item name.
        name: String,
    },
    /// Registration attempted after the registry was sealed.
    #[error("registry is sealed, cannot register module `{path}`")]
    RegistryClosed {
        /// Path of the rejected registration.
        path: ModulePath,
    },
    /// Build attempted before the registry was sealed.
    #[error("registry must be sealed before building navigation")]
    IncompleteRegistry,
    /// Build attempted on a registry that never received a fragment.
    #[error("no module fragments were registered")]
    EmptyRegistry,
}

impl RegistryError {
    /// True for conditions a caller may downgrade to "nothing to render".
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::EmptyRegistry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_empty_registry_is_soft() {
        let path = ModulePath::parse("pg").unwrap();

        assert!(RegistryError::EmptyRegistry.is_soft());
        assert!(!RegistryError::IncompleteRegistry.is_soft());
        assert!(!RegistryError::DuplicateModule { path: path.clone() }.is_soft());
        assert!(!RegistryError::RegistryClosed { path }.is_soft());
    }

    #[test]
    fn test_duplicate_item_message() {
        let err = RegistryError::DuplicateItem {
            path: ModulePath::parse("pg::types").unwrap(),
            category: ItemCategory::Struct,
            name: "Oid".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "module `pg::types` lists struct `Oid` more than once"
        );
    }
}
