//! Parallel fragment loading.

use std::fs;
use std::path::PathBuf;

use navdex_index::format::{FragmentRecord, parse_legacy_sidebar};
use navdex_index::{FragmentRegistry, ModuleFragment, ModulePath};
use rayon::prelude::*;

use crate::error::LoadError;
use crate::scanner::{FragmentKind, FragmentRef, Scanner};

/// Default fragment record filename.
pub const DEFAULT_RECORD_FILENAME: &str = "sidebar-items.json";

/// Default legacy fragment filename.
pub const DEFAULT_LEGACY_FILENAME: &str = "sidebar-items.js";

/// Counts reported after a successful load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of fragments registered.
    pub fragments: usize,
    /// Number of sidebar items across all fragments.
    pub items: usize,
}

/// Loads fragment files from a directory tree into a [`FragmentRegistry`].
#[derive(Clone, Debug)]
pub struct FragmentLoader {
    source_dir: PathBuf,
    legacy: bool,
    record_filename: String,
    legacy_filename: String,
}

impl FragmentLoader {
    /// Create a loader for `source_dir` with default filenames and legacy
    /// import enabled.
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            legacy: true,
            record_filename: DEFAULT_RECORD_FILENAME.to_owned(),
            legacy_filename: DEFAULT_LEGACY_FILENAME.to_owned(),
        }
    }

    /// Enable or disable import of legacy `sidebar-items.js` files.
    #[must_use]
    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Override the record and legacy filenames.
    #[must_use]
    pub fn with_filenames(mut self, record: &str, legacy: &str) -> Self {
        record.clone_into(&mut self.record_filename);
        legacy.clone_into(&mut self.legacy_filename);
        self
    }

    /// Read every fragment under the source directory and register it.
    ///
    /// Files are parsed and registered in parallel on the global rayon pool.
    /// The first failure aborts the load; the registry may then hold some of
    /// the fragments and should be discarded.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] naming the offending file, or
    /// [`LoadError::SourceNotFound`] if the directory is missing.
    pub fn load_into(&self, registry: &FragmentRegistry) -> Result<LoadSummary, LoadError> {
        let legacy_filename = self.legacy.then_some(self.legacy_filename.as_str());
        let refs = Scanner::new(&self.source_dir, &self.record_filename, legacy_filename).scan()?;
        tracing::debug!(
            source = %self.source_dir.display(),
            files = refs.len(),
            "Scanned fragment files"
        );

        let item_counts = refs
            .par_iter()
            .map(|fragment_ref| -> Result<usize, LoadError> {
                let fragment = read_fragment(fragment_ref)?;
                let items = fragment.item_count();
                registry
                    .register_fragment(fragment)
                    .map_err(|source| LoadError::Registry {
                        path: fragment_ref.file_path.clone(),
                        source,
                    })?;
                Ok(items)
            })
            .collect::<Result<Vec<usize>, LoadError>>()?;

        let summary = LoadSummary {
            fragments: item_counts.len(),
            items: item_counts.iter().sum(),
        };
        tracing::info!(
            fragments = summary.fragments,
            items = summary.items,
            "Loaded sidebar fragments"
        );
        Ok(summary)
    }
}

/// Read and parse one fragment file.
fn read_fragment(fragment_ref: &FragmentRef) -> Result<ModuleFragment, LoadError> {
    let file_path = &fragment_ref.file_path;
    let source = fs::read_to_string(file_path).map_err(|e| LoadError::io(file_path, e))?;

    let fragment = match fragment_ref.kind {
        FragmentKind::Record => FragmentRecord::from_json(&source)
            .and_then(FragmentRecord::into_fragment)
            .map_err(|e| LoadError::format(file_path, e))?,
        FragmentKind::Legacy => {
            if fragment_ref.dir_segments.is_empty() {
                return Err(LoadError::MissingModulePath {
                    path: file_path.clone(),
                });
            }
            let path = ModulePath::from_segments(&fragment_ref.dir_segments)
                .map_err(|e| LoadError::format(file_path, e))?;
            parse_legacy_sidebar(path, &source).map_err(|e| LoadError::format(file_path, e))?
        }
    };

    tracing::debug!(
        module = %fragment.path(),
        file = %file_path.display(),
        items = fragment.item_count(),
        "Parsed fragment"
    );
    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use navdex_index::format::FormatError;
    use navdex_index::{ItemCategory, RegistryError, SidebarItem};
    use pretty_assertions::assert_eq;

    const SQL_TYPES: &str = r#"initSidebarItems({"struct":[["Array","The Array SQL type."],["Oid","The OID SQL type. This is a PostgreSQL specific type."],["Timestamptz","The \"timestamp with time zone\" SQL type."],["Uuid","The UUID SQL type."]],"type":[["BigSerial","Alias for BigInt"],["Bytea","Alias for `Binary`"],["Serial","Alias for Integer"],["SmallSerial","Alias for SmallInt"]]});"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn record(path: &str, items: &str) -> String {
        format!(r#"{{"format_version": 1, "path": "{path}", "items": {items}}}"#)
    }

    #[test]
    fn test_load_records_and_legacy_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            temp_dir.path(),
            "diesel/pg/types/sql_types/sidebar-items.js",
            SQL_TYPES,
        );
        write(
            temp_dir.path(),
            "diesel/sidebar-items.json",
            &record("diesel", r#"{"macro": [{"name": "table"}]}"#),
        );

        let registry = FragmentRegistry::new();
        let summary = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&registry)
            .unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                fragments: 2,
                items: 9
            }
        );
        registry.seal();
        let tree = registry.build().unwrap();
        assert_eq!(tree.children("diesel::pg::types"), Some(vec!["sql_types"]));
        let listing = tree.module("diesel::pg::types::sql_types").unwrap();
        assert_eq!(listing.get(ItemCategory::Struct).unwrap().len(), 4);
        assert_eq!(
            tree.module("diesel").unwrap().get(ItemCategory::Macro),
            Some(&[SidebarItem::new("table", "")][..])
        );
    }

    #[test]
    fn test_record_path_comes_from_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            temp_dir.path(),
            "anywhere/sidebar-items.json",
            &record("pg.types", "{}"),
        );

        let registry = FragmentRegistry::new();
        FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&registry)
            .unwrap();

        assert!(registry.contains(&ModulePath::parse("pg::types").unwrap()));
    }

    #[test]
    fn test_legacy_disabled_skips_js_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "diesel/sidebar-items.js", SQL_TYPES);

        let registry = FragmentRegistry::new();
        let summary = FragmentLoader::new(temp_dir.path().to_path_buf())
            .with_legacy(false)
            .load_into(&registry)
            .unwrap();

        assert_eq!(summary, LoadSummary::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_custom_filenames() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "a/nav.json", &record("a", "{}"));
        write(temp_dir.path(), "a/sidebar-items.json", "not json");

        let registry = FragmentRegistry::new();
        let summary = FragmentLoader::new(temp_dir.path().to_path_buf())
            .with_filenames("nav.json", "nav.js")
            .load_into(&registry)
            .unwrap();

        assert_eq!(summary.fragments, 1);
    }

    #[test]
    fn test_legacy_file_at_root_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "sidebar-items.js", SQL_TYPES);

        let err = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&FragmentRegistry::new())
            .unwrap_err();

        assert!(matches!(err, LoadError::MissingModulePath { .. }));
    }

    #[test]
    fn test_dotted_legacy_directory_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "diesel-1.0/pg/sidebar-items.js", "initSidebarItems({});");

        let err = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&FragmentRegistry::new())
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Format {
                source: FormatError::Path(_),
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_module_across_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "diesel/sidebar-items.js", "initSidebarItems({});");
        write(
            temp_dir.path(),
            "other/sidebar-items.json",
            &record("diesel", "{}"),
        );

        let err = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&FragmentRegistry::new())
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Registry {
                source: RegistryError::DuplicateModule { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_record_names_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "broken/sidebar-items.json", "{");

        let err = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&FragmentRegistry::new())
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Format {
                source: FormatError::Json(_),
                ..
            }
        ));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_unsupported_record_version() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            temp_dir.path(),
            "a/sidebar-items.json",
            r#"{"format_version": 7, "path": "a"}"#,
        );

        let err = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&FragmentRegistry::new())
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Format {
                source: FormatError::UnsupportedVersion { found: 7 },
                ..
            }
        ));
    }

    #[test]
    fn test_sealed_registry_rejects_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "a/sidebar-items.json", &record("a", "{}"));
        let registry = FragmentRegistry::new();
        registry.seal();

        let err = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&registry)
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Registry {
                source: RegistryError::RegistryClosed { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_source_dir() {
        let err = FragmentLoader::new(PathBuf::from("/nonexistent/doc"))
            .load_into(&FragmentRegistry::new())
            .unwrap_err();

        assert!(matches!(err, LoadError::SourceNotFound(_)));
    }

    #[test]
    fn test_many_fragments_load_in_parallel() {
        let temp_dir = tempfile::tempdir().unwrap();
        for i in 0..64 {
            write(
                temp_dir.path(),
                &format!("krate/m{i}/sidebar-items.js"),
                r#"initSidebarItems({"fn":[["run",""]]});"#,
            );
        }

        let registry = FragmentRegistry::new();
        let summary = FragmentLoader::new(temp_dir.path().to_path_buf())
            .load_into(&registry)
            .unwrap();

        assert_eq!(summary.fragments, 64);
        assert_eq!(summary.items, 64);
        registry.seal();
        assert_eq!(registry.build().unwrap().children("krate").unwrap().len(), 64);
    }
}
