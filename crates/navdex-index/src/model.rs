//! Sidebar fragment data model.
//!
//! A [`ModuleFragment`] is the sidebar data of one documented module: its
//! [`ModulePath`] and the [`SidebarItem`]s it lists, grouped by
//! [`ItemCategory`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RegistryError;

/// Separator used by the canonical form of a [`ModulePath`].
pub const PATH_SEPARATOR: &str = "::";

/// Error returned when a module path cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The path is an empty string.
    #[error("module path cannot be empty")]
    Empty,
    /// The path has a leading, trailing or doubled separator.
    #[error("module path `{0}` contains an empty segment")]
    EmptySegment(String),
    /// A segment contains a character that cannot appear in a module name.
    #[error("module path `{path}` contains invalid character {ch:?}")]
    InvalidCharacter {
        /// The rejected path.
        path: String,
        /// The offending character.
        ch: char,
    },
}

/// Identifier of a documentation unit, such as `diesel::pg::types`.
///
/// Parsing accepts both `::` and `.` separators and stores the canonical
/// `::`-joined form, so `pg.types` and `pg::types` are the same path.
/// Equality is exact-string on the canonical form; no case folding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(String);

impl ModulePath {
    /// Parse a `::`- or `.`-separated module path.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<&str> = raw
            .split(PATH_SEPARATOR)
            .flat_map(|part| part.split('.'))
            .collect();

        for segment in &segments {
            if segment.is_empty() {
                return Err(PathError::EmptySegment(raw.to_owned()));
            }
            if let Some(ch) = segment
                .chars()
                .find(|c| *c == ':' || c.is_whitespace() || *c == '/')
            {
                return Err(PathError::InvalidCharacter {
                    path: raw.to_owned(),
                    ch,
                });
            }
        }

        Ok(Self(segments.join(PATH_SEPARATOR)))
    }

    /// Build a path from individual segments.
    ///
    /// Each segment is taken verbatim: a segment containing a separator
    /// (`.` or `:`) is rejected instead of being split.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect();
        let joined = segments.join(PATH_SEPARATOR);
        if let Some(ch) = segments
            .iter()
            .find_map(|s| s.chars().find(|c| *c == '.' || *c == ':'))
        {
            return Err(PathError::InvalidCharacter { path: joined, ch });
        }
        Self::parse(&joined)
    }

    /// Canonical `::`-joined form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments from the crate root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment (the module's own name).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0
            .rsplit_once(PATH_SEPARATOR)
            .map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Enclosing module path, `None` for a crate root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| Self(parent.to_owned()))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModulePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ModulePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModulePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Error returned for an item category tag outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item category `{0}`")]
pub struct CategoryError(pub String);

/// Kind of a documented item.
///
/// The set is closed. Categories order canonically: structs, enums, traits,
/// functions and type aliases first, then everything else by display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Struct,
    Enum,
    Trait,
    Function,
    TypeAlias,
    Module,
    Macro,
    Constant,
    Static,
    Union,
    Primitive,
    Keyword,
    Attribute,
    Derive,
    TraitAlias,
    ForeignType,
}

impl ItemCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Struct,
        Self::Enum,
        Self::Trait,
        Self::Function,
        Self::TypeAlias,
        Self::Module,
        Self::Macro,
        Self::Constant,
        Self::Static,
        Self::Union,
        Self::Primitive,
        Self::Keyword,
        Self::Attribute,
        Self::Derive,
        Self::TraitAlias,
        Self::ForeignType,
    ];

    /// Short tag used in fragment files (`struct`, `fn`, `type`, ...).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Trait => "trait",
            Self::Function => "fn",
            Self::TypeAlias => "type",
            Self::Module => "mod",
            Self::Macro => "macro",
            Self::Constant => "constant",
            Self::Static => "static",
            Self::Union => "union",
            Self::Primitive => "primitive",
            Self::Keyword => "keyword",
            Self::Attribute => "attr",
            Self::Derive => "derive",
            Self::TraitAlias => "traitalias",
            Self::ForeignType => "foreigntype",
        }
    }

    /// Heading shown above the category in a sidebar.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Struct => "Structs",
            Self::Enum => "Enums",
            Self::Trait => "Traits",
            Self::Function => "Functions",
            Self::TypeAlias => "Type Aliases",
            Self::Module => "Modules",
            Self::Macro => "Macros",
            Self::Constant => "Constants",
            Self::Static => "Statics",
            Self::Union => "Unions",
            Self::Primitive => "Primitive Types",
            Self::Keyword => "Keywords",
            Self::Attribute => "Attribute Macros",
            Self::Derive => "Derive Macros",
            Self::TraitAlias => "Trait Aliases",
            Self::ForeignType => "Foreign Types",
        }
    }

    /// Position in the fixed leading part of the canonical order.
    fn rank(self) -> u8 {
        match self {
            Self::Struct => 0,
            Self::Enum => 1,
            Self::Trait => 2,
            Self::Function => 3,
            Self::TypeAlias => 4,
            _ => 5,
        }
    }
}

impl PartialOrd for ItemCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ItemCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.display_name().cmp(other.display_name()))
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ItemCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "function" => Self::Function,
            "module" => Self::Module,
            "const" => Self::Constant,
            "typedef" => Self::TypeAlias,
            _ => Self::ALL
                .into_iter()
                .find(|c| c.tag() == s)
                .ok_or_else(|| CategoryError(s.to_owned()))?,
        };
        Ok(category)
    }
}

impl Serialize for ItemCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ItemCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of a module's sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    /// Item name, unique within its category and module.
    pub name: String,
    /// Short description; may contain inline markup and is passed through as-is.
    #[serde(default)]
    pub summary: String,
}

impl SidebarItem {
    /// Create a new sidebar item.
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }
}

/// Sidebar data of one documented module.
///
/// Items keep the order they were supplied in; sorting happens when the
/// navigation tree is built. Categories without items are not stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleFragment {
    path: ModulePath,
    items: BTreeMap<ItemCategory, Vec<SidebarItem>>,
}

impl ModuleFragment {
    /// Create a fragment from category groups.
    ///
    /// A category may appear in several groups; their items are merged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateItem`] if a `(category, name)` pair repeats.
    pub fn new<I>(path: ModulePath, groups: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (ItemCategory, Vec<SidebarItem>)>,
    {
        let mut items: BTreeMap<ItemCategory, Vec<SidebarItem>> = BTreeMap::new();
        let mut seen: HashSet<(ItemCategory, String)> = HashSet::new();

        for (category, group) in groups {
            for item in group {
                if !seen.insert((category, item.name.clone())) {
                    return Err(RegistryError::DuplicateItem {
                        path,
                        category,
                        name: item.name,
                    });
                }
                match items.entry(category) {
                    Entry::Occupied(mut entry) => entry.get_mut().push(item),
                    Entry::Vacant(entry) => {
                        entry.insert(vec![item]);
                    }
                }
            }
        }

        Ok(Self { path, items })
    }

    /// Module path of this fragment.
    #[must_use]
    pub fn path(&self) -> &ModulePath {
        &self.path
    }

    /// Items of one category, empty if the module has none.
    #[must_use]
    pub fn items(&self, category: ItemCategory) -> &[SidebarItem] {
        self.items.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Non-empty categories with their items, in canonical category order.
    pub fn groups(&self) -> impl Iterator<Item = (ItemCategory, &[SidebarItem])> {
        self.items
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }

    /// Total number of items across categories.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    /// True if the module lists no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_double_colon_path() {
        let path = ModulePath::parse("diesel::pg::types").unwrap();

        assert_eq!(path.as_str(), "diesel::pg::types");
        assert_eq!(path.segments().collect::<Vec<_>>(), ["diesel", "pg", "types"]);
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn test_parse_dotted_path_is_canonicalized() {
        let dotted = ModulePath::parse("diesel.pg.types").unwrap();
        let colons = ModulePath::parse("diesel::pg::types").unwrap();

        assert_eq!(dotted, colons);
        assert_eq!(dotted.to_string(), "diesel::pg::types");
    }

    #[test]
    fn test_parse_keeps_case() {
        let lower = ModulePath::parse("pg::types").unwrap();
        let upper = ModulePath::parse("pg::Types").unwrap();

        assert_ne!(lower, upper);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ModulePath::parse(""), Err(PathError::Empty));
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for raw in ["::pg", "pg::", "pg::::types", "pg..types", ".pg"] {
            assert!(
                matches!(ModulePath::parse(raw), Err(PathError::EmptySegment(_))),
                "expected empty segment error for {raw:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        let err = ModulePath::parse("pg:types").unwrap_err();
        assert!(matches!(err, PathError::InvalidCharacter { ch: ':', .. }));

        let err = ModulePath::parse("pg::sql types").unwrap_err();
        assert!(matches!(err, PathError::InvalidCharacter { ch: ' ', .. }));
    }

    #[test]
    fn test_name_and_parent() {
        let path = ModulePath::parse("diesel::pg::types").unwrap();

        assert_eq!(path.name(), "types");
        assert_eq!(path.parent(), Some(ModulePath::parse("diesel::pg").unwrap()));

        let root = ModulePath::parse("diesel").unwrap();
        assert_eq!(root.name(), "diesel");
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_from_segments() {
        let path = ModulePath::from_segments(["diesel", "pg"]).unwrap();
        assert_eq!(path.as_str(), "diesel::pg");

        assert!(ModulePath::from_segments(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_from_segments_rejects_separator_inside_segment() {
        let err = ModulePath::from_segments(["diesel-1.0", "pg"]).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidCharacter {
                path: "diesel-1.0::pg".to_owned(),
                ch: '.',
            }
        );

        let err = ModulePath::from_segments(["a::b"]).unwrap_err();
        assert!(matches!(err, PathError::InvalidCharacter { ch: ':', .. }));

        assert!(matches!(
            ModulePath::from_segments(["diesel", ""]),
            Err(PathError::EmptySegment(_))
        ));
    }

    #[test]
    fn test_category_canonical_order() {
        let mut categories = ItemCategory::ALL.to_vec();
        categories.reverse();
        categories.sort();

        assert_eq!(
            &categories[..5],
            &[
                ItemCategory::Struct,
                ItemCategory::Enum,
                ItemCategory::Trait,
                ItemCategory::Function,
                ItemCategory::TypeAlias,
            ]
        );

        let rest: Vec<_> = categories[5..].iter().map(|c| c.display_name()).collect();
        let mut sorted = rest.clone();
        sorted.sort_unstable();
        assert_eq!(rest, sorted);
        assert_eq!(rest.first(), Some(&"Attribute Macros"));
    }

    #[test]
    fn test_category_tags_round_trip_through_from_str() {
        for category in ItemCategory::ALL {
            assert_eq!(category.tag().parse::<ItemCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!("function".parse::<ItemCategory>(), Ok(ItemCategory::Function));
        assert_eq!("module".parse::<ItemCategory>(), Ok(ItemCategory::Module));
        assert_eq!("const".parse::<ItemCategory>(), Ok(ItemCategory::Constant));
        assert_eq!("typedef".parse::<ItemCategory>(), Ok(ItemCategory::TypeAlias));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = "class".parse::<ItemCategory>().unwrap_err();
        assert_eq!(err, CategoryError("class".to_owned()));
        assert_eq!(err.to_string(), "unknown item category `class`");
    }

    #[test]
    fn test_category_serde_uses_tag() {
        let json = serde_json::to_string(&ItemCategory::TypeAlias).unwrap();
        assert_eq!(json, "\"type\"");

        let parsed: ItemCategory = serde_json::from_str("\"fn\"").unwrap();
        assert_eq!(parsed, ItemCategory::Function);

        assert!(serde_json::from_str::<ItemCategory>("\"class\"").is_err());
    }

    #[test]
    fn test_fragment_merges_repeated_category_groups() {
        let fragment = ModuleFragment::new(
            ModulePath::parse("pg").unwrap(),
            [
                (ItemCategory::Struct, vec![SidebarItem::new("Oid", "")]),
                (ItemCategory::Struct, vec![SidebarItem::new("Array", "")]),
            ],
        )
        .unwrap();

        let names: Vec<_> = fragment
            .items(ItemCategory::Struct)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, ["Oid", "Array"]);
        assert_eq!(fragment.item_count(), 2);
    }

    #[test]
    fn test_fragment_rejects_duplicate_item() {
        let err = ModuleFragment::new(
            ModulePath::parse("pg").unwrap(),
            [(
                ItemCategory::Struct,
                vec![SidebarItem::new("Oid", "a"), SidebarItem::new("Oid", "b")],
            )],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::DuplicateItem { category: ItemCategory::Struct, ref name, .. } if name == "Oid"
        ));
    }

    #[test]
    fn test_fragment_same_name_in_different_categories_allowed() {
        let fragment = ModuleFragment::new(
            ModulePath::parse("pg").unwrap(),
            [
                (ItemCategory::Struct, vec![SidebarItem::new("Array", "")]),
                (ItemCategory::TypeAlias, vec![SidebarItem::new("Array", "")]),
            ],
        )
        .unwrap();

        assert_eq!(fragment.item_count(), 2);
    }

    #[test]
    fn test_fragment_omits_empty_groups() {
        let fragment = ModuleFragment::new(
            ModulePath::parse("pg").unwrap(),
            [(ItemCategory::Enum, Vec::new())],
        )
        .unwrap();

        assert!(fragment.is_empty());
        assert_eq!(fragment.groups().count(), 0);
        assert!(fragment.items(ItemCategory::Enum).is_empty());
    }
}
