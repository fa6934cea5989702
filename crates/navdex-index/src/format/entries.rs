//! Category-keyed JSON objects that keep repeated keys.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A JSON object mapping category tags to item lists, in document order.
///
/// Unlike a map type, a tag that appears twice yields two entries, so the
/// fragment constructor can merge them and report repeated names instead of
/// the later key silently replacing the earlier one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEntries<T>(Vec<(String, Vec<T>)>);

impl<T> CategoryEntries<T> {
    /// Category tags in document order, repeats included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(tag, _)| tag.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the object has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for CategoryEntries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> FromIterator<(String, Vec<T>)> for CategoryEntries<T> {
    fn from_iter<I: IntoIterator<Item = (String, Vec<T>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for CategoryEntries<T> {
    type Item = (String, Vec<T>);
    type IntoIter = std::vec::IntoIter<(String, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Serialize> Serialize for CategoryEntries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (tag, items) in &self.0 {
            map.serialize_entry(tag, items)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CategoryEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

struct EntriesVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
    type Value = CategoryEntries<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object mapping category tags to item lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((tag, items)) = map.next_entry::<String, Vec<T>>()? {
            entries.push((tag, items));
        }
        Ok(CategoryEntries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repeated_keys_are_kept_in_order() {
        let entries: CategoryEntries<String> =
            serde_json::from_str(r#"{"struct": ["A"], "fn": [], "struct": ["B"]}"#).unwrap();

        assert_eq!(entries.keys().collect::<Vec<_>>(), ["struct", "fn", "struct"]);
        assert_eq!(
            entries.into_iter().collect::<Vec<_>>(),
            [
                ("struct".to_owned(), vec!["A".to_owned()]),
                ("fn".to_owned(), vec![]),
                ("struct".to_owned(), vec!["B".to_owned()]),
            ]
        );
    }

    #[test]
    fn test_serializes_as_object() {
        let entries: CategoryEntries<u32> = [("fn".to_owned(), vec![1, 2])].into_iter().collect();

        assert_eq!(serde_json::to_string(&entries).unwrap(), r#"{"fn":[1,2]}"#);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(serde_json::from_str::<CategoryEntries<String>>("[]").is_err());
    }
}
