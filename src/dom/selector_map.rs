use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Map of dense candidate indices to XPath locators.
///
/// Indices match the `index:` prefixes of the serialized output lines, in
/// the same order. A map is rebuilt from scratch on every extraction call;
/// its locators are only meaningful until the page mutates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorMap {
    map: IndexMap<usize, String>,
}

impl SelectorMap {
    /// Create a new empty SelectorMap
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the locator for an index
    pub fn insert(&mut self, index: usize, xpath: impl Into<String>) {
        self.map.insert(index, xpath.into());
    }

    /// Get the locator for an index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.map.get(&index).map(String::as_str)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.map.contains_key(&index)
    }

    /// Number of registered locators
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over (index, xpath) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.map.iter().map(|(index, xpath)| (*index, xpath.as_str()))
    }

    /// All registered indices
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.map.keys().copied()
    }

    /// Fold another map into this one. Colliding indices are overwritten
    /// by `other` (last writer wins). Whole-page extraction merges chunk
    /// maps this way, losing earlier entries on collision.
    pub fn merge(&mut self, other: SelectorMap) -> usize {
        let mut collisions = 0;
        for (index, xpath) in other.map {
            if self.map.insert(index, xpath).is_some() {
                collisions += 1;
            }
        }
        collisions
    }

    /// Export to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.map)
    }
}

impl FromIterator<(usize, String)> for SelectorMap {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self { map: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = SelectorMap::new();
        map.insert(0, "//*[@id='go']");
        map.insert(1, "/html/body/div[2]/a");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(0), Some("//*[@id='go']"));
        assert_eq!(map.get(1), Some("/html/body/div[2]/a"));
        assert_eq!(map.get(2), None);
    }

    #[test]
    fn test_iteration_order() {
        let mut map = SelectorMap::new();
        map.insert(0, "/html/body/p");
        map.insert(1, "/html/body/a");
        map.insert(2, "/html/body/button");

        let indices: Vec<_> = map.indices().collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_merge_overwrites_collisions() {
        let mut first = SelectorMap::new();
        first.insert(0, "/html/body/p[1]");
        first.insert(1, "/html/body/p[2]");

        let mut second = SelectorMap::new();
        second.insert(0, "/html/body/a");

        let collisions = first.merge(second);

        assert_eq!(collisions, 1);
        assert_eq!(first.len(), 2);
        // Later chunk wins
        assert_eq!(first.get(0), Some("/html/body/a"));
        assert_eq!(first.get(1), Some("/html/body/p[2]"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut map = SelectorMap::new();
        map.insert(0, "//*[@id='x']");

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"0":"//*[@id='x']"}"##);

        let parsed: SelectorMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }
}
