//! The in-flight row representation passed between executors: an
//! insertion-ordered mapping from lower-cased column name to value.

use crate::value::SqlValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMap {
    entries: Vec<(String, SqlValue)>,
}

impl RowMap {
    pub fn new() -> Self {
        RowMap { entries: Vec::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SqlValue) {
        let key = key.into();
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&SqlValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges `other` into `self`, overwriting on key collision so the
    /// caller's row wins (used by the join executor, left row merged last).
    pub fn merge_overwriting_with(&mut self, other: &RowMap) {
        for (k, v) in other.iter() {
            self.insert(k.clone(), v.clone());
        }
    }
}

impl FromIterator<(String, SqlValue)> for RowMap {
    fn from_iter<T: IntoIterator<Item = (String, SqlValue)>>(iter: T) -> Self {
        let mut row = RowMap::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_overwrites_in_place() {
        let mut row = RowMap::new();
        row.insert("id", SqlValue::Int(1));
        row.insert("name", SqlValue::Text("a".to_string()));
        row.insert("id", SqlValue::Int(2));
        let keys: Vec<_> = row.keys().cloned().collect();
        assert_eq!(keys, vec!["id".to_string(), "name".to_string()]);
        assert_eq!(row.get("id"), Some(&SqlValue::Int(2)));
    }

    #[test]
    fn merge_left_wins_on_collision() {
        let mut left = RowMap::new();
        left.insert("id", SqlValue::Int(1));
        left.insert("name", SqlValue::Text("alice".to_string()));
        let mut right = RowMap::new();
        right.insert("id", SqlValue::Int(99));
        right.insert("total", SqlValue::Float(2.0));

        let mut merged = right.clone();
        merged.merge_overwriting_with(&left);

        assert_eq!(merged.get("id"), Some(&SqlValue::Int(1)));
        assert_eq!(merged.get("total"), Some(&SqlValue::Float(2.0)));
        assert_eq!(merged.get("name"), Some(&SqlValue::Text("alice".to_string())));
    }
}
