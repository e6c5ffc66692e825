use std::collections::HashMap;

use super::Row;

/// A structure for keeping relationship between the headers and their positions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Headers {
    indexes: HashMap<String, usize>,
    names: Row,
}

impl Headers {
    pub fn from_row(row: Row) -> Headers {
        let mut indexes = HashMap::new();

        // a repeated column name resolves to its first position
        for (index, entry) in row.iter().enumerate() {
            indexes.entry(entry.to_string()).or_insert(index);
        }

        Headers {
            indexes,
            names: row,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_row(&self) -> &Row {
        &self.names
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.indexes.get(field).copied()
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    /// Every name in `fields` that is not among these headers, keeping the
    /// order of `fields`.
    pub fn missing(&self, fields: &[&str]) -> Vec<String> {
        fields
            .iter()
            .filter(|f| !self.contains_key(f))
            .map(|f| f.to_string())
            .collect()
    }
}
