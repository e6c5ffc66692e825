use std::collections::HashSet;
use tracing::info;

use crate::Table;

/// Keys already present in `table`.
///
/// An empty table, or one without the key column, is a destination that has
/// not been written yet and gives an empty set.
pub fn existing_keys(table: &Table, key: &str) -> HashSet<String> {
    if table.is_empty() {
        info!("destination is empty, no existing keys");

        return HashSet::new();
    }

    match table.column(key) {
        Some(values) => {
            let keys: HashSet<String> = values.map(str::to_string).collect();

            info!("found {} existing {} values", keys.len(), key);

            keys
        }
        None => {
            info!("{} column not found in destination, no existing keys", key);

            HashSet::new()
        }
    }
}
