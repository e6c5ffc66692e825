use std::collections::HashSet;
use std::path::PathBuf;

use crate::{
    error::Result,
    Append, Headers, Novel, Recent, Row, RowResult, Select, Window,
};

/// This trait describes de behaviour of every component in the capture
/// chain. Functions provided by this trait help construct the chain and can be
/// _chained_.
///
/// Every builder checks the columns it needs against `headers()` up front, so
/// a missing column fails the whole chain before a single row is read.
pub trait RowStream: IntoIterator<Item = RowResult> {
    /// Must return headers as they are in this point of the chain. For example
    /// if implementor drops a column, its `headers()` function must return the
    /// new headers without it.
    fn headers(&self) -> &Headers;

    /// Keeps exactly the given columns, in the given order.
    fn select(self, fields: &[&str]) -> Result<Select<Self>>
    where
        Self: Sized,
    {
        Select::new(self, fields)
    }

    /// Keeps rows whose date in `field` falls inside `window`. Rows with an
    /// unreadable date are dropped and counted.
    fn recent(self, field: &str, window: Window) -> Result<Recent<Self>>
    where
        Self: Sized,
    {
        Recent::new(self, field, window)
    }

    /// Keeps the first row of every key that is not in `existing`.
    fn novel(self, key: &str, existing: HashSet<String>) -> Result<Novel<Self>>
    where
        Self: Sized,
    {
        Novel::new(self, key, existing)
    }

    /// When run, appends every row to the file at `path` using the column
    /// order given in `fields`.
    fn append_to<P>(self, path: P, fields: &[&str]) -> Result<Append<Self>>
    where
        Self: Sized,
        P: Into<PathBuf>,
    {
        Append::new(self, path, fields)
    }
}

/// Value of the named column in `row`, if the column exists.
pub fn get_field<'r>(headers: &Headers, row: &'r Row, field: &str) -> Option<&'r str> {
    headers.get(field).and_then(|index| row.get(index))
}
