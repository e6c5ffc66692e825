//! An in-memory table: ordered headers plus rows in file order.
use std::vec;

use crate::{error::Result, get_field, Headers, Row, RowResult, RowStream};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Headers,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Headers, rows: Vec<Row>) -> Table {
        Table { headers, rows }
    }

    /// A table with no columns and no rows, what a not yet created file reads
    /// as.
    pub fn empty() -> Table {
        Table::default()
    }

    /// Builds a table whose first row is taken as the headers. An empty
    /// iterator gives an empty table.
    pub fn from_rows<I>(rows: I) -> Table
    where
        I: IntoIterator<Item = Row>,
    {
        let mut rows = rows.into_iter();

        match rows.next() {
            Some(header_row) => Table {
                headers: Headers::from_row(header_row),
                rows: rows.collect(),
            },
            None => Table::empty(),
        }
    }

    /// Drains a stream into a table, stopping at the first error.
    pub fn from_stream<S: RowStream>(stream: S) -> Result<Table> {
        let headers = stream.headers().clone();
        let rows = stream.into_iter().collect::<Result<Vec<Row>>>()?;

        Ok(Table { headers, rows })
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom. `None` if there is no such column.
    pub fn column<'t>(&'t self, name: &'t str) -> Option<impl Iterator<Item = &'t str> + 't> {
        if !self.headers.contains_key(name) {
            return None;
        }

        Some(
            self.rows
                .iter()
                .map(move |row| get_field(&self.headers, row, name).unwrap_or("")),
        )
    }
}

pub struct IntoIter {
    rows: vec::IntoIter<Row>,
}

impl Iterator for IntoIter {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(Ok)
    }
}

impl IntoIterator for Table {
    type Item = RowResult;

    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            rows: self.rows.into_iter(),
        }
    }
}

impl RowStream for Table {
    fn headers(&self) -> &Headers {
        &self.headers
    }
}
