//! Projection of a stream onto a fixed, ordered set of columns
use tracing::debug;

use crate::error::{Error, Result, RowResult};
use crate::{Headers, Row, RowStream};

/// Keeps only the specified columns of each row, in the specified order.
pub struct Select<I> {
    iter: I,
    indexes: Vec<usize>,
    headers: Headers,
}

impl<I> Select<I>
where
    I: RowStream,
{
    pub fn new(iter: I, fields: &[&str]) -> Result<Select<I>> {
        Select::for_stage(iter, fields, "select")
    }

    /// Same as `new` but a failure is reported as coming from `stage`.
    pub(crate) fn for_stage(iter: I, fields: &[&str], stage: &'static str) -> Result<Select<I>> {
        let missing = iter.headers().missing(fields);

        if !missing.is_empty() {
            return Err(Error::Schema { stage, missing });
        }

        let mut indexes = Vec::with_capacity(fields.len());
        let mut header_row = Row::with_capacity(fields.iter().map(|f| f.len()).sum(), fields.len());

        for field in fields {
            // can unwrap because missing fields were rejected above
            indexes.push(iter.headers().get(field).unwrap());
            header_row.push_field(field);
        }

        debug!(
            "{}: projecting {} columns onto {}",
            stage,
            iter.headers().len(),
            fields.len()
        );

        Ok(Select {
            iter,
            indexes,
            headers: Headers::from_row(header_row),
        })
    }
}

pub struct IntoIter<I> {
    iter: I,
    indexes: Vec<usize>,
}

impl<I> Iterator for IntoIter<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|result| {
            result.map(|val| {
                let mut new_row = Row::with_capacity(val.as_slice().len(), self.indexes.len());

                for index in self.indexes.iter() {
                    new_row.push_field(val.get(*index).unwrap_or(""));
                }

                new_row
            })
        })
    }
}

impl<I> IntoIterator for Select<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            iter: self.iter.into_iter(),
            indexes: self.indexes,
        }
    }
}

impl<I> RowStream for Select<I>
where
    I: RowStream,
{
    fn headers(&self) -> &Headers {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::{Headers, Row, RowStream, Select};
    use crate::{schema::ORIGINALS_COLUMNS, Error, Table};

    #[test]
    fn test_select_reorders_and_drops() {
        let table = Table::from_rows(vec![
            Row::from(vec!["id", "val", "path"]),
            Row::from(vec!["1", "40", "/tmp/a1m.csv"]),
            Row::from(vec!["2", "39", "/tmp/a1m.csv"]),
            Row::from(vec!["3", "38", "/tmp/a2m.csv"]),
        ]);

        let select = Select::new(table, &["val", "id"]).unwrap();

        assert_eq!(
            *select.headers(),
            Headers::from_row(Row::from(vec!["val", "id"])),
        );

        let mut select = select.into_iter();

        assert_eq!(select.next().unwrap().unwrap(), Row::from(vec!["40", "1"]));
        assert_eq!(select.next().unwrap().unwrap(), Row::from(vec!["39", "2"]));
        assert_eq!(select.next().unwrap().unwrap(), Row::from(vec!["38", "3"]));
        assert!(select.next().is_none());
    }

    #[test]
    fn test_missing_abn_is_named() {
        let header: Vec<&str> = ORIGINALS_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "ABN")
            .collect();
        let table = Table::from_rows(vec![Row::from(header)]);

        match table.select(ORIGINALS_COLUMNS) {
            Err(err @ Error::Schema { .. }) => {
                assert!(err.to_string().contains("ABN"));

                if let Error::Schema { missing, .. } = err {
                    assert_eq!(missing, vec!["ABN"]);
                }
            }
            other => panic!("expected a schema error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_every_missing_column_is_listed() {
        let table = Table::from_rows(vec![Row::from(vec!["DOC_ID", "extra"])]);

        match table.select(ORIGINALS_COLUMNS) {
            Err(Error::Schema { stage, missing }) => {
                assert_eq!(stage, "select");
                assert_eq!(missing.len(), ORIGINALS_COLUMNS.len() - 1);
                assert_eq!(missing[0], "INVOICE_TYPE");
                assert_eq!(missing[missing.len() - 1], "STATUS_TEXT");
            }
            other => panic!("expected a schema error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_extras_dropped_in_canonical_order() {
        let mut header: Vec<&str> = ORIGINALS_COLUMNS.iter().rev().copied().collect();
        header.insert(3, "CLERK");
        header.push("POSTING_KEY");
        let values: Vec<String> = header.iter().map(|h| format!("v_{}", h)).collect();

        let table = Table::from_rows(vec![Row::from(header), Row::from(values)]);
        let projected = Table::from_stream(table.select(ORIGINALS_COLUMNS).unwrap()).unwrap();

        assert_eq!(*projected.headers().as_row(), Row::from(ORIGINALS_COLUMNS.to_vec()));
        assert_eq!(projected.len(), 1);

        let expected: Vec<String> = ORIGINALS_COLUMNS.iter().map(|h| format!("v_{}", h)).collect();

        assert_eq!(projected.rows()[0], Row::from(expected));
    }
}
